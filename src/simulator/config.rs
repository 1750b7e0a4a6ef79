//! Simulation configuration.

use crate::duel::types::DuelMode;

/// Configuration for a batch of simulated duels or drops.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of duels to play
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Duel variant to simulate
    pub mode: DuelMode,

    /// Engine steps per duel before the run counts as timed out
    pub max_steps_per_duel: u32,

    /// Number of drops to roll in a drop analysis
    pub drop_trials: u32,

    /// Level of every player deck card
    pub player_card_level: u32,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            mode: DuelMode::Exchange,
            max_steps_per_duel: 1_000,
            drop_trials: 10_000,
            player_card_level: 1,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for exchange duel balance
    pub fn exchange_balance(num_runs: u32) -> Self {
        Self {
            num_runs,
            mode: DuelMode::Exchange,
            ..Default::default()
        }
    }

    /// Quick config for mirror duel balance
    pub fn mirror_balance(num_runs: u32) -> Self {
        Self {
            num_runs,
            mode: DuelMode::Mirror,
            ..Default::default()
        }
    }

    /// Quick config for drop table analysis
    pub fn drop_analysis(drop_trials: u32) -> Self {
        Self {
            drop_trials,
            ..Default::default()
        }
    }

    /// Seeded copy of this config.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
