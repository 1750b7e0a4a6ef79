//! Duel variants behind a common engine interface.

pub mod error;
pub mod exchange;
pub mod mirror;
pub mod opponent;
pub mod types;

pub use error::DuelError;
pub use exchange::{AsymmetricExchangeDuel, ExchangeSnapshot};
pub use mirror::{HandSide, MirrorHandDuel, MirrorStrike, MirrorTurn};
pub use opponent::{build_enemy_deck, EnemyDeck};
pub use types::{DuelMode, DuelPhase, DuelSide, DuelSummary, LogEntry, RoundReport, StepEvent};

use crate::cards::deck::deck_total_power;
use crate::cards::types::DuelCard;
use crate::combat::types::DuelOutcome;
use crate::core::config::DuelConfig;
use rand::RngCore;

/// A duel that can be advanced one automatic step at a time. Pacing between
/// steps belongs to the caller.
pub trait DuelEngine {
    fn mode(&self) -> DuelMode;

    fn start(&mut self) -> Result<(), DuelError>;

    /// Advances by one unit of play: starting the duel, or one full round.
    fn step(&mut self, rng: &mut dyn RngCore) -> Result<StepEvent, DuelError>;

    fn summary(&self) -> DuelSummary;

    fn outcome(&self) -> Option<DuelOutcome> {
        self.summary().outcome
    }

    fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }
}

impl DuelEngine for AsymmetricExchangeDuel {
    fn mode(&self) -> DuelMode {
        DuelMode::Exchange
    }

    fn start(&mut self) -> Result<(), DuelError> {
        AsymmetricExchangeDuel::start(self)
    }

    fn step(&mut self, rng: &mut dyn RngCore) -> Result<StepEvent, DuelError> {
        match self.phase() {
            DuelPhase::Init => {
                AsymmetricExchangeDuel::start(self)?;
                Ok(StepEvent::Started)
            }
            DuelPhase::RoundEnd => {
                self.next_round()?;
                self.auto_play(rng).map(StepEvent::Exchange)
            }
            _ => self.auto_play(rng).map(StepEvent::Exchange),
        }
    }

    fn summary(&self) -> DuelSummary {
        AsymmetricExchangeDuel::summary(self)
    }

    fn outcome(&self) -> Option<DuelOutcome> {
        AsymmetricExchangeDuel::outcome(self)
    }
}

impl DuelEngine for MirrorHandDuel {
    fn mode(&self) -> DuelMode {
        DuelMode::Mirror
    }

    fn start(&mut self) -> Result<(), DuelError> {
        MirrorHandDuel::start(self);
        Ok(())
    }

    fn step(&mut self, rng: &mut dyn RngCore) -> Result<StepEvent, DuelError> {
        if self.summary().phase == DuelPhase::Init {
            MirrorHandDuel::start(self);
            return Ok(StepEvent::Started);
        }
        self.play_random_turn(rng).map(StepEvent::Mirror)
    }

    fn summary(&self) -> DuelSummary {
        MirrorHandDuel::summary(self)
    }

    fn outcome(&self) -> Option<DuelOutcome> {
        MirrorHandDuel::outcome(self)
    }
}

/// Builds the duel variant named by `config.mode`.
///
/// The exchange duel starts both sides at `config.starting_hp`, or at each
/// deck's total power when `config.hp_from_power` is set. The mirror duel
/// always uses deck power.
pub fn new_duel(
    player_deck: Vec<DuelCard>,
    enemy_deck: Vec<DuelCard>,
    config: &DuelConfig,
    rng: &mut dyn RngCore,
) -> Result<Box<dyn DuelEngine>, DuelError> {
    match config.mode {
        DuelMode::Exchange => {
            let (player_hp, enemy_hp) = if config.hp_from_power {
                (deck_total_power(&player_deck), deck_total_power(&enemy_deck))
            } else {
                (config.starting_hp, config.starting_hp)
            };
            let duel = AsymmetricExchangeDuel::new(player_deck, enemy_deck, rng)
                .with_hp(player_hp, Some(enemy_hp))
                .with_table(config.exchange_table);
            Ok(Box::new(duel))
        }
        DuelMode::Mirror => Ok(Box::new(MirrorHandDuel::with_config(
            player_deck,
            enemy_deck,
            config,
            rng,
        )?)),
    }
}

/// Steps `engine` until it reports an outcome.
pub fn run_to_completion(engine: &mut dyn DuelEngine, rng: &mut dyn RngCore) -> Result<DuelSummary, DuelError> {
    while !engine.is_finished() {
        engine.step(rng)?;
    }
    Ok(engine.summary())
}
