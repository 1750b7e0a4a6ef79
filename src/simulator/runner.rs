//! Monte Carlo runners built on the real duel and drop engines.

use super::config::SimConfig;
use super::report::{DropReport, DuelReport};
use crate::cards::catalog::Catalog;
use crate::cards::deck::{balance_deck, deck_total_power};
use crate::cards::types::DuelCard;
use crate::combat::types::DuelOutcome;
use crate::core::config::GameConfig;
use crate::drops::logic::DropEngine;
use crate::drops::types::{DropOptions, PityCounters};
use crate::duel::error::DuelError;
use crate::duel::opponent::build_enemy_deck;
use crate::duel::new_duel;
use crate::profile::types::Inventory;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info};

/// What one simulated duel ended with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuelRunStats {
    pub outcome: Option<DuelOutcome>,
    pub rounds: u32,
    pub player_power: u32,
    pub enemy_power: u32,
    pub player_hp_left: u32,
    pub enemy_hp_left: u32,
    pub timed_out: bool,
}

fn run_rng(seed: Option<u64>, run_idx: u32) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(run_idx as u64)),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Plays `config.num_runs` duels between a balanced player deck and an
/// enemy deck scaled to it.
pub fn run_duel_simulation(
    catalog: &Catalog,
    game: &GameConfig,
    config: &SimConfig,
) -> Result<DuelReport, DuelError> {
    let pool: Vec<DuelCard> = catalog
        .cards()
        .iter()
        .map(|card| DuelCard::from_card(card, config.player_card_level))
        .collect();

    let mut runs = Vec::with_capacity(config.num_runs as usize);
    for run_idx in 0..config.num_runs {
        let mut rng = run_rng(config.seed, run_idx);
        let stats = simulate_single_duel(catalog, &pool, game, config, &mut rng)?;

        if config.verbosity >= 2 {
            info!(
                run = run_idx + 1,
                total = config.num_runs,
                outcome = ?stats.outcome,
                rounds = stats.rounds,
                player_hp = stats.player_hp_left,
                enemy_hp = stats.enemy_hp_left,
                player_power = stats.player_power,
                enemy_power = stats.enemy_power,
                "duel run finished"
            );
        }
        runs.push(stats);
    }

    info!(mode = %config.mode, runs = runs.len(), "duel simulation finished");
    Ok(DuelReport::from_runs(config.mode, runs))
}

fn simulate_single_duel(
    catalog: &Catalog,
    pool: &[DuelCard],
    game: &GameConfig,
    config: &SimConfig,
    rng: &mut ChaCha8Rng,
) -> Result<DuelRunStats, DuelError> {
    let mut duel_config = game.duel.clone();
    duel_config.mode = config.mode;

    let player_deck = balance_deck(pool, duel_config.deck_size, rng);
    let player_power = deck_total_power(&player_deck);
    let enemy = build_enemy_deck(catalog, player_power, rng);
    let enemy_power = enemy.total_power();

    let mut duel = new_duel(player_deck, enemy.cards, &duel_config, rng)?;
    let mut steps = 0;
    while !duel.is_finished() && steps < config.max_steps_per_duel {
        duel.step(rng)?;
        steps += 1;
    }

    let summary = duel.summary();
    let timed_out = summary.outcome.is_none();
    if timed_out {
        debug!(steps, "duel hit the step limit");
    }
    Ok(DuelRunStats {
        outcome: summary.outcome,
        rounds: summary.rounds_played,
        player_power,
        enemy_power,
        player_hp_left: summary.player_hp,
        enemy_hp_left: summary.enemy_hp,
        timed_out,
    })
}

/// Rolls `config.drop_trials` drops for a player who starts with nothing
/// and keeps every card they receive.
pub fn run_drop_simulation(catalog: &Catalog, game: &GameConfig, config: &SimConfig) -> DropReport {
    let engine = DropEngine::new(catalog, game.drop.clone());
    let options = DropOptions::default();
    let mut rng = run_rng(config.seed, 0);
    let mut inventory = Inventory::new();
    let mut pity = PityCounters::default();
    let mut report = DropReport::new(config.drop_trials);

    for _ in 0..config.drop_trials {
        let forced = pity
            .forced(
                engine.config().legendary_guarantee_after,
                engine.config().mythic_guarantee_after,
            )
            .is_some();
        let result = engine.drop_card(&inventory, pity, &options, &mut rng);
        report.record(&result, forced && result.rarity.is_some());
        pity = result.pity;
        if let Some(card) = &result.card {
            *inventory.entry(card.id.clone()).or_insert(0) += 1;
        }
    }
    report.final_pity = pity;
    report.distinct_cards = inventory.len();

    info!(trials = config.drop_trials, "drop simulation finished");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::types::{Card, Element, Rarity};
    use crate::duel::types::DuelMode;

    fn catalog() -> Catalog {
        let mut cards = Vec::new();
        for (i, element) in [Element::Fire, Element::Water, Element::Air, Element::Earth]
            .into_iter()
            .enumerate()
        {
            for rarity in Rarity::ALL {
                let id = format!("C{}-{}", i, rarity.id());
                cards.push(Card::new(&id, element, rarity, 10 + 5 * rarity.rank() as u32));
            }
            cards.push(Card::new(&format!("S{i}"), element, Rarity::Common, 8).as_starter());
        }
        Catalog::new(cards)
    }

    #[test]
    fn test_seeded_duel_simulation_is_reproducible() {
        let catalog = catalog();
        let game = GameConfig::default();
        let config = SimConfig::exchange_balance(5).with_seed(42);
        let a = run_duel_simulation(&catalog, &game, &config).expect("sim");
        let b = run_duel_simulation(&catalog, &game, &config).expect("sim");
        assert_eq!(a.runs, b.runs);
        assert_eq!(a.num_runs, 5);
        assert_eq!(a.victories + a.defeats + a.draws + a.timed_out, 5);
    }

    #[test]
    fn test_detailed_verbosity_does_not_change_results() {
        let catalog = catalog();
        let game = GameConfig::default();
        let quiet = SimConfig::exchange_balance(4).with_seed(7);
        let detailed = SimConfig { verbosity: 2, ..quiet.clone() };
        let a = run_duel_simulation(&catalog, &game, &quiet).expect("sim");
        let b = run_duel_simulation(&catalog, &game, &detailed).expect("sim");
        assert_eq!(a.runs, b.runs);
    }

    #[test]
    fn test_mirror_simulation_finishes() {
        let catalog = catalog();
        let game = GameConfig::default();
        let config = SimConfig::mirror_balance(3).with_seed(1);
        let report = run_duel_simulation(&catalog, &game, &config).expect("sim");
        assert_eq!(report.mode, DuelMode::Mirror);
        assert_eq!(report.timed_out, 0);
    }

    #[test]
    fn test_empty_catalog_fails() {
        let catalog = Catalog::default();
        let config = SimConfig::exchange_balance(1).with_seed(1);
        assert!(run_duel_simulation(&catalog, &GameConfig::default(), &config).is_err());
    }

    #[test]
    fn test_drop_simulation_grants_starters_first() {
        let catalog = catalog();
        let config = SimConfig::drop_analysis(500).with_seed(3);
        let report = run_drop_simulation(&catalog, &GameConfig::default(), &config);
        assert!(report.starter_grants >= 4);
        assert_eq!(report.rolled() + report.starter_grants, 500);
        assert!(report.forced_drops > 0);
    }
}
