//! Integration tests for both duel variants driven through their public APIs.

use cardastika::cards::{DuelCard, Element};
use cardastika::combat::types::{DuelOutcome, RoundWinner};
use cardastika::core::config::DuelConfig;
use cardastika::duel::{
    new_duel, run_to_completion, AsymmetricExchangeDuel, DuelError, DuelMode, DuelPhase, MirrorHandDuel,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn deck(element: Element, attack: u32, defense: u32) -> Vec<DuelCard> {
    (0..9)
        .map(|i| DuelCard::new(&format!("{}-{i}", element.name()), element, attack, defense))
        .collect()
}

// =============================================================================
// Exchange duel
// =============================================================================

#[test]
fn test_identical_decks_draw_every_round() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let mut duel = AsymmetricExchangeDuel::new(deck(Element::Fire, 50, 20), deck(Element::Fire, 50, 20), &mut rng)
        .with_hp(450, None);
    duel.start().expect("start");

    let mut rounds = 0;
    loop {
        let report = duel.auto_play(&mut rng).expect("round");
        rounds += 1;
        assert_eq!(report.outcome.winner, RoundWinner::Draw);
        assert_eq!(report.outcome.player_attack.damage, 40);
        if report.duel_ended {
            break;
        }
        duel.next_round().expect("next round");
    }

    assert_eq!(rounds, 9);
    assert_eq!(duel.outcome(), Some(DuelOutcome::Draw));
    assert_eq!(duel.player_hp(), 450);
    assert_eq!(duel.enemy_hp(), 450);
    assert!(duel.player_deck().is_empty());
    assert_eq!(duel.summary().rounds_played, 9);
}

#[test]
fn test_hp_never_goes_below_zero() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let mut duel = AsymmetricExchangeDuel::new(deck(Element::Fire, 200, 0), deck(Element::Fire, 1, 0), &mut rng);
    duel.start().expect("start");
    let report = duel.auto_play(&mut rng).expect("round");

    assert_eq!(report.outcome.net_damage, 199);
    assert_eq!(duel.enemy_hp(), 0);
    assert!(report.duel_ended);
    assert_eq!(duel.outcome(), Some(DuelOutcome::Victory));
    assert_eq!(duel.phase(), DuelPhase::DuelEnd);
    assert_eq!(duel.player_deck().len(), 8);
    assert_eq!(duel.enemy_deck().len(), 8);
}

#[test]
fn test_decks_shrink_one_card_per_round() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let mut duel = AsymmetricExchangeDuel::new(deck(Element::Water, 30, 10), deck(Element::Water, 30, 10), &mut rng);
    duel.start().expect("start");

    for n in 1..=4 {
        duel.select_player_card(0).expect("player pick");
        duel.select_enemy_card(&mut rng).expect("enemy pick");
        duel.resolve_current_round().expect("resolve");
        assert_eq!(duel.player_deck().len(), 9 - n);
        assert_eq!(duel.enemy_deck().len(), 9 - n);
        duel.next_round().expect("next round");
    }
    assert_eq!(duel.round(), 5);
}

#[test]
fn test_actions_out_of_phase_are_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let mut duel = AsymmetricExchangeDuel::new(deck(Element::Air, 30, 10), deck(Element::Earth, 30, 10), &mut rng);

    assert!(matches!(
        duel.resolve_current_round(),
        Err(DuelError::InvalidTransition { .. })
    ));
    duel.start().expect("start");
    assert!(matches!(duel.start(), Err(DuelError::InvalidTransition { .. })));
    assert!(matches!(
        duel.select_player_card(9),
        Err(DuelError::IndexOutOfRange { index: 9, len: 9 })
    ));
    assert!(matches!(duel.next_round(), Err(DuelError::InvalidTransition { .. })));
}

#[test]
fn test_log_records_start_and_result() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut duel = AsymmetricExchangeDuel::new(deck(Element::Fire, 200, 0), deck(Element::Fire, 1, 0), &mut rng);
    duel.start().expect("start");
    duel.auto_play(&mut rng).expect("round");

    let messages: Vec<&str> = duel.log().iter().map(|e| e.message.as_str()).collect();
    assert_eq!(messages.first(), Some(&"Duel started!"));
    assert!(messages[1].starts_with("Round 1:"));
    assert!(messages[1].contains("Player deals 199 damage"));
    assert_eq!(messages.last(), Some(&"Duel finished! Result: victory"));
}

// =============================================================================
// Mirror duel
// =============================================================================

#[test]
fn test_mirror_element_advantage_decides_duel() {
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    let player: Vec<DuelCard> = deck(Element::Water, 10, 0);
    let enemy: Vec<DuelCard> = deck(Element::Fire, 10, 0);
    let mut duel = MirrorHandDuel::new(player, enemy, &mut rng).expect("duel");

    assert_eq!(duel.player().hp, 90);
    assert_eq!(duel.hand_size(), 3);

    let mut turns = 0;
    while !duel.is_finished() {
        let turn = duel.play_turn(turns % 3).expect("turn");
        assert_eq!(turn.player.damage, 15);
        assert_eq!(turn.enemy.damage, 5);
        turns += 1;
    }

    assert_eq!(turns, 6);
    assert_eq!(duel.outcome(), Some(DuelOutcome::Victory));
    assert_eq!(duel.enemy().hp, 0);
    assert_eq!(duel.player().hp, 60);
    assert!(duel.play_turn(0).is_err());
}

#[test]
fn test_mirror_runs_to_completion_through_factory() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let config = DuelConfig {
        mode: DuelMode::Mirror,
        ..DuelConfig::default()
    };
    let mut duel = new_duel(deck(Element::Air, 100, 0), deck(Element::Air, 3, 0), &config, &mut rng).expect("duel");
    let summary = run_to_completion(duel.as_mut(), &mut rng).expect("finish");

    assert_eq!(summary.mode, DuelMode::Mirror);
    assert_eq!(summary.outcome, Some(DuelOutcome::Victory));
    assert_eq!(summary.enemy_hp, 0);
}

// =============================================================================
// Engine factory
// =============================================================================

#[test]
fn test_new_duel_uses_configured_hp() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let config = DuelConfig {
        starting_hp: 250,
        ..DuelConfig::default()
    };
    let duel = new_duel(deck(Element::Fire, 50, 20), deck(Element::Ice, 50, 20), &config, &mut rng).expect("duel");
    let summary = duel.summary();
    assert_eq!(summary.mode, DuelMode::Exchange);
    assert_eq!(summary.player_max_hp, 250);
    assert_eq!(summary.enemy_max_hp, 250);
    assert_eq!(summary.phase, DuelPhase::Init);
}

#[test]
fn test_exchange_runs_to_completion_within_nine_rounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    let mut duel = new_duel(
        deck(Element::Fire, 40, 10),
        deck(Element::Water, 35, 15),
        &DuelConfig::default(),
        &mut rng,
    )
    .expect("duel");
    let summary = run_to_completion(duel.as_mut(), &mut rng).expect("finish");
    assert!(summary.outcome.is_some());
    assert!(summary.rounds_played <= 9);
}

#[test]
fn test_empty_deck_is_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(10);
    let config = DuelConfig {
        mode: DuelMode::Mirror,
        ..DuelConfig::default()
    };
    assert!(new_duel(Vec::new(), deck(Element::Fire, 1, 1), &config, &mut rng).is_err());
}
