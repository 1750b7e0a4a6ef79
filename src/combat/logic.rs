use super::types::{DamageResult, DuelOutcome, RoundOutcome, RoundWinner};
use crate::cards::elements::ElementTable;
use crate::cards::types::DuelCard;

/// Exchange-mode hit: `round(max(0, atk - def/2) * mult)`.
pub fn exchange_damage(attacker: &DuelCard, defender: &DuelCard, table: ElementTable) -> DamageResult {
    let multiplier = table.multiplier(attacker.element, defender.element);
    let raw = (attacker.attack as f64 - defender.defense as f64 / 2.0).max(0.0);
    DamageResult::new((raw * multiplier).round() as u32, multiplier)
}

/// Mirror-mode hit: `round(power * mult)`.
pub fn mirror_damage(attacker: &DuelCard, defender: &DuelCard, table: ElementTable) -> DamageResult {
    let multiplier = table.multiplier(attacker.element, defender.element);
    DamageResult::new((attacker.power as f64 * multiplier).round() as u32, multiplier)
}

/// Both cards hit each other; the larger hit wins by the difference.
pub fn resolve_round(player: &DuelCard, enemy: &DuelCard, table: ElementTable) -> RoundOutcome {
    let player_attack = exchange_damage(player, enemy, table);
    let enemy_attack = exchange_damage(enemy, player, table);

    let (winner, net_damage) = if player_attack.damage > enemy_attack.damage {
        (RoundWinner::Player, player_attack.damage - enemy_attack.damage)
    } else if enemy_attack.damage > player_attack.damage {
        (RoundWinner::Enemy, enemy_attack.damage - player_attack.damage)
    } else {
        (RoundWinner::Draw, 0)
    };

    RoundOutcome {
        winner,
        net_damage,
        player_attack,
        enemy_attack,
        player_card: player.clone(),
        enemy_card: enemy.clone(),
    }
}

/// `None` while both sides still stand.
pub fn check_duel_end(player_hp: u32, enemy_hp: u32) -> Option<DuelOutcome> {
    match (player_hp == 0, enemy_hp == 0) {
        (true, true) => Some(DuelOutcome::Draw),
        (true, false) => Some(DuelOutcome::Defeat),
        (false, true) => Some(DuelOutcome::Victory),
        (false, false) => None,
    }
}

pub fn round_message(outcome: &RoundOutcome, round: u32) -> String {
    let mut message = format!(
        "Round {round}: {} vs {}. ",
        outcome.player_card.name, outcome.enemy_card.name
    );
    match outcome.winner {
        RoundWinner::Player => {
            message.push_str(&format!("Player deals {} damage", outcome.net_damage));
            if outcome.player_attack.is_effective {
                message.push_str(" (effective!)");
            }
        }
        RoundWinner::Enemy => {
            message.push_str(&format!("Enemy deals {} damage", outcome.net_damage));
            if outcome.enemy_attack.is_effective {
                message.push_str(" (effective!)");
            }
        }
        RoundWinner::Draw => message.push_str("Draw!"),
    }
    message
}

/// Rough odds for the player as a percentage of combined attack + defense.
pub fn win_probability(player_deck: &[DuelCard], enemy_deck: &[DuelCard]) -> u32 {
    let strength = |deck: &[DuelCard]| -> u64 {
        deck.iter().map(|c| c.attack as u64 + c.defense as u64).sum()
    };
    let player = strength(player_deck);
    let total = player + strength(enemy_deck);
    if total == 0 {
        return 50;
    }
    (player as f64 / total as f64 * 100.0).round() as u32
}
