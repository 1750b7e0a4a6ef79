//! Card power growth.
//!
//! Two formulas coexist and are not interchangeable:
//! - multiplicative (`base * mult^(level-1)`) drives catalog progression tables
//! - additive (`base + step(rarity) * (level-1)`) drives in-duel power

use crate::cards::types::{Card, Rarity};
use crate::core::constants::{DEFAULT_UPGRADE_MULT, POWER_PROGRESSION_MAX_LEVEL, RARITY_POWER_INCREMENT};
use serde::{Deserialize, Serialize};
use tracing::warn;

fn clamp_level(level: u32) -> u32 {
    level.max(1)
}

/// Additive step per level for a rarity. Unknown rarities use the common step.
pub fn rarity_increment(rarity: Option<Rarity>) -> u32 {
    let rarity = rarity.unwrap_or(Rarity::Common);
    RARITY_POWER_INCREMENT[rarity.index()]
}

/// `round(basePower * upgradeMult^(level-1))`. A card without a base power
/// is logged and reads as 0.
pub fn multiplicative_power(card: &Card, level: u32) -> u32 {
    let base = match card.base_power {
        Some(base) if base > 0 => base,
        _ => {
            warn!(card_id = %card.id, "card has no basePower, power defaults to 0");
            return 0;
        }
    };
    let mult = card.upgrade_mult.filter(|m| *m > 0.0).unwrap_or(DEFAULT_UPGRADE_MULT);
    let exponent = (clamp_level(level) - 1).min(i32::MAX as u32) as i32;
    (base as f64 * mult.powi(exponent)).round() as u32
}

/// `basePower + step(rarity) * (level-1)`, saturating at `u32::MAX`. A
/// missing base power counts as 0.
pub fn additive_power(card: &Card, level: u32) -> u32 {
    if card.base_power.is_none() {
        warn!(card_id = %card.id, "card has no basePower, using 0 as base");
    }
    let base = card.base_power.unwrap_or(0);
    rarity_increment(card.rarity)
        .saturating_mul(clamp_level(level) - 1)
        .saturating_add(base)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerStep {
    pub level: u32,
    pub power: u32,
}

/// Multiplicative power at every level from 1 to `max_level`.
pub fn power_progression(card: &Card, max_level: u32) -> Vec<PowerStep> {
    (1..=max_level)
        .map(|level| PowerStep {
            level,
            power: multiplicative_power(card, level),
        })
        .collect()
}

pub fn default_power_progression(card: &Card) -> Vec<PowerStep> {
    power_progression(card, POWER_PROGRESSION_MAX_LEVEL)
}

pub fn power_gain(card: &Card, from_level: u32, to_level: u32) -> i64 {
    multiplicative_power(card, to_level) as i64 - multiplicative_power(card, from_level) as i64
}

/// Gain between two levels as a rounded percentage of the starting power.
pub fn power_gain_percent(card: &Card, from_level: u32, to_level: u32) -> i64 {
    let from = multiplicative_power(card, from_level);
    if from == 0 {
        return 0;
    }
    let to = multiplicative_power(card, to_level);
    ((to as f64 - from as f64) / from as f64 * 100.0).round() as i64
}

pub fn compare_power(a: &Card, b: &Card, level: u32) -> i64 {
    multiplicative_power(a, level) as i64 - multiplicative_power(b, level) as i64
}

/// Sum of multiplicative power with every card at the same level.
pub fn deck_power(cards: &[Card], level: u32) -> u32 {
    cards
        .iter()
        .fold(0u32, |total, c| total.saturating_add(multiplicative_power(c, level)))
}
