use crate::cards::types::DuelCard;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One directional hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    pub damage: u32,
    pub multiplier: f64,
    pub is_effective: bool,
    pub is_weak: bool,
}

impl DamageResult {
    pub fn new(damage: u32, multiplier: f64) -> Self {
        Self {
            damage,
            multiplier,
            is_effective: multiplier > 1.0,
            is_weak: multiplier < 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundWinner {
    Player,
    Enemy,
    Draw,
}

/// Both directions of an exchange-mode round and who came out ahead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub winner: RoundWinner,
    /// Positive difference between the two hits; 0 on a draw.
    pub net_damage: u32,
    pub player_attack: DamageResult,
    pub enemy_attack: DamageResult,
    pub player_card: DuelCard,
    pub enemy_card: DuelCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuelOutcome {
    Victory,
    Defeat,
    Draw,
}

impl DuelOutcome {
    /// Outcome decided on remaining HP: strictly higher wins.
    pub fn by_hp(player_hp: u32, enemy_hp: u32) -> Self {
        match player_hp.cmp(&enemy_hp) {
            std::cmp::Ordering::Greater => DuelOutcome::Victory,
            std::cmp::Ordering::Less => DuelOutcome::Defeat,
            std::cmp::Ordering::Equal => DuelOutcome::Draw,
        }
    }
}

impl fmt::Display for DuelOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DuelOutcome::Victory => "victory",
            DuelOutcome::Defeat => "defeat",
            DuelOutcome::Draw => "draw",
        })
    }
}
