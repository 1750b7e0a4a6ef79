use crate::combat::types::{DuelOutcome, RoundOutcome};
use crate::duel::mirror::MirrorTurn;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which duel variant runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuelMode {
    /// Nine-round card exchange with HP loss by damage difference.
    #[default]
    Exchange,
    /// Hand of three, both sides hit every turn.
    Mirror,
}

impl DuelMode {
    pub fn parse(raw: &str) -> Option<DuelMode> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "exchange" => Some(DuelMode::Exchange),
            "mirror" => Some(DuelMode::Mirror),
            _ => None,
        }
    }
}

impl fmt::Display for DuelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DuelMode::Exchange => "exchange",
            DuelMode::Mirror => "mirror",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelPhase {
    Init,
    PlayerTurn,
    EnemyTurn,
    Resolving,
    RoundEnd,
    DuelEnd,
}

impl fmt::Display for DuelPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DuelPhase::Init => "init",
            DuelPhase::PlayerTurn => "player_turn",
            DuelPhase::EnemyTurn => "enemy_turn",
            DuelPhase::Resolving => "resolving",
            DuelPhase::RoundEnd => "round_end",
            DuelPhase::DuelEnd => "duel_end",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuelSide {
    Player,
    Enemy,
}

impl fmt::Display for DuelSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DuelSide::Player => "player",
            DuelSide::Enemy => "enemy",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub round: u32,
    pub message: String,
    pub timestamp_ms: i64,
}

impl LogEntry {
    pub fn now(round: u32, message: String) -> Self {
        Self {
            round,
            message,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Result of one resolved exchange round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    pub outcome: RoundOutcome,
    pub player_hp: u32,
    pub enemy_hp: u32,
    pub duel_ended: bool,
}

/// What a single `DuelEngine::step` did.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent {
    Started,
    Exchange(RoundReport),
    Mirror(MirrorTurn),
}

/// Mode-independent view of a duel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuelSummary {
    pub mode: DuelMode,
    pub phase: DuelPhase,
    /// Rounds (or turns) fully played.
    pub rounds_played: u32,
    pub player_hp: u32,
    pub player_max_hp: u32,
    pub enemy_hp: u32,
    pub enemy_max_hp: u32,
    pub outcome: Option<DuelOutcome>,
}
