//! Damage math and round resolution for both duel variants.

pub mod logic;
pub mod types;

pub use logic::{check_duel_end, exchange_damage, mirror_damage, resolve_round, round_message, win_probability};
pub use types::{DamageResult, DuelOutcome, RoundOutcome, RoundWinner};
