use super::types::{DuelPhase, DuelSide};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuelError {
    #[error("cannot {action} during {phase}")]
    InvalidTransition { action: &'static str, phase: DuelPhase },

    #[error("card index {index} out of range (deck has {len} cards)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("both cards must be selected before resolving")]
    MissingSelection,

    #[error("{side} deck is empty")]
    EmptyDeck { side: DuelSide },
}

pub type Result<T> = std::result::Result<T, DuelError>;
