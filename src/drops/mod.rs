//! Card drops: weighted rarity and element rolls, pity guarantees and the
//! starter pool.

pub mod logic;
pub mod types;

pub use logic::DropEngine;
pub use types::{
    BatchDropResult, DropOptions, DropResult, DropSimulation, ElementWeight, ElementWeights, PityCounters,
    RarityWeights,
};
