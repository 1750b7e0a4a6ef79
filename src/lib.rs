//! Cardastika - card duel and progression engine
//!
//! Elemental duels (the asymmetric exchange and the mirror hand variants),
//! card drops with pity counters, duplicate upgrades, XP absorption and the
//! player profile they all write to.

pub mod build_info;
pub mod cards;
pub mod combat;
pub mod core;
pub mod drops;
pub mod duel;
pub mod profile;
pub mod progression;
pub mod simulator;
pub mod upgrade;
