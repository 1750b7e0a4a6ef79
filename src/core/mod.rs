//! Shared constants and configuration.

pub mod config;
pub mod constants;

pub use config::{ConfigError, DropConfig, DuelConfig, GameConfig};
