//! Tunable game balance, loadable from JSON. Every field has a default so a
//! partial file only overrides what it names.

use crate::cards::elements::ElementTable;
use crate::core::constants::{
    DECK_SIZE, DEFAULT_STARTING_HP, LEGENDARY_GUARANTEE_AFTER, MIRROR_HAND_SIZE, MIRROR_LOG_CAP,
    MYTHIC_GUARANTEE_AFTER, POST_DUEL_DROP_CHANCE,
};
use crate::drops::types::{ElementWeights, RarityWeights};
use crate::duel::types::DuelMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub drop: DropConfig,
    pub duel: DuelConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropConfig {
    pub rarity_weights: RarityWeights,
    pub element_weights: ElementWeights,
    /// Grant starter cards until the player owns one of each.
    pub starter_gating: bool,
    pub legendary_guarantee_after: u32,
    pub mythic_guarantee_after: u32,
    /// Chance of a drop after any duel outcome, in `[0, 1]`.
    pub post_duel_chance: f64,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            rarity_weights: RarityWeights::default(),
            element_weights: ElementWeights::default(),
            starter_gating: true,
            legendary_guarantee_after: LEGENDARY_GUARANTEE_AFTER,
            mythic_guarantee_after: MYTHIC_GUARANTEE_AFTER,
            post_duel_chance: POST_DUEL_DROP_CHANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    pub mode: DuelMode,
    pub starting_hp: u32,
    /// Exchange duels start each side at its deck's total power instead.
    pub hp_from_power: bool,
    pub deck_size: usize,
    pub hand_size: usize,
    pub log_cap: usize,
    pub exchange_table: ElementTable,
    pub mirror_table: ElementTable,
}

impl Default for DuelConfig {
    fn default() -> Self {
        Self {
            mode: DuelMode::default(),
            starting_hp: DEFAULT_STARTING_HP,
            hp_from_power: false,
            deck_size: DECK_SIZE,
            hand_size: MIRROR_HAND_SIZE,
            log_cap: MIRROR_LOG_CAP,
            exchange_table: ElementTable::Extended,
            mirror_table: ElementTable::Steampunk,
        }
    }
}

impl DuelConfig {
    /// Element table used by the configured mode.
    pub fn table(&self) -> ElementTable {
        match self.mode {
            DuelMode::Exchange => self.exchange_table,
            DuelMode::Mirror => self.mirror_table,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        info!(path = %path.display(), "game config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.drop.post_duel_chance) {
            return Err(ConfigError::Invalid(format!(
                "drop.post_duel_chance must be within 0..=1, got {}",
                self.drop.post_duel_chance
            )));
        }
        if self.duel.hand_size == 0 || self.duel.hand_size > self.duel.deck_size {
            return Err(ConfigError::Invalid(format!(
                "duel.hand_size must be within 1..={}, got {}",
                self.duel.deck_size, self.duel.hand_size
            )));
        }
        if self.duel.log_cap == 0 {
            return Err(ConfigError::Invalid("duel.log_cap must be positive".to_string()));
        }
        Ok(())
    }
}
