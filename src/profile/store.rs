//! Profile persistence.

use super::types::PlayerProfile;
use crate::core::constants::{PROFILE_FILE_NAME, SAVE_DIR_NAME};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("profile io error: {0}")]
    Io(#[from] io::Error),
    #[error("profile serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("could not determine home directory")]
    NoHomeDir,
}

pub trait ProfileStore {
    fn load(&self) -> Result<PlayerProfile, StoreError>;
    fn save(&self, profile: &PlayerProfile) -> Result<(), StoreError>;
}

/// Pretty-printed JSON file, `~/.cardastika/profile.json` by default.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_home_dir() -> Result<Self, StoreError> {
        let home = dirs::home_dir().ok_or(StoreError::NoHomeDir)?;
        Ok(Self::new(home.join(SAVE_DIR_NAME).join(PROFILE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    /// A missing file is a new player; an unreadable one is logged and
    /// replaced by a new player rather than failing.
    fn load(&self) -> Result<PlayerProfile, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PlayerProfile::new_player()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str(&json) {
            Ok(profile) => Ok(profile),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "profile is not valid JSON, starting fresh");
                Ok(PlayerProfile::new_player())
            }
        }
    }

    fn save(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// In-process store for tests and simulations.
#[derive(Debug, Default)]
pub struct MemoryStore {
    profile: RefCell<PlayerProfile>,
}

impl MemoryStore {
    pub fn new(profile: PlayerProfile) -> Self {
        Self {
            profile: RefCell::new(profile),
        }
    }

    pub fn snapshot(&self) -> PlayerProfile {
        self.profile.borrow().clone()
    }
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<PlayerProfile, StoreError> {
        Ok(self.profile.borrow().clone())
    }

    fn save(&self, profile: &PlayerProfile) -> Result<(), StoreError> {
        *self.profile.borrow_mut() = profile.clone();
        Ok(())
    }
}
