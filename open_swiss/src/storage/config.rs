//! Storage configuration.

use std::path::{Path, PathBuf};

/// File holding the engine dump
pub const TOURNAMENT_FILE: &str = "tournament.json";
/// File holding the registration queue
pub const PENDING_PLAYERS_FILE: &str = "pending_players.json";

/// Where the two durable records live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory holding both record files
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn tournament_path(&self) -> PathBuf {
        self.data_dir.join(TOURNAMENT_FILE)
    }

    pub fn pending_players_path(&self) -> PathBuf {
        self.data_dir.join(PENDING_PLAYERS_FILE)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
