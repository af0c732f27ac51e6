//! Durable storage for the engine state and the registration queue.
//!
//! The two records are written independently; nothing here makes them
//! atomic with respect to each other. The coordinator decides what to do
//! when one write fails.

pub mod config;
pub mod errors;
pub mod gateway;

pub use config::{PENDING_PLAYERS_FILE, StorageConfig, TOURNAMENT_FILE};
pub use errors::{StorageError, StorageResult};
pub use gateway::{FileGateway, MemoryGateway, PersistenceGateway};
