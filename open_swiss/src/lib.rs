//! # Open Swiss
//!
//! Player registration and state coordination for Swiss-system
//! tournaments.
//!
//! Players ask to join through a [`RegistrationQueue`]; an organizer
//! accepts or rejects each request. Accepted players are added to a
//! [`TournamentEngine`], which handles pairings, results and standings.
//! A [`StateCoordinator`] owns both and saves them through a
//! [`PersistenceGateway`] after every change.
//!
//! ## Modules
//!
//! - [`registration`]: queue of registration requests and their status
//! - [`engine`]: engine capability and the bundled Swiss engine
//! - [`storage`]: durable records (JSON files or memory)
//! - [`coordinator`]: single-lock owner of the engine and the queue

pub mod coordinator;
pub mod engine;
pub mod registration;
pub mod storage;

pub use coordinator::{
    CommitStage, CoordinatorError, CoordinatorResult, RollbackPolicy, StateCoordinator,
    TournamentSnapshot,
};
pub use engine::{EngineError, PlayerId, SwissTournament, TournamentEngine, TournamentStatus};
pub use registration::{Entrant, EntrantStatus, RegistrationError, RegistrationQueue};
pub use storage::{FileGateway, MemoryGateway, PersistenceGateway, StorageConfig, StorageError};
