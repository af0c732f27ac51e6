//! Serialized access to the tournament engine and registration queue.
//!
//! [`StateCoordinator`] is the only thing that touches either. Each
//! mutation holds one lock from the first in-memory change until its last
//! durable write returns, so concurrent callers (HTTP handlers, CLI
//! commands) always observe a consistent pair.
//!
//! ## Example
//!
//! ```
//! use open_swiss::coordinator::StateCoordinator;
//! use open_swiss::engine::SwissTournament;
//! use open_swiss::storage::MemoryGateway;
//!
//! let coordinator: StateCoordinator<SwissTournament, _> =
//!     StateCoordinator::open(MemoryGateway::new()).unwrap();
//!
//! coordinator.submit_pending("Alice").unwrap();
//! let id = coordinator.accept("alice").unwrap();
//!
//! assert!(coordinator.list_pending().is_empty());
//! assert_eq!(coordinator.player_name(id).as_deref(), Some("Alice"));
//! ```

pub mod errors;
pub mod manager;
pub mod snapshot;

#[cfg(test)]
pub mod mock;

pub use errors::{CommitStage, CoordinatorError, CoordinatorResult};
pub use manager::{RollbackPolicy, StateCoordinator};
pub use snapshot::{BYE_LABEL, PairingView, TournamentSnapshot};
