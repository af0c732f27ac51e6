//! Coordinator error types.

use crate::engine::EngineError;
use crate::registration::RegistrationError;
use crate::storage::StorageError;
use std::fmt;
use thiserror::Error;

/// Which durable record failed to save during an accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStage {
    /// Engine dump or write failed; nothing durable changed
    EngineState,
    /// Engine record saved but queue record did not
    QueueState,
}

impl fmt::Display for CommitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitStage::EngineState => f.write_str("tournament state"),
            CommitStage::QueueState => f.write_str("registration queue"),
        }
    }
}

/// Coordinator errors
#[derive(Debug, Error)]
pub enum CoordinatorError {
    /// Caller-fixable queue error (duplicate, blank name, not found)
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Engine rejected the operation; message passed through unchanged
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Accept applied in memory but a record failed to save
    ///
    /// The entrant is back to pending while the engine roster (in memory,
    /// and on disk for [`CommitStage::QueueState`]) already holds the
    /// player. Not reconciled automatically.
    #[error("Accepting {name:?} was only partially saved ({stage}): {source}")]
    PartialCommit {
        name: String,
        stage: CommitStage,
        #[source]
        source: Box<CoordinatorError>,
    },
}

impl CoordinatorError {
    /// Whether this is a lookup miss on the pending list
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoordinatorError::Registration(RegistrationError::NotFound { .. })
        )
    }

    /// Whether the caller can fix this by changing the request
    pub fn is_validation(&self) -> bool {
        matches!(self, CoordinatorError::Registration(_))
    }

    /// Message safe to show to end users
    ///
    /// Storage errors are replaced so file paths and OS errors stay in the
    /// server log.
    pub fn client_message(&self) -> String {
        match self {
            CoordinatorError::Storage(_) => "Failed to save tournament data".to_string(),
            CoordinatorError::PartialCommit { name, .. } => format!(
                "Player {name:?} was added to the tournament but the change was not fully saved"
            ),
            _ => self.to_string(),
        }
    }
}

/// Result type for coordinator operations
pub type CoordinatorResult<T> = Result<T, CoordinatorError>;
