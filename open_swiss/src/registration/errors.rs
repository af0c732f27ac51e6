//! Registration error types.

use thiserror::Error;

/// Registration queue errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Name was empty after trimming
    #[error("Name is required")]
    EmptyName,

    /// An entry with this name is already waiting for review
    #[error("player {0} is already pending")]
    AlreadyPending(String),

    /// The name is already on the tournament roster
    #[error("player {0} is already in the tournament")]
    AlreadyActive(String),

    /// No pending entry matched the lookup
    #[error("{}", not_found_message(.name, .pending))]
    NotFound {
        /// Name as supplied by the caller
        name: String,
        /// Names currently pending, for diagnostics
        pending: Vec<String>,
    },

    /// Position does not address an entry
    #[error("Invalid queue position: {0}")]
    InvalidPosition(usize),
}

fn not_found_message(name: &str, pending: &[String]) -> String {
    if pending.is_empty() {
        return format!("player {name:?} not found in pending list (no pending players)");
    }

    let available = pending
        .iter()
        .map(|p| format!("{p:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("player {name:?} not found in pending list. Available: {available}")
}

/// Result type for registration operations
pub type RegistrationResult<T> = Result<T, RegistrationError>;
