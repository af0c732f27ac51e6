//! Tournament engine error types.

use super::models::{PlayerId, TournamentStatus};
use thiserror::Error;

/// Errors raised by a tournament engine
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Player name must not be empty")]
    EmptyName,

    #[error("Player {0:?} is already in the tournament")]
    DuplicatePlayer(String),

    #[error("Unknown player id: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Tournament not in correct state: expected {expected}, got {actual}")]
    InvalidState {
        expected: TournamentStatus,
        actual: TournamentStatus,
    },

    #[error("Insufficient players: need {needed}, have {current}")]
    InsufficientPlayers { needed: usize, current: usize },

    #[error("No pairing without rematches exists for this round")]
    NoValidPairing,

    #[error("Results already recorded for round {0}; advance before pairing again")]
    ResultsAlreadyRecorded(u32),

    #[error("Round {0} has not been paired")]
    NotPaired(u32),

    #[error("Player {0} is not paired in the current round")]
    NotInRound(PlayerId),

    #[error("Player {0} has a bye this round")]
    ByeResult(PlayerId),

    #[error("Missing results for {missing} pairing(s) in round {round}")]
    IncompleteRound { round: u32, missing: usize },

    #[error("Invalid result: {0}")]
    InvalidResult(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
