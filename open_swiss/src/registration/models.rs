//! Registration queue data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a queue entry
///
/// `Accepted` and `Rejected` are terminal. Registering again after a
/// rejection creates a fresh entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrantStatus {
    /// Waiting for an organizer decision
    Pending,
    /// Added to the tournament roster
    Accepted,
    /// Turned down by an organizer
    Rejected,
}

impl EntrantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrantStatus::Pending => "pending",
            EntrantStatus::Accepted => "accepted",
            EntrantStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for EntrantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single registration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    /// Name exactly as submitted
    pub name: String,
    /// Current lifecycle status
    pub status: EntrantStatus,
    /// Submission timestamp (absent in records written by older versions)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Entrant {
    /// Create a new pending entry stamped with the current time
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: EntrantStatus::Pending,
            submitted_at: Some(Utc::now()),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == EntrantStatus::Pending
    }

    /// Whether this entry answers to `name` under lookup rules
    /// (case-insensitive, surrounding whitespace ignored)
    pub fn matches(&self, name: &str) -> bool {
        normalize(&self.name) == normalize(name)
    }
}

/// Normalized form used for name comparisons
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
