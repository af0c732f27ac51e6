//! Ordered queue of registration requests.

use super::errors::{RegistrationError, RegistrationResult};
use super::models::{Entrant, EntrantStatus, normalize};
use serde::{Deserialize, Serialize};

/// A pending entry located by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMatch {
    /// Index of the entry in the queue
    pub position: usize,
    /// Name exactly as it was submitted
    pub name: String,
}

/// Registration queue
///
/// Entries are never removed once committed; accept and reject only change
/// their status. Persistence is the owner's responsibility.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationQueue {
    entries: Vec<Entrant>,
}

impl RegistrationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a queue from persisted entries
    pub fn from_entries(entries: Vec<Entrant>) -> Self {
        Self { entries }
    }

    /// Append a pending entry for `name`
    ///
    /// `in_roster` reports whether the name is already a tournament player.
    /// Returns the position of the new entry.
    pub fn submit(
        &mut self,
        name: &str,
        in_roster: impl FnOnce(&str) -> bool,
    ) -> RegistrationResult<usize> {
        if name.trim().is_empty() {
            return Err(RegistrationError::EmptyName);
        }

        let key = normalize(name);
        if self
            .entries
            .iter()
            .any(|e| e.is_pending() && normalize(&e.name) == key)
        {
            return Err(RegistrationError::AlreadyPending(name.to_string()));
        }

        if in_roster(name) {
            return Err(RegistrationError::AlreadyActive(name.to_string()));
        }

        self.entries.push(Entrant::pending(name));
        Ok(self.entries.len() - 1)
    }

    /// All pending entries in submission order
    pub fn list_pending(&self) -> Vec<Entrant> {
        self.pending().cloned().collect()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Entrant> {
        self.entries.iter().filter(|e| e.is_pending())
    }

    /// Find a pending entry, ignoring case and surrounding whitespace
    pub fn find_pending(&self, name: &str) -> RegistrationResult<PendingMatch> {
        self.locate(name, |entrant| entrant.matches(name))
    }

    /// Find a pending entry whose stored name equals `name` exactly
    pub fn find_pending_exact(&self, name: &str) -> RegistrationResult<PendingMatch> {
        self.locate(name, |entrant| entrant.name == name)
    }

    fn locate(
        &self,
        name: &str,
        predicate: impl Fn(&Entrant) -> bool,
    ) -> RegistrationResult<PendingMatch> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.is_pending() && predicate(e))
            .map(|(position, e)| PendingMatch {
                position,
                name: e.name.clone(),
            })
            .ok_or_else(|| RegistrationError::NotFound {
                name: name.to_string(),
                pending: self.pending().map(|e| e.name.clone()).collect(),
            })
    }

    /// Overwrite the status at `position` without transition checks
    pub fn mark_status(&mut self, position: usize, status: EntrantStatus) -> RegistrationResult<()> {
        let entrant = self
            .entries
            .get_mut(position)
            .ok_or(RegistrationError::InvalidPosition(position))?;
        entrant.status = status;
        Ok(())
    }

    /// Drop the entry at `position`, used to undo an uncommitted submit
    pub(crate) fn discard(&mut self, position: usize) -> Option<Entrant> {
        (position < self.entries.len()).then(|| self.entries.remove(position))
    }

    pub fn entries(&self) -> &[Entrant] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
