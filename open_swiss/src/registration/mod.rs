//! Registration queue for players waiting to join the tournament.
//!
//! Players submit their name, an organizer accepts or rejects it. Only
//! accepted players reach the tournament engine; the queue keeps a record
//! of every decision.

pub mod errors;
pub mod models;
pub mod queue;

pub use errors::{RegistrationError, RegistrationResult};
pub use models::{Entrant, EntrantStatus};
pub use queue::{PendingMatch, RegistrationQueue};
