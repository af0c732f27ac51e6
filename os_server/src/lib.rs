//! HTTP server for Swiss-system tournament registration and administration.
//!
//! The binary wires these modules together; they are exposed as a library
//! so the router can be exercised in integration tests.

pub mod api;
pub mod config;
pub mod logging;
