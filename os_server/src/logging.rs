//! Structured logging configuration.
//!
//! Records emitted by the library through the `log` facade are picked up by
//! the same subscriber.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging
///
/// Log levels come from `RUST_LOG`, defaulting to `info`.
///
/// # Example
///
/// ```no_run
/// use os_server::logging;
///
/// logging::init();
/// tracing::info!("Server starting");
/// ```
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log an organizer action against the tournament
pub fn log_admin_action(action: &str, subject: Option<&str>, outcome: Result<(), &str>) {
    match outcome {
        Ok(()) => tracing::info!(action = action, subject = subject, "ADMIN: action applied"),
        Err(reason) => tracing::warn!(
            action = action,
            subject = subject,
            reason = reason,
            "ADMIN: action refused"
        ),
    }
}
