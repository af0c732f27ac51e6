//! Tournament registration server.
//!
//! Loads the tournament and registration queue from the data directory,
//! then serves the JSON API until Ctrl+C.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Error};
use log::info;
use open_swiss::StateCoordinator;
use open_swiss::storage::{FileGateway, PersistenceGateway};
use os_server::{api, config::ServerConfig, logging};
use pico_args::Arguments;

const HELP: &str = "\
Run a Swiss-system tournament registration server

USAGE:
  os_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --data-dir   PATH        Directory for tournament data  [default: env DATA_DIR or data]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  DATA_DIR                 Directory holding tournament.json and pending_players.json
  ADMIN_TOKEN              Bearer token for /api/v1/admin routes
  ROLLBACK_POLICY          uniform (default) or accept-only
  RUST_LOG                 Log filter (default: info)
";

struct Args {
    bind: Option<SocketAddr>,
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        data_dir: pargs.opt_value_from_str("--data-dir")?,
    };

    logging::init();

    let config = ServerConfig::from_env(args.bind, args.data_dir)?;
    config.validate()?;

    info!(
        "Loading tournament data from {}",
        config.storage.data_dir().display()
    );
    let gateway: Box<dyn PersistenceGateway> = Box::new(FileGateway::new(config.storage.clone()));
    let coordinator: api::Coordinator = StateCoordinator::open(gateway)
        .context("Failed to load tournament data")?
        .with_rollback_policy(config.rollback_policy);

    let state = api::AppState::new(coordinator, config.admin_token.as_str());
    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {err}");
        std::future::pending::<()>().await;
    }
}
