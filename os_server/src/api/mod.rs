//! HTTP JSON API for tournament registration and administration.
//!
//! Handlers never touch tournament state directly: every call goes through
//! the shared [`StateCoordinator`](open_swiss::StateCoordinator), which is
//! synchronous and writes to disk under its lock, so calls are moved onto
//! the blocking thread pool.
//!
//! # Modules
//!
//! - [`registration`]: public registration requests
//! - [`tournament`]: public read-only views (standings, pairings, status)
//! - [`admin`]: organizer actions (accept/reject, round lifecycle, results)
//! - [`middleware`]: bearer-token guard for admin routes
//! - [`request_id`]: request correlation ids
//!
//! # Endpoints Overview
//!
//! ```text
//! GET  /health                          - Health check (public)
//! POST /api/v1/register                 - Request to join (public)
//! GET  /api/v1/tournament               - Status, round, player count (public)
//! GET  /api/v1/pairings                 - Current round pairings (public)
//! GET  /api/v1/standings                - Last computed standings (public)
//! GET  /api/v1/admin/dashboard          - Full snapshot (admin)
//! GET  /api/v1/admin/pending            - Pending registrations (admin)
//! POST /api/v1/admin/accept             - Accept a pending player (admin)
//! POST /api/v1/admin/reject             - Reject a pending player (admin)
//! POST /api/v1/admin/start              - Start and pair round one (admin)
//! POST /api/v1/admin/pair               - Re-pair the current round (admin)
//! POST /api/v1/admin/next-round         - Close the round (admin)
//! POST /api/v1/admin/results            - Record a result (admin)
//! POST /api/v1/admin/standings          - Recompute standings (admin)
//! POST /api/v1/admin/remove-player      - Drop a player (admin)
//! POST /api/v1/admin/finish             - Complete the tournament (admin)
//! ```

pub mod admin;
pub mod middleware;
pub mod registration;
pub mod request_id;
pub mod tournament;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use open_swiss::{
    CoordinatorError, CoordinatorResult, EngineError, StateCoordinator, SwissTournament,
    storage::PersistenceGateway,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Coordinator type served by the API
pub type Coordinator = StateCoordinator<SwissTournament, Box<dyn PersistenceGateway>>;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; both fields are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
    /// Bearer token expected on admin routes
    pub admin_token: Arc<str>,
}

impl AppState {
    pub fn new(coordinator: Coordinator, admin_token: impl Into<Arc<str>>) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            admin_token: admin_token.into(),
        }
    }
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Handler error carrying the status code and a client-safe message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl From<CoordinatorError> for ApiError {
    fn from(err: CoordinatorError) -> Self {
        let status = match &err {
            _ if err.is_not_found() => StatusCode::NOT_FOUND,
            CoordinatorError::Registration(_) => StatusCode::BAD_REQUEST,
            CoordinatorError::Engine(EngineError::Serialization(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CoordinatorError::Engine(_) => StatusCode::BAD_REQUEST,
            CoordinatorError::Storage(_) | CoordinatorError::PartialCommit { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %err, "Coordinator operation failed");
        }

        Self {
            status,
            message: err.client_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Run `f` against the coordinator on the blocking pool
pub(crate) async fn with_coordinator<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Coordinator) -> CoordinatorResult<T> + Send + 'static,
    T: Send + 'static,
{
    let coordinator = state.coordinator.clone();
    tokio::task::spawn_blocking(move || f(&coordinator))
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "Coordinator task failed");
            ApiError::internal()
        })?
        .map_err(ApiError::from)
}

/// Run a read-only query against the coordinator on the blocking pool
pub(crate) async fn read_coordinator<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Coordinator) -> T + Send + 'static,
    T: Send + 'static,
{
    with_coordinator(state, move |coordinator| Ok(f(coordinator))).await
}

/// Create the complete API router with all endpoints and middleware.
///
/// # Example
///
/// ```rust,no_run
/// # use os_server::api::{create_router, AppState};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let state: AppState = unimplemented!();
/// let app = create_router(state);
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(state: AppState) -> Router {
    let v1_routes = create_v1_router(state.clone());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", v1_routes)
        .layer(axum::middleware::from_fn(request_id::request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn create_v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/register", post(registration::register))
        .route("/tournament", get(tournament::summary))
        .route("/pairings", get(tournament::pairings))
        .route("/standings", get(tournament::standings));

    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/pending", get(admin::pending))
        .route("/accept", post(admin::accept))
        .route("/reject", post(admin::reject))
        .route("/start", post(admin::start))
        .route("/pair", post(admin::pair))
        .route("/next-round", post(admin::next_round))
        .route("/results", post(admin::record_result))
        .route("/standings", post(admin::update_standings))
        .route("/remove-player", post(admin::remove_player))
        .route("/finish", post(admin::finish))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admin_auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .nest("/admin", admin_routes)
}

/// Health check endpoint for monitoring and load balancers.
///
/// Reports the tournament status and round alongside the server version.
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"healthy","tournament":"in_progress","round":2,...}
/// ```
async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let (status, round) = read_coordinator(&state, |coordinator| {
        (coordinator.status(), coordinator.current_round())
    })
    .await?;

    let response = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "tournament": status,
        "round": round,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    Ok((StatusCode::OK, Json(response)))
}
