//! Public registration endpoint.
//!
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/register \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Alice"}'
//! ```

use axum::{Json, extract::State, http::StatusCode};
use open_swiss::EntrantStatus;
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState, with_coordinator};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub name: String,
    pub status: EntrantStatus,
    pub message: String,
}

/// Ask to join the tournament.
///
/// The request waits in the pending list until an organizer accepts or
/// rejects it.
///
/// # Errors
///
/// - `400 Bad Request`: blank name, name already pending, or already playing
/// - `500 Internal Server Error`: the registration could not be saved
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let name = request.name;
    let submitted = name.clone();
    with_coordinator(&state, move |coordinator| coordinator.submit_pending(&submitted)).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: format!("Registration for {name} received; waiting for organizer approval"),
            name,
            status: EntrantStatus::Pending,
        }),
    ))
}
