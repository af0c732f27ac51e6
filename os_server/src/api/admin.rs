//! Organizer endpoints.
//!
//! All routes here sit behind [`admin_auth_middleware`](super::middleware::admin_auth_middleware).
//! Engine refusals (pairing before start, unknown player, incomplete round)
//! come back as `400 Bad Request` with the engine's message unchanged.
//!
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/admin/accept \
//!   -H "Authorization: Bearer $ADMIN_TOKEN" \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "alice"}'
//! ```

use axum::{Json, body::Bytes, extract::State};
use open_swiss::coordinator::TournamentSnapshot;
use open_swiss::{Entrant, EntrantStatus, PlayerId, TournamentStatus};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState, read_coordinator, with_coordinator};
use crate::logging::log_admin_action;

#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PairRequest {
    #[serde(default)]
    pub allow_repair: bool,
}

#[derive(Debug, Deserialize)]
pub struct ResultRequest {
    pub player_id: PlayerId,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub draws: u32,
}

#[derive(Debug, Deserialize)]
pub struct RemovePlayerRequest {
    pub player_id: PlayerId,
}

#[derive(Debug, Serialize)]
pub struct AcceptResponse {
    pub name: String,
    pub player_id: PlayerId,
}

#[derive(Debug, Serialize)]
pub struct RejectResponse {
    pub name: String,
    pub status: EntrantStatus,
}

/// Tournament position after a lifecycle action
#[derive(Debug, Serialize)]
pub struct LifecycleResponse {
    pub status: TournamentStatus,
    pub round: u32,
}

/// Trimmed, non-blank name from a request body
fn required_name(request: NameRequest) -> Result<String, ApiError> {
    let name = request.name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }
    Ok(name.to_string())
}

/// Log the outcome of an admin action and pass it through
fn logged<T>(
    action: &str,
    subject: Option<&str>,
    result: Result<T, ApiError>,
) -> Result<T, ApiError> {
    match &result {
        Ok(_) => log_admin_action(action, subject, Ok(())),
        Err(err) => log_admin_action(action, subject, Err(err.message.as_str())),
    }
    result
}

async fn lifecycle(state: &AppState) -> Result<Json<LifecycleResponse>, ApiError> {
    let response = read_coordinator(state, |coordinator| LifecycleResponse {
        status: coordinator.status(),
        round: coordinator.current_round(),
    })
    .await?;
    Ok(Json(response))
}

/// Everything the organizer dashboard shows, read consistently.
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<TournamentSnapshot>, ApiError> {
    let snapshot = read_coordinator(&state, |coordinator| coordinator.snapshot()).await?;
    Ok(Json(snapshot))
}

/// Registrations waiting for a decision, oldest first.
pub async fn pending(State(state): State<AppState>) -> Result<Json<Vec<Entrant>>, ApiError> {
    let pending = read_coordinator(&state, |coordinator| coordinator.list_pending()).await?;
    Ok(Json(pending))
}

/// Accept a pending registration.
///
/// The name is matched ignoring case and surrounding whitespace; the player
/// joins under the name as originally submitted.
///
/// # Errors
///
/// - `400 Bad Request`: blank name, or the engine refused the player
/// - `404 Not Found`: no pending registration matches; lists pending names
/// - `500 Internal Server Error`: the change was not fully saved
pub async fn accept(
    State(state): State<AppState>,
    Json(request): Json<NameRequest>,
) -> Result<Json<AcceptResponse>, ApiError> {
    let name = required_name(request)?;
    let lookup = name.clone();
    let result = with_coordinator(&state, move |coordinator| {
        let player_id = coordinator.accept(&lookup)?;
        let name = coordinator.player_name(player_id).unwrap_or(lookup);
        Ok(AcceptResponse { name, player_id })
    })
    .await;

    logged("accept", Some(&name), result).map(Json)
}

/// Reject a pending registration; the name must match exactly.
pub async fn reject(
    State(state): State<AppState>,
    Json(request): Json<NameRequest>,
) -> Result<Json<RejectResponse>, ApiError> {
    let name = required_name(request)?;
    let target = name.clone();
    let result = with_coordinator(&state, move |coordinator| coordinator.reject(&target)).await;

    logged("reject", Some(&name), result)?;
    Ok(Json(RejectResponse {
        name,
        status: EntrantStatus::Rejected,
    }))
}

/// Start the tournament and pair round one.
pub async fn start(State(state): State<AppState>) -> Result<Json<LifecycleResponse>, ApiError> {
    let result = with_coordinator(&state, |coordinator| coordinator.start_tournament()).await;
    logged("start", None, result)?;
    lifecycle(&state).await
}

/// Replace the current round's pairings.
///
/// Allowed only before any result of the round is recorded. Rematches are
/// used only when `allow_repair` is set and no other pairing exists. The
/// body is optional.
pub async fn pair(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<LifecycleResponse>, ApiError> {
    let request: PairRequest = if body.is_empty() {
        PairRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|err| ApiError::bad_request(format!("Invalid pair request: {err}")))?
    };
    let result = with_coordinator(&state, move |coordinator| {
        coordinator.pair_round(request.allow_repair)
    })
    .await;
    logged("pair", None, result)?;
    lifecycle(&state).await
}

/// Close the current round once every table has a result.
///
/// The next round is not paired automatically.
pub async fn next_round(
    State(state): State<AppState>,
) -> Result<Json<LifecycleResponse>, ApiError> {
    let result = with_coordinator(&state, |coordinator| coordinator.next_round()).await;
    logged("next_round", None, result)?;
    lifecycle(&state).await
}

/// Record a game score from one player's side.
///
/// The opponent receives the mirrored score. A second report for the same
/// table overwrites the first; conflicting reports are not detected.
pub async fn record_result(
    State(state): State<AppState>,
    Json(request): Json<ResultRequest>,
) -> Result<Json<LifecycleResponse>, ApiError> {
    let subject = request.player_id.to_string();
    let result = with_coordinator(&state, move |coordinator| {
        coordinator.record_result(request.player_id, request.wins, request.losses, request.draws)
    })
    .await;
    logged("record_result", Some(&subject), result)?;
    lifecycle(&state).await
}

/// Recompute standings from every recorded result.
pub async fn update_standings(
    State(state): State<AppState>,
) -> Result<Json<LifecycleResponse>, ApiError> {
    let result = with_coordinator(&state, |coordinator| coordinator.update_standings()).await;
    logged("update_standings", None, result)?;
    lifecycle(&state).await
}

/// Drop a player from the tournament.
///
/// Their registration stays accepted and the name stays on the roster, so
/// it cannot be registered again.
pub async fn remove_player(
    State(state): State<AppState>,
    Json(request): Json<RemovePlayerRequest>,
) -> Result<Json<LifecycleResponse>, ApiError> {
    let subject = request.player_id.to_string();
    let result = with_coordinator(&state, move |coordinator| {
        coordinator.remove_player(request.player_id)
    })
    .await;
    logged("remove_player", Some(&subject), result)?;
    lifecycle(&state).await
}

/// Mark the tournament completed.
pub async fn finish(State(state): State<AppState>) -> Result<Json<LifecycleResponse>, ApiError> {
    let result = with_coordinator(&state, |coordinator| coordinator.finish_tournament()).await;
    logged("finish", None, result)?;
    lifecycle(&state).await
}
