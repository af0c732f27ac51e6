//! Public read-only tournament views.

use axum::{Json, extract::State};
use open_swiss::TournamentStatus;
use open_swiss::coordinator::PairingView;
use open_swiss::engine::{PlayerStanding, TournamentEngine};
use serde::Serialize;

use super::{ApiError, AppState, read_coordinator};

#[derive(Debug, Serialize)]
pub struct TournamentSummary {
    pub status: TournamentStatus,
    pub round: u32,
    pub player_count: usize,
    pub pending_count: usize,
}

#[derive(Debug, Serialize)]
pub struct PairingsResponse {
    pub round: u32,
    pub pairings: Vec<PairingView>,
}

/// Tournament status, current round and head counts.
pub async fn summary(State(state): State<AppState>) -> Result<Json<TournamentSummary>, ApiError> {
    let summary = read_coordinator(&state, |coordinator| {
        coordinator.read(|engine, queue| TournamentSummary {
            status: engine.status(),
            round: engine.current_round(),
            player_count: engine.player_count(),
            pending_count: queue.pending().count(),
        })
    })
    .await?;

    Ok(Json(summary))
}

/// Pairings for the current round with player names resolved.
///
/// A bye shows `"Bye"` as the opponent.
pub async fn pairings(State(state): State<AppState>) -> Result<Json<PairingsResponse>, ApiError> {
    let response = read_coordinator(&state, |coordinator| {
        coordinator.read(|engine, _| PairingsResponse {
            round: engine.current_round(),
            pairings: engine
                .pairings()
                .iter()
                .map(|pairing| PairingView::resolve(pairing, engine))
                .collect(),
        })
    })
    .await?;

    Ok(Json(response))
}

/// Standings as of the last recomputation.
///
/// Recording results does not refresh these; an organizer does that
/// explicitly.
pub async fn standings(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerStanding>>, ApiError> {
    let standings = read_coordinator(&state, |coordinator| coordinator.standings()).await?;
    Ok(Json(standings))
}
