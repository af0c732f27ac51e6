//! Consistent read-only views over the coordinated state.

use crate::engine::{
    GameResult, Pairing, Player, PlayerId, PlayerStanding, TournamentEngine, TournamentStatus,
};
use crate::registration::{Entrant, RegistrationQueue};
use serde::Serialize;

/// Label shown in place of an opponent name for a bye
pub const BYE_LABEL: &str = "Bye";

/// Pairing with player names resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairingView {
    pub player_a_id: PlayerId,
    pub player_a: String,
    pub player_b_id: PlayerId,
    pub player_b: String,
    pub is_bye: bool,
    pub result: Option<GameResult>,
}

impl PairingView {
    pub fn resolve(pairing: &Pairing, engine: &impl TournamentEngine) -> Self {
        let name_of = |id| engine.player_name(id).unwrap_or_default().to_string();
        let is_bye = pairing.is_bye();
        Self {
            player_a_id: pairing.player_a,
            player_a: name_of(pairing.player_a),
            player_b_id: pairing.player_b,
            player_b: if is_bye {
                BYE_LABEL.to_string()
            } else {
                name_of(pairing.player_b)
            },
            is_bye,
            result: pairing.result,
        }
    }
}

/// Everything an organizer dashboard shows, read under one lock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TournamentSnapshot {
    pub status: TournamentStatus,
    pub round: u32,
    pub player_count: usize,
    /// Players still in the event
    pub players: Vec<Player>,
    pub pending: Vec<Entrant>,
    pub pairings: Vec<PairingView>,
    pub standings: Vec<PlayerStanding>,
}

impl TournamentSnapshot {
    pub fn capture(engine: &impl TournamentEngine, queue: &RegistrationQueue) -> Self {
        Self {
            status: engine.status(),
            round: engine.current_round(),
            player_count: engine.player_count(),
            players: engine
                .players()
                .iter()
                .filter(|p| !p.removed)
                .cloned()
                .collect(),
            pending: queue.list_pending(),
            pairings: engine
                .pairings()
                .iter()
                .map(|p| PairingView::resolve(p, engine))
                .collect(),
            standings: engine.standings().to_vec(),
        }
    }
}
