//! Tournament engine capability and the bundled Swiss-system engine.
//!
//! The coordinator never touches engine internals: every mutation goes
//! through the verbs on [`TournamentEngine`], and persistence goes through
//! [`TournamentEngine::dump`] / [`TournamentEngine::load`]. Swapping the
//! engine (for a test double, or another pairing system) only requires a
//! new implementation of the trait.
//!
//! ## Example
//!
//! ```
//! use open_swiss::engine::{SwissTournament, TournamentEngine, TournamentStatus};
//!
//! let mut engine = SwissTournament::new();
//! let alice = engine.add_player("Alice").unwrap();
//! engine.add_player("Bob").unwrap();
//! engine.start().unwrap();
//!
//! assert_eq!(engine.status(), TournamentStatus::InProgress);
//! assert_eq!(engine.current_round(), 1);
//! assert_eq!(engine.player_name(alice), Some("Alice"));
//! ```

pub mod errors;
pub mod models;
pub mod swiss;

pub use errors::{EngineError, EngineResult};
pub use models::{
    BYE_PLAYER_ID, GameResult, MatchRecord, Pairing, Player, PlayerId, PlayerStanding,
    TournamentStatus,
};
pub use swiss::{MAX_GAMES_PER_MATCH, SwissTournament};

/// Narrow set of verbs the coordinator needs from a tournament engine
///
/// Mutations reject invalid state transitions with an [`EngineError`];
/// callers pass those through unchanged.
pub trait TournamentEngine: Send + Sync {
    /// Add a player and return the id the engine assigned
    fn add_player(&mut self, name: &str) -> EngineResult<PlayerId>;

    fn remove_player(&mut self, id: PlayerId) -> EngineResult<()>;

    /// Begin round one
    fn start(&mut self) -> EngineResult<()>;

    /// Pair the current round; `allow_repair` permits rematches
    fn pair(&mut self, allow_repair: bool) -> EngineResult<()>;

    fn next_round(&mut self) -> EngineResult<()>;

    /// Record a game score from one player's side only
    ///
    /// The opposing player's result is not cross-checked.
    fn record_result(
        &mut self,
        id: PlayerId,
        wins: u32,
        losses: u32,
        draws: u32,
    ) -> EngineResult<()>;

    /// Recompute cached standings; never runs implicitly
    fn update_standings(&mut self) -> EngineResult<()>;

    fn finish(&mut self) -> EngineResult<()>;

    /// Full roster, including removed players
    fn players(&self) -> &[Player];

    /// Pairings of the current round
    fn pairings(&self) -> &[Pairing];

    /// Standings as of the last [`TournamentEngine::update_standings`]
    fn standings(&self) -> &[PlayerStanding];

    fn status(&self) -> TournamentStatus;

    fn current_round(&self) -> u32;

    /// Export the full engine state
    fn dump(&self) -> EngineResult<Vec<u8>>;

    /// Rebuild an engine from [`TournamentEngine::dump`] output
    fn load(bytes: &[u8]) -> EngineResult<Self>
    where
        Self: Sized;

    /// Number of players still in the event
    fn player_count(&self) -> usize {
        self.players().iter().filter(|p| !p.removed).count()
    }

    fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.players().iter().find(|p| p.name == name).map(|p| p.id)
    }

    fn player_name(&self, id: PlayerId) -> Option<&str> {
        self.players()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.as_str())
    }
}
