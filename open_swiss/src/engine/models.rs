//! Tournament engine data models.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Player ID type, assigned by the engine
pub type PlayerId = i64;

/// Opponent id marking a bye in a pairing
pub const BYE_PLAYER_ID: PlayerId = -1;

/// Tournament lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting players, no rounds yet
    #[default]
    NotStarted,
    /// Rounds are being played
    InProgress,
    /// Tournament finished
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::NotStarted => "not_started",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Dropped from the event; kept for match history
    #[serde(default)]
    pub removed: bool,
}

/// Game score of a match, from `player_a`'s side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl GameResult {
    /// Score awarded for a bye
    pub const BYE: GameResult = GameResult {
        wins: 2,
        losses: 0,
        draws: 0,
    };

    pub fn new(wins: u32, losses: u32, draws: u32) -> Self {
        Self {
            wins,
            losses,
            draws,
        }
    }

    /// Same result seen from the other side of the table
    pub fn reversed(self) -> Self {
        Self {
            wins: self.losses,
            losses: self.wins,
            draws: self.draws,
        }
    }

    /// Games played, `None` if the count does not fit a `u32`
    pub fn games(&self) -> Option<u32> {
        self.wins
            .checked_add(self.losses)?
            .checked_add(self.draws)
    }
}

/// One table in a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub player_a: PlayerId,
    /// [`BYE_PLAYER_ID`] when `player_a` has a bye
    pub player_b: PlayerId,
    /// Result from `player_a`'s side, once recorded
    pub result: Option<GameResult>,
}

impl Pairing {
    pub fn new(player_a: PlayerId, player_b: PlayerId) -> Self {
        Self {
            player_a,
            player_b,
            result: None,
        }
    }

    /// Bye pairing, pre-scored
    pub fn bye(player: PlayerId) -> Self {
        Self {
            player_a: player,
            player_b: BYE_PLAYER_ID,
            result: Some(GameResult::BYE),
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player_b == BYE_PLAYER_ID
    }

    pub fn involves(&self, id: PlayerId) -> bool {
        self.player_a == id || self.player_b == id
    }

    /// Opponent of `id`, if `id` sits at this table
    pub fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        if self.player_a == id {
            Some(self.player_b)
        } else if self.player_b == id {
            Some(self.player_a)
        } else {
            None
        }
    }

    /// Result from `id`'s side
    pub fn result_for(&self, id: PlayerId) -> Option<GameResult> {
        let result = self.result?;
        if self.player_a == id {
            Some(result)
        } else if self.player_b == id {
            Some(result.reversed())
        } else {
            None
        }
    }
}

/// A pairing from a finished round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub round: u32,
    pub pairing: Pairing,
}

/// Cached standings row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStanding {
    /// 1-indexed
    pub rank: usize,
    pub player_id: PlayerId,
    pub name: String,
    pub points: u32,
    /// Match wins
    pub wins: u32,
    /// Match losses
    pub losses: u32,
    /// Match draws
    pub draws: u32,
    pub game_wins: u32,
    pub game_losses: u32,
    pub game_draws: u32,
    pub opponent_match_win_pct: f64,
    pub game_win_pct: f64,
    pub opponent_game_win_pct: f64,
    pub removed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairing_result_for_both_sides() {
        let mut pairing = Pairing::new(1, 2);
        pairing.result = Some(GameResult::new(2, 1, 0));

        assert_eq!(pairing.result_for(1), Some(GameResult::new(2, 1, 0)));
        assert_eq!(pairing.result_for(2), Some(GameResult::new(1, 2, 0)));
        assert_eq!(pairing.result_for(3), None);
    }

    #[test]
    fn test_bye_pairing() {
        let pairing = Pairing::bye(4);
        assert!(pairing.is_bye());
        assert_eq!(pairing.opponent_of(4), Some(BYE_PLAYER_ID));
        assert_eq!(pairing.result, Some(GameResult::BYE));
    }

    #[test]
    fn test_games_reports_overflow() {
        assert_eq!(GameResult::new(2, 1, 1).games(), Some(4));
        assert_eq!(GameResult::new(u32::MAX, 1, 0).games(), None);
    }

    #[test]
    fn test_status_display_matches_wire_names() {
        assert_eq!(TournamentStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            serde_json::to_string(&TournamentStatus::NotStarted).unwrap(),
            "\"not_started\""
        );
    }
}
