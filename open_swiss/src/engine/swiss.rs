//! Swiss-system tournament engine.

use super::errors::{EngineError, EngineResult};
use super::models::{
    GameResult, MatchRecord, Pairing, Player, PlayerId, PlayerStanding, TournamentStatus,
};
use super::TournamentEngine;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::{HashMap, HashSet};

/// Points for a match win
const WIN_POINTS: u32 = 3;
/// Points for a drawn match
const DRAW_POINTS: u32 = 1;
/// Floor applied to match and game win percentages
const MIN_WIN_PCT: f64 = 1.0 / 3.0;
/// Fewest players a round can be paired with
const MIN_PLAYERS: usize = 2;
/// Most games a single reported match may contain
pub const MAX_GAMES_PER_MATCH: u32 = 99;
/// Pairing candidates tried per round before giving up
const PAIRING_SEARCH_LIMIT: usize = 100_000;

/// In-memory Swiss tournament
///
/// Match points are 3/1/0 and a bye scores as a 2-0 match win. Standings
/// rank by points, then opponent match-win %, game-win % and opponent
/// game-win %.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwissTournament {
    status: TournamentStatus,
    current_round: u32,
    last_id: PlayerId,
    players: Vec<Player>,
    pairings: Vec<Pairing>,
    history: Vec<MatchRecord>,
    standings: Vec<PlayerStanding>,
}

#[derive(Debug, Default)]
struct Tally {
    points: u32,
    wins: u32,
    losses: u32,
    draws: u32,
    game_wins: u32,
    game_losses: u32,
    game_draws: u32,
    matches: u32,
    opponents: Vec<PlayerId>,
}

impl Tally {
    // Saturating: a loaded state file is not bound by the result limit
    fn add(&mut self, result: GameResult) {
        self.matches = self.matches.saturating_add(1);
        self.game_wins = self.game_wins.saturating_add(result.wins);
        self.game_losses = self.game_losses.saturating_add(result.losses);
        self.game_draws = self.game_draws.saturating_add(result.draws);
        match result.wins.cmp(&result.losses) {
            Ordering::Greater => {
                self.wins = self.wins.saturating_add(1);
                self.points = self.points.saturating_add(WIN_POINTS);
            }
            Ordering::Equal => {
                self.draws = self.draws.saturating_add(1);
                self.points = self.points.saturating_add(DRAW_POINTS);
            }
            Ordering::Less => self.losses = self.losses.saturating_add(1),
        }
    }

    fn match_win_pct(&self) -> f64 {
        if self.matches == 0 {
            return 0.0;
        }
        let possible = f64::from(WIN_POINTS) * f64::from(self.matches);
        (f64::from(self.points) / possible).max(MIN_WIN_PCT)
    }

    fn game_win_pct(&self) -> f64 {
        let games =
            f64::from(self.game_wins) + f64::from(self.game_losses) + f64::from(self.game_draws);
        if games == 0.0 {
            return 0.0;
        }
        let game_points = f64::from(WIN_POINTS) * f64::from(self.game_wins)
            + f64::from(DRAW_POINTS) * f64::from(self.game_draws);
        (game_points / (f64::from(WIN_POINTS) * games)).max(MIN_WIN_PCT)
    }
}

fn match_points(result: GameResult) -> u32 {
    match result.wins.cmp(&result.losses) {
        Ordering::Greater => WIN_POINTS,
        Ordering::Equal => DRAW_POINTS,
        Ordering::Less => 0,
    }
}

fn match_key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
    (a.min(b), a.max(b))
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / f64::from(count) }
}

/// Backtracking pairing of `pool` in order, first player against the
/// highest-placed opponent it may still meet
///
/// Each candidate tried spends one unit of `budget`; the search gives up
/// once it is spent.
fn pair_up(
    pool: &[PlayerId],
    played: &HashSet<(PlayerId, PlayerId)>,
    allow_rematch: bool,
    budget: &mut usize,
) -> Option<Vec<Pairing>> {
    let Some((&first, rest)) = pool.split_first() else {
        return Some(Vec::new());
    };

    let allowed = |a: PlayerId, b: PlayerId| allow_rematch || !played.contains(&match_key(a, b));
    // Dead end if anyone left has no opponent they may still meet
    if !allow_rematch
        && pool
            .iter()
            .any(|&a| !pool.iter().any(|&b| a != b && allowed(a, b)))
    {
        return None;
    }

    for (i, &candidate) in rest.iter().enumerate() {
        if !allowed(first, candidate) {
            continue;
        }
        if *budget == 0 {
            return None;
        }
        *budget -= 1;

        let mut remaining = rest.to_vec();
        remaining.remove(i);
        if let Some(mut pairings) = pair_up(&remaining, played, allow_rematch, budget) {
            pairings.insert(0, Pairing::new(first, candidate));
            return Some(pairings);
        }
    }

    None
}

impl SwissTournament {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rounds already folded into history
    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }

    fn require_status(&self, expected: TournamentStatus) -> EngineResult<()> {
        if self.status != expected {
            return Err(EngineError::InvalidState {
                expected,
                actual: self.status,
            });
        }
        Ok(())
    }

    fn require_player(&self, id: PlayerId) -> EngineResult<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(EngineError::UnknownPlayer(id))
    }

    fn active_ids(&self) -> Vec<PlayerId> {
        self.players
            .iter()
            .filter(|p| !p.removed)
            .map(|p| p.id)
            .collect()
    }

    /// Match points from finished rounds
    fn history_points(&self) -> HashMap<PlayerId, u32> {
        let mut points = HashMap::new();
        for record in &self.history {
            let pairing = &record.pairing;
            for id in [pairing.player_a, pairing.player_b] {
                if let Some(result) = pairing.result_for(id) {
                    *points.entry(id).or_insert(0) += match_points(result);
                }
            }
        }
        points
    }

    fn build_pairings(&self, allow_repair: bool) -> EngineResult<Vec<Pairing>> {
        let mut active = self.active_ids();
        if active.len() < MIN_PLAYERS {
            return Err(EngineError::InsufficientPlayers {
                needed: MIN_PLAYERS,
                current: active.len(),
            });
        }

        if self.history.is_empty() {
            active.shuffle(&mut rand::rng());
        } else {
            let points = self.history_points();
            active.sort_by_key(|id| (Reverse(points.get(id).copied().unwrap_or(0)), *id));
        }

        let mut played = HashSet::new();
        let mut had_bye = HashSet::new();
        for record in &self.history {
            let pairing = &record.pairing;
            if pairing.is_bye() {
                had_bye.insert(pairing.player_a);
            } else {
                played.insert(match_key(pairing.player_a, pairing.player_b));
            }
        }

        let attempts: &[bool] = if allow_repair { &[false, true] } else { &[false] };
        for &allow_rematch in attempts {
            let mut budget = PAIRING_SEARCH_LIMIT;
            if active.len() % 2 == 0 {
                if let Some(pairings) = pair_up(&active, &played, allow_rematch, &mut budget) {
                    return Ok(pairings);
                }
                continue;
            }

            // Lowest-placed player without a previous bye sits out first
            let (fresh, repeat): (Vec<PlayerId>, Vec<PlayerId>) =
                active.iter().rev().partition(|id| !had_bye.contains(*id));
            for bye in fresh.into_iter().chain(repeat) {
                let pool: Vec<PlayerId> = active.iter().copied().filter(|id| *id != bye).collect();
                if let Some(mut pairings) = pair_up(&pool, &played, allow_rematch, &mut budget) {
                    pairings.push(Pairing::bye(bye));
                    return Ok(pairings);
                }
            }
        }

        Err(EngineError::NoValidPairing)
    }
}

impl TournamentEngine for SwissTournament {
    fn add_player(&mut self, name: &str) -> EngineResult<PlayerId> {
        if name.trim().is_empty() {
            return Err(EngineError::EmptyName);
        }
        if self.status == TournamentStatus::Completed {
            return Err(EngineError::InvalidState {
                expected: TournamentStatus::NotStarted,
                actual: self.status,
            });
        }
        if self.players.iter().any(|p| p.name == name) {
            return Err(EngineError::DuplicatePlayer(name.to_string()));
        }

        self.last_id += 1;
        self.players.push(Player {
            id: self.last_id,
            name: name.to_string(),
            removed: false,
        });
        Ok(self.last_id)
    }

    /// Marks the player removed; the name stays taken
    fn remove_player(&mut self, id: PlayerId) -> EngineResult<()> {
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == id && !p.removed)
            .ok_or(EngineError::UnknownPlayer(id))?;
        player.removed = true;
        Ok(())
    }

    fn start(&mut self) -> EngineResult<()> {
        self.require_status(TournamentStatus::NotStarted)?;
        let pairings = self.build_pairings(false)?;

        self.status = TournamentStatus::InProgress;
        self.current_round = 1;
        self.pairings = pairings;
        Ok(())
    }

    fn pair(&mut self, allow_repair: bool) -> EngineResult<()> {
        self.require_status(TournamentStatus::InProgress)?;
        if self
            .pairings
            .iter()
            .any(|p| !p.is_bye() && p.result.is_some())
        {
            return Err(EngineError::ResultsAlreadyRecorded(self.current_round));
        }

        self.pairings = self.build_pairings(allow_repair)?;
        Ok(())
    }

    fn next_round(&mut self) -> EngineResult<()> {
        self.require_status(TournamentStatus::InProgress)?;
        if self.pairings.is_empty() {
            return Err(EngineError::NotPaired(self.current_round));
        }
        let missing = self.pairings.iter().filter(|p| p.result.is_none()).count();
        if missing > 0 {
            return Err(EngineError::IncompleteRound {
                round: self.current_round,
                missing,
            });
        }

        let round = self.current_round;
        self.history.extend(
            self.pairings
                .drain(..)
                .map(|pairing| MatchRecord { round, pairing }),
        );
        self.current_round += 1;
        Ok(())
    }

    fn record_result(
        &mut self,
        id: PlayerId,
        wins: u32,
        losses: u32,
        draws: u32,
    ) -> EngineResult<()> {
        self.require_status(TournamentStatus::InProgress)?;
        let result = GameResult::new(wins, losses, draws);
        match result.games() {
            Some(0) => {
                return Err(EngineError::InvalidResult(
                    "a result must record at least one game".to_string(),
                ));
            }
            Some(games) if games <= MAX_GAMES_PER_MATCH => {}
            _ => {
                return Err(EngineError::InvalidResult(format!(
                    "a match has at most {MAX_GAMES_PER_MATCH} games"
                )));
            }
        }
        self.require_player(id)?;

        let pairing = self
            .pairings
            .iter_mut()
            .find(|p| p.involves(id))
            .ok_or(EngineError::NotInRound(id))?;
        if pairing.is_bye() {
            return Err(EngineError::ByeResult(id));
        }

        pairing.result = Some(if pairing.player_a == id {
            result
        } else {
            result.reversed()
        });
        Ok(())
    }

    fn update_standings(&mut self) -> EngineResult<()> {
        let mut tallies: HashMap<PlayerId, Tally> = self
            .players
            .iter()
            .map(|p| (p.id, Tally::default()))
            .collect();

        let decided = self
            .history
            .iter()
            .map(|record| &record.pairing)
            .chain(self.pairings.iter().filter(|p| p.result.is_some()));
        for pairing in decided {
            for id in [pairing.player_a, pairing.player_b] {
                let (Some(result), Some(opponent)) = (pairing.result_for(id), pairing.opponent_of(id))
                else {
                    continue;
                };
                if let Some(tally) = tallies.get_mut(&id) {
                    tally.add(result);
                    if !pairing.is_bye() {
                        tally.opponents.push(opponent);
                    }
                }
            }
        }

        let mut standings: Vec<PlayerStanding> = self
            .players
            .iter()
            .filter_map(|player| {
                let tally = tallies.get(&player.id)?;
                let opponents = || tally.opponents.iter().filter_map(|o| tallies.get(o));
                Some(PlayerStanding {
                    rank: 0,
                    player_id: player.id,
                    name: player.name.clone(),
                    points: tally.points,
                    wins: tally.wins,
                    losses: tally.losses,
                    draws: tally.draws,
                    game_wins: tally.game_wins,
                    game_losses: tally.game_losses,
                    game_draws: tally.game_draws,
                    opponent_match_win_pct: average(opponents().map(Tally::match_win_pct)),
                    game_win_pct: tally.game_win_pct(),
                    opponent_game_win_pct: average(opponents().map(Tally::game_win_pct)),
                    removed: player.removed,
                })
            })
            .collect();

        standings.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(b.opponent_match_win_pct.total_cmp(&a.opponent_match_win_pct))
                .then(b.game_win_pct.total_cmp(&a.game_win_pct))
                .then(b.opponent_game_win_pct.total_cmp(&a.opponent_game_win_pct))
                .then_with(|| a.name.cmp(&b.name))
        });
        for (index, standing) in standings.iter_mut().enumerate() {
            standing.rank = index + 1;
        }

        self.standings = standings;
        Ok(())
    }

    fn finish(&mut self) -> EngineResult<()> {
        self.require_status(TournamentStatus::InProgress)?;
        self.status = TournamentStatus::Completed;
        Ok(())
    }

    fn players(&self) -> &[Player] {
        &self.players
    }

    fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    fn standings(&self) -> &[PlayerStanding] {
        &self.standings
    }

    fn status(&self) -> TournamentStatus {
        self.status
    }

    fn current_round(&self) -> u32 {
        self.current_round
    }

    fn dump(&self) -> EngineResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    fn load(bytes: &[u8]) -> EngineResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BYE_PLAYER_ID;

    fn tournament_with(names: &[&str]) -> SwissTournament {
        let mut engine = SwissTournament::new();
        for name in names {
            engine.add_player(name).unwrap();
        }
        engine
    }

    /// Report every open table as a 2-0 win for `player_a`
    fn play_out_round(engine: &mut SwissTournament) {
        let tables: Vec<Pairing> = engine.pairings().to_vec();
        for pairing in tables.iter().filter(|p| !p.is_bye()) {
            engine.record_result(pairing.player_a, 2, 0, 0).unwrap();
        }
    }

    #[test]
    fn test_add_player_assigns_sequential_ids() {
        let mut engine = SwissTournament::new();
        assert_eq!(engine.add_player("Alice").unwrap(), 1);
        assert_eq!(engine.add_player("Bob").unwrap(), 2);
        assert_eq!(engine.player_id("Bob"), Some(2));
        assert_eq!(engine.player_name(1), Some("Alice"));
        assert_eq!(engine.player_count(), 2);
    }

    #[test]
    fn test_add_player_rejects_duplicates_and_blank() {
        let mut engine = tournament_with(&["Alice"]);
        assert!(matches!(
            engine.add_player("Alice"),
            Err(EngineError::DuplicatePlayer(_))
        ));
        assert!(matches!(engine.add_player("  "), Err(EngineError::EmptyName)));
        assert_eq!(engine.player_count(), 1);
    }

    #[test]
    fn test_start_requires_two_players() {
        let mut engine = tournament_with(&["Solo"]);
        let err = engine.start().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InsufficientPlayers {
                needed: 2,
                current: 1
            }
        ));
        assert_eq!(engine.status(), TournamentStatus::NotStarted);
    }

    #[test]
    fn test_start_pairs_round_one() {
        let mut engine = tournament_with(&["A", "B", "C", "D"]);
        engine.start().unwrap();

        assert_eq!(engine.status(), TournamentStatus::InProgress);
        assert_eq!(engine.current_round(), 1);
        assert_eq!(engine.pairings().len(), 2);

        let mut seated: Vec<PlayerId> = engine
            .pairings()
            .iter()
            .flat_map(|p| [p.player_a, p.player_b])
            .collect();
        seated.sort();
        assert_eq!(seated, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_pair_before_start_fails() {
        let mut engine = tournament_with(&["A", "B"]);
        assert!(matches!(
            engine.pair(false),
            Err(EngineError::InvalidState {
                expected: TournamentStatus::InProgress,
                actual: TournamentStatus::NotStarted
            })
        ));
    }

    #[test]
    fn test_odd_player_count_gets_bye() {
        let mut engine = tournament_with(&["A", "B", "C"]);
        engine.start().unwrap();

        let byes: Vec<&Pairing> = engine.pairings().iter().filter(|p| p.is_bye()).collect();
        assert_eq!(byes.len(), 1);
        assert_eq!(byes[0].player_b, BYE_PLAYER_ID);
        assert_eq!(byes[0].result, Some(GameResult::BYE));
    }

    #[test]
    fn test_bye_rotates_between_rounds() {
        let mut engine = tournament_with(&["A", "B", "C"]);
        engine.start().unwrap();
        let first_bye = engine.pairings().iter().find(|p| p.is_bye()).unwrap().player_a;

        play_out_round(&mut engine);
        engine.next_round().unwrap();
        engine.pair(false).unwrap();

        let second_bye = engine.pairings().iter().find(|p| p.is_bye()).unwrap().player_a;
        assert_ne!(first_bye, second_bye);
    }

    #[test]
    fn test_record_result_rejects_bye_and_unknown() {
        let mut engine = tournament_with(&["A", "B", "C"]);
        engine.start().unwrap();
        let bye = engine.pairings().iter().find(|p| p.is_bye()).unwrap().player_a;

        assert!(matches!(
            engine.record_result(bye, 2, 0, 0),
            Err(EngineError::ByeResult(_))
        ));
        assert!(matches!(
            engine.record_result(99, 2, 0, 0),
            Err(EngineError::UnknownPlayer(99))
        ));
        assert!(matches!(
            engine.record_result(1, 0, 0, 0),
            Err(EngineError::InvalidResult(_))
        ));
    }

    #[test]
    fn test_record_result_mirrors_onto_opponent() {
        let mut engine = tournament_with(&["A", "B"]);
        engine.start().unwrap();
        let pairing = engine.pairings()[0].clone();

        engine.record_result(pairing.player_b, 2, 1, 0).unwrap();

        let recorded = &engine.pairings()[0];
        assert_eq!(recorded.result_for(pairing.player_b), Some(GameResult::new(2, 1, 0)));
        assert_eq!(recorded.result_for(pairing.player_a), Some(GameResult::new(1, 2, 0)));
    }

    #[test]
    fn test_next_round_requires_all_results() {
        let mut engine = tournament_with(&["A", "B", "C", "D"]);
        engine.start().unwrap();
        let first = engine.pairings()[0].player_a;
        engine.record_result(first, 2, 0, 0).unwrap();

        assert!(matches!(
            engine.next_round(),
            Err(EngineError::IncompleteRound {
                round: 1,
                missing: 1
            })
        ));

        play_out_round(&mut engine);
        engine.next_round().unwrap();
        assert_eq!(engine.current_round(), 2);
        assert!(engine.pairings().is_empty());
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_pair_avoids_rematches() {
        let mut engine = tournament_with(&["A", "B", "C", "D"]);
        engine.start().unwrap();
        let round_one: HashSet<_> = engine
            .pairings()
            .iter()
            .map(|p| match_key(p.player_a, p.player_b))
            .collect();

        play_out_round(&mut engine);
        engine.next_round().unwrap();
        engine.pair(false).unwrap();

        for pairing in engine.pairings() {
            assert!(!round_one.contains(&match_key(pairing.player_a, pairing.player_b)));
        }
    }

    #[test]
    fn test_pair_without_repair_fails_when_exhausted() {
        let mut engine = tournament_with(&["A", "B"]);
        engine.start().unwrap();
        play_out_round(&mut engine);
        engine.next_round().unwrap();

        assert!(matches!(engine.pair(false), Err(EngineError::NoValidPairing)));
        engine.pair(true).unwrap();
        assert_eq!(engine.pairings().len(), 1);
    }

    #[test]
    fn test_pair_refuses_after_results() {
        let mut engine = tournament_with(&["A", "B"]);
        engine.start().unwrap();
        play_out_round(&mut engine);

        assert!(matches!(
            engine.pair(false),
            Err(EngineError::ResultsAlreadyRecorded(1))
        ));
    }

    #[test]
    fn test_standings_are_not_updated_implicitly() {
        let mut engine = tournament_with(&["A", "B"]);
        engine.start().unwrap();
        play_out_round(&mut engine);
        assert!(engine.standings().is_empty());

        engine.update_standings().unwrap();
        assert_eq!(engine.standings().len(), 2);
    }

    #[test]
    fn test_standings_rank_winner_first() {
        let mut engine = tournament_with(&["A", "B"]);
        engine.start().unwrap();
        let winner = engine.pairings()[0].player_a;
        engine.record_result(winner, 2, 1, 0).unwrap();
        engine.update_standings().unwrap();

        let top = &engine.standings()[0];
        assert_eq!(top.rank, 1);
        assert_eq!(top.player_id, winner);
        assert_eq!(top.points, 3);
        assert_eq!((top.wins, top.losses, top.draws), (1, 0, 0));
        assert_eq!((top.game_wins, top.game_losses), (2, 1));
        assert!((top.game_win_pct - 2.0 / 3.0).abs() < 1e-9);

        let bottom = &engine.standings()[1];
        assert_eq!(bottom.points, 0);
        assert!((bottom.game_win_pct - MIN_WIN_PCT).abs() < 1e-9);
        assert!((top.opponent_match_win_pct - MIN_WIN_PCT).abs() < 1e-9);
    }

    #[test]
    fn test_remove_player_before_and_after_start() {
        let mut engine = tournament_with(&["A", "B", "C", "D"]);
        engine.remove_player(4).unwrap();
        assert_eq!(engine.players().len(), 4);
        assert_eq!(engine.player_count(), 3);
        assert!(matches!(
            engine.add_player("D"),
            Err(EngineError::DuplicatePlayer(_))
        ));

        engine.start().unwrap();
        assert!(engine.pairings().iter().all(|p| !p.involves(4)));

        engine.remove_player(2).unwrap();
        assert_eq!(engine.players().len(), 4);
        assert_eq!(engine.player_count(), 2);
        assert!(matches!(
            engine.remove_player(2),
            Err(EngineError::UnknownPlayer(2))
        ));
    }

    #[test]
    fn test_record_result_rejects_oversized_counts() {
        let mut engine = tournament_with(&["A", "B"]);
        engine.start().unwrap();
        let player = engine.pairings()[0].player_a;

        assert!(matches!(
            engine.record_result(player, u32::MAX, 0, 0),
            Err(EngineError::InvalidResult(_))
        ));
        assert!(matches!(
            engine.record_result(player, u32::MAX, 1, 0),
            Err(EngineError::InvalidResult(_))
        ));
        assert!(matches!(
            engine.record_result(player, MAX_GAMES_PER_MATCH, 1, 0),
            Err(EngineError::InvalidResult(_))
        ));
        assert!(engine.pairings()[0].result.is_none());

        engine
            .record_result(player, MAX_GAMES_PER_MATCH, 0, 0)
            .unwrap();
        engine.update_standings().unwrap();
        assert_eq!(engine.standings()[0].game_wins, MAX_GAMES_PER_MATCH);
    }

    #[test]
    fn test_standings_survive_huge_loaded_counts() {
        let mut engine = tournament_with(&["A", "B"]);
        engine.start().unwrap();
        engine.pairings[0].result = Some(GameResult::new(u32::MAX, u32::MAX, u32::MAX));
        engine.next_round().unwrap();
        engine.pairings = vec![Pairing::new(1, 2)];
        engine.pairings[0].result = Some(GameResult::new(u32::MAX, 0, 0));

        engine.update_standings().unwrap();
        let top = &engine.standings()[0];
        assert_eq!(top.game_wins, u32::MAX);
        assert!(top.game_win_pct.is_finite());
        assert!(top.opponent_game_win_pct.is_finite());
    }

    #[test]
    fn test_pair_up_stops_when_budget_is_spent() {
        // Player 8 has met everyone, so no full pairing exists
        let pool: Vec<PlayerId> = (1..=8).collect();
        let played: HashSet<_> = (1..8).map(|id| match_key(id, 8)).collect();

        let mut budget = PAIRING_SEARCH_LIMIT;
        assert!(pair_up(&pool, &played, false, &mut budget).is_none());
        assert_eq!(budget, PAIRING_SEARCH_LIMIT);

        // 7 and 8 may only meet each other and are paired last
        let played: HashSet<_> = (1..7)
            .flat_map(|id| [match_key(id, 7), match_key(id, 8)])
            .collect();
        let mut budget = 3;
        assert!(pair_up(&pool, &played, false, &mut budget).is_none());
        assert_eq!(budget, 0);

        let mut budget = 4;
        let pairings = pair_up(&pool, &played, false, &mut budget).unwrap();
        assert_eq!(pairings.last(), Some(&Pairing::new(7, 8)));

        let mut budget = 0;
        assert!(pair_up(&pool, &HashSet::new(), false, &mut budget).is_none());
    }

    #[test]
    fn test_large_field_pairs_within_search_limit() {
        let names: Vec<String> = (1..=64).map(|i| format!("P{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut engine = tournament_with(&refs);
        engine.start().unwrap();

        for _ in 0..5 {
            play_out_round(&mut engine);
            engine.next_round().unwrap();
            engine.pair(false).unwrap();
        }
        assert_eq!(engine.pairings().len(), 32);
    }

    #[test]
    fn test_finish_closes_registration() {
        let mut engine = tournament_with(&["A", "B"]);
        engine.start().unwrap();
        engine.finish().unwrap();

        assert_eq!(engine.status(), TournamentStatus::Completed);
        assert!(matches!(
            engine.add_player("Late"),
            Err(EngineError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_dump_and_load_preserve_state() {
        let mut engine = tournament_with(&["A", "B", "C"]);
        engine.start().unwrap();
        play_out_round(&mut engine);
        engine.update_standings().unwrap();

        let restored = SwissTournament::load(&engine.dump().unwrap()).unwrap();
        assert_eq!(restored.players(), engine.players());
        assert_eq!(restored.pairings(), engine.pairings());
        assert_eq!(restored.status(), engine.status());
        assert_eq!(restored.current_round(), engine.current_round());

        let ranks = |e: &SwissTournament| -> Vec<(usize, PlayerId, u32)> {
            e.standings()
                .iter()
                .map(|s| (s.rank, s.player_id, s.points))
                .collect()
        };
        assert_eq!(ranks(&restored), ranks(&engine));
    }

    #[test]
    fn test_load_rejects_garbage() {
        assert!(matches!(
            SwissTournament::load(b"not json"),
            Err(EngineError::Serialization(_))
        ));
    }
}
