//! Test doubles that fail on demand.

use crate::engine::{
    EngineError, EngineResult, Pairing, Player, PlayerId, PlayerStanding, SwissTournament,
    TournamentEngine, TournamentStatus,
};
use crate::storage::{MemoryGateway, PersistenceGateway, StorageError, StorageResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory gateway whose writes can be switched to fail
#[derive(Debug, Default)]
pub struct FlakyGateway {
    inner: MemoryGateway,
    fail_tournament: AtomicBool,
    fail_queue: AtomicBool,
}

impl FlakyGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_tournament_writes(&self, fail: bool) {
        self.fail_tournament.store(fail, Ordering::SeqCst);
    }

    pub fn fail_queue_writes(&self, fail: bool) {
        self.fail_queue.store(fail, Ordering::SeqCst);
    }

    pub fn tournament_bytes(&self) -> Option<Vec<u8>> {
        self.inner.tournament_bytes()
    }

    pub fn queue_bytes(&self) -> Option<Vec<u8>> {
        self.inner.queue_bytes()
    }
}

impl PersistenceGateway for FlakyGateway {
    fn read_tournament(&self) -> StorageResult<Option<Vec<u8>>> {
        self.inner.read_tournament()
    }

    fn write_tournament(&self, data: &[u8]) -> StorageResult<()> {
        if self.fail_tournament.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("tournament write disabled".into()));
        }
        self.inner.write_tournament(data)
    }

    fn read_queue(&self) -> StorageResult<Option<Vec<u8>>> {
        self.inner.read_queue()
    }

    fn write_queue(&self, data: &[u8]) -> StorageResult<()> {
        if self.fail_queue.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("queue write disabled".into()));
        }
        self.inner.write_queue(data)
    }
}

/// Swiss engine whose `add_player` can be switched to fail
#[derive(Debug, Default)]
pub struct FlakyEngine {
    inner: SwissTournament,
    fail_add: Arc<AtomicBool>,
}

impl FlakyEngine {
    /// Shared switch; stays usable after the engine moves into a coordinator
    pub fn fail_add_flag(&self) -> Arc<AtomicBool> {
        self.fail_add.clone()
    }
}

impl TournamentEngine for FlakyEngine {
    fn add_player(&mut self, name: &str) -> EngineResult<PlayerId> {
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(EngineError::InvalidResult(format!(
                "refusing to add {name:?}"
            )));
        }
        self.inner.add_player(name)
    }

    fn remove_player(&mut self, id: PlayerId) -> EngineResult<()> {
        self.inner.remove_player(id)
    }

    fn start(&mut self) -> EngineResult<()> {
        self.inner.start()
    }

    fn pair(&mut self, allow_repair: bool) -> EngineResult<()> {
        self.inner.pair(allow_repair)
    }

    fn next_round(&mut self) -> EngineResult<()> {
        self.inner.next_round()
    }

    fn record_result(
        &mut self,
        id: PlayerId,
        wins: u32,
        losses: u32,
        draws: u32,
    ) -> EngineResult<()> {
        self.inner.record_result(id, wins, losses, draws)
    }

    fn update_standings(&mut self) -> EngineResult<()> {
        self.inner.update_standings()
    }

    fn finish(&mut self) -> EngineResult<()> {
        self.inner.finish()
    }

    fn players(&self) -> &[Player] {
        self.inner.players()
    }

    fn pairings(&self) -> &[Pairing] {
        self.inner.pairings()
    }

    fn standings(&self) -> &[PlayerStanding] {
        self.inner.standings()
    }

    fn status(&self) -> TournamentStatus {
        self.inner.status()
    }

    fn current_round(&self) -> u32 {
        self.inner.current_round()
    }

    fn dump(&self) -> EngineResult<Vec<u8>> {
        self.inner.dump()
    }

    fn load(bytes: &[u8]) -> EngineResult<Self> {
        Ok(Self {
            inner: SwissTournament::load(bytes)?,
            fail_add: Arc::default(),
        })
    }
}
