//! State coordinator owning the engine and the registration queue.

use super::errors::{CommitStage, CoordinatorError, CoordinatorResult};
use super::snapshot::TournamentSnapshot;
use crate::engine::{
    EngineResult, Pairing, Player, PlayerId, PlayerStanding, TournamentEngine, TournamentStatus,
};
use crate::registration::models::normalize;
use crate::registration::{Entrant, EntrantStatus, RegistrationQueue};
use crate::storage::PersistenceGateway;
use log::{debug, error, info, warn};
use parking_lot::RwLock;

/// What to undo in memory when a queue write fails
///
/// Accept always restores the entry to pending. This only changes the
/// submit and reject paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollbackPolicy {
    /// Submit drops the new entry, reject restores pending
    #[default]
    Uniform,
    /// Submit and reject keep their in-memory change
    AcceptOnly,
}

/// Whether `name` matches a roster entry under registration lookup rules
///
/// Removed players count, so their names stay taken.
fn on_roster(engine: &impl TournamentEngine, name: &str) -> bool {
    let key = normalize(name);
    engine.players().iter().any(|p| normalize(&p.name) == key)
}

struct CoordinatorState<E> {
    engine: E,
    queue: RegistrationQueue,
}

/// Single owner of the tournament engine and the registration queue
///
/// Every mutation takes the write lock, applies its change and saves the
/// affected records before releasing it, so no two mutations interleave
/// and readers never see a change whose save is still in flight. Reads
/// take the shared lock.
pub struct StateCoordinator<E, G> {
    state: RwLock<CoordinatorState<E>>,
    gateway: G,
    policy: RollbackPolicy,
}

impl<E, G> StateCoordinator<E, G>
where
    E: TournamentEngine + Default,
    G: PersistenceGateway,
{
    /// Load both records through `gateway`, defaulting any that are absent
    ///
    /// A record that exists but cannot be read or parsed is an error.
    pub fn open(gateway: G) -> CoordinatorResult<Self> {
        let engine = match gateway.read_tournament()? {
            Some(data) => E::load(&data)?,
            None => {
                info!("No saved tournament found, starting empty");
                E::default()
            }
        };

        let queue = gateway
            .load_queue()?
            .map(RegistrationQueue::from_entries)
            .unwrap_or_default();

        info!(
            "Loaded tournament ({}, round {}, {} players) and {} registration(s)",
            engine.status(),
            engine.current_round(),
            engine.player_count(),
            queue.len()
        );
        Ok(Self::from_parts(engine, queue, gateway))
    }
}

impl<E, G> StateCoordinator<E, G>
where
    E: TournamentEngine,
    G: PersistenceGateway,
{
    pub fn from_parts(engine: E, queue: RegistrationQueue, gateway: G) -> Self {
        Self {
            state: RwLock::new(CoordinatorState { engine, queue }),
            gateway,
            policy: RollbackPolicy::default(),
        }
    }

    pub fn with_rollback_policy(mut self, policy: RollbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn rollback_policy(&self) -> RollbackPolicy {
        self.policy
    }

    /// Release the state; records were saved by each mutation already
    pub fn shutdown(self) -> G {
        info!("State coordinator shut down");
        self.gateway
    }

    fn persist_engine(&self, engine: &E) -> CoordinatorResult<()> {
        let data = engine.dump()?;
        self.gateway.write_tournament(&data)?;
        debug!("Tournament state saved ({} bytes)", data.len());
        Ok(())
    }

    /// Queue a registration request for `name`
    pub fn submit_pending(&self, name: &str) -> CoordinatorResult<()> {
        let mut guard = self.state.write();
        let CoordinatorState { engine, queue } = &mut *guard;

        let position = queue.submit(name, |n| on_roster(&*engine, n))?;

        if let Err(err) = self.gateway.save_queue(queue.entries()) {
            match self.policy {
                RollbackPolicy::Uniform => {
                    queue.discard(position);
                    warn!("Registration for {name:?} not saved, discarded: {err}");
                }
                RollbackPolicy::AcceptOnly => {
                    warn!("Registration for {name:?} not saved, kept in memory: {err}");
                }
            }
            return Err(err.into());
        }

        info!("Registration submitted for {name:?}");
        Ok(())
    }

    /// Move a pending entrant onto the tournament roster
    ///
    /// The lookup ignores case and surrounding whitespace; the player is
    /// added under the name exactly as submitted. The entry is marked
    /// accepted only after the engine has taken the player, and is put
    /// back to pending if either record fails to save.
    pub fn accept(&self, name: &str) -> CoordinatorResult<PlayerId> {
        let mut guard = self.state.write();
        let CoordinatorState { engine, queue } = &mut *guard;

        let found = queue.find_pending(name)?;
        let id = engine.add_player(&found.name)?;
        queue.mark_status(found.position, EntrantStatus::Accepted)?;

        let saved = self
            .persist_engine(engine)
            .map_err(|err| (CommitStage::EngineState, err))
            .and_then(|()| {
                self.gateway
                    .save_queue(queue.entries())
                    .map_err(|err| (CommitStage::QueueState, err.into()))
            });

        if let Err((stage, err)) = saved {
            if let Err(restore_err) = queue.mark_status(found.position, EntrantStatus::Pending) {
                error!("Could not restore {:?} to pending: {restore_err}", found.name);
            }
            warn!(
                "Accepting {:?} failed to save {stage}; entry restored to pending while the roster keeps player {id}: {err}",
                found.name
            );
            return Err(CoordinatorError::PartialCommit {
                name: found.name,
                stage,
                source: Box::new(err),
            });
        }

        info!("Accepted {:?} as player {id}", found.name);
        Ok(id)
    }

    /// Turn down a pending entrant; `name` must match exactly
    pub fn reject(&self, name: &str) -> CoordinatorResult<()> {
        let mut guard = self.state.write();
        let queue = &mut guard.queue;

        let found = queue.find_pending_exact(name)?;
        queue.mark_status(found.position, EntrantStatus::Rejected)?;

        if let Err(err) = self.gateway.save_queue(queue.entries()) {
            match self.policy {
                RollbackPolicy::Uniform => {
                    queue.mark_status(found.position, EntrantStatus::Pending)?;
                    warn!("Rejection of {name:?} not saved, restored to pending: {err}");
                }
                RollbackPolicy::AcceptOnly => {
                    warn!("Rejection of {name:?} not saved, kept in memory: {err}");
                }
            }
            return Err(err.into());
        }

        info!("Rejected registration for {name:?}");
        Ok(())
    }

    /// Run `mutator` against the engine and save the result
    ///
    /// Nothing is saved when the mutator fails. When the save fails the
    /// in-memory change stays applied; the engine has no undo.
    pub fn apply_to_engine<T>(
        &self,
        mutator: impl FnOnce(&mut E) -> EngineResult<T>,
    ) -> CoordinatorResult<T> {
        let mut guard = self.state.write();
        let value = mutator(&mut guard.engine)?;

        if let Err(err) = self.persist_engine(&guard.engine) {
            warn!("Engine change applied in memory but not saved: {err}");
            return Err(err);
        }
        Ok(value)
    }

    pub fn start_tournament(&self) -> CoordinatorResult<()> {
        self.apply_to_engine(|engine| engine.start())?;
        info!("Tournament started");
        Ok(())
    }

    pub fn pair_round(&self, allow_repair: bool) -> CoordinatorResult<()> {
        self.apply_to_engine(|engine| engine.pair(allow_repair))
    }

    pub fn next_round(&self) -> CoordinatorResult<u32> {
        self.apply_to_engine(|engine| {
            engine.next_round()?;
            Ok(engine.current_round())
        })
    }

    pub fn record_result(
        &self,
        id: PlayerId,
        wins: u32,
        losses: u32,
        draws: u32,
    ) -> CoordinatorResult<()> {
        self.apply_to_engine(|engine| engine.record_result(id, wins, losses, draws))
    }

    pub fn update_standings(&self) -> CoordinatorResult<()> {
        self.apply_to_engine(|engine| engine.update_standings())
    }

    pub fn remove_player(&self, id: PlayerId) -> CoordinatorResult<()> {
        self.apply_to_engine(|engine| engine.remove_player(id))?;
        info!("Removed player {id}");
        Ok(())
    }

    pub fn finish_tournament(&self) -> CoordinatorResult<()> {
        self.apply_to_engine(|engine| engine.finish())?;
        info!("Tournament finished");
        Ok(())
    }

    /// Run `f` against the engine and queue under the shared lock
    pub fn read<T>(&self, f: impl FnOnce(&E, &RegistrationQueue) -> T) -> T {
        let guard = self.state.read();
        f(&guard.engine, &guard.queue)
    }

    pub fn list_pending(&self) -> Vec<Entrant> {
        self.read(|_, queue| queue.list_pending())
    }

    /// Every queue entry, decided or not
    pub fn entries(&self) -> Vec<Entrant> {
        self.read(|_, queue| queue.entries().to_vec())
    }

    pub fn players(&self) -> Vec<Player> {
        self.read(|engine, _| engine.players().to_vec())
    }

    pub fn pairings(&self) -> Vec<Pairing> {
        self.read(|engine, _| engine.pairings().to_vec())
    }

    pub fn standings(&self) -> Vec<PlayerStanding> {
        self.read(|engine, _| engine.standings().to_vec())
    }

    pub fn status(&self) -> TournamentStatus {
        self.read(|engine, _| engine.status())
    }

    pub fn current_round(&self) -> u32 {
        self.read(|engine, _| engine.current_round())
    }

    pub fn player_count(&self) -> usize {
        self.read(|engine, _| engine.player_count())
    }

    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.read(|engine, _| engine.player_id(name))
    }

    pub fn player_name(&self, id: PlayerId) -> Option<String> {
        self.read(|engine, _| engine.player_name(id).map(str::to_string))
    }

    pub fn snapshot(&self) -> TournamentSnapshot {
        self.read(|engine, queue| TournamentSnapshot::capture(engine, queue))
    }
}
