//! Durable record I/O for the engine dump and the registration queue.

use super::config::StorageConfig;
use super::errors::{StorageError, StorageResult};
use crate::registration::Entrant;
use log::{debug, warn};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::sync::Arc;

/// Reads and writes the two independent durable records
///
/// Implementations do plain I/O: the engine record is an opaque byte blob,
/// the queue record is a JSON list of entrants. Every write replaces the
/// whole record. A missing record reads as `None`.
pub trait PersistenceGateway: Send + Sync {
    fn read_tournament(&self) -> StorageResult<Option<Vec<u8>>>;

    fn write_tournament(&self, data: &[u8]) -> StorageResult<()>;

    fn read_queue(&self) -> StorageResult<Option<Vec<u8>>>;

    fn write_queue(&self, data: &[u8]) -> StorageResult<()>;

    fn load_queue(&self) -> StorageResult<Option<Vec<Entrant>>> {
        match self.read_queue()? {
            Some(data) => Ok(Some(serde_json::from_slice(&data)?)),
            None => Ok(None),
        }
    }

    fn save_queue(&self, entries: &[Entrant]) -> StorageResult<()> {
        let data = serde_json::to_vec_pretty(entries)?;
        self.write_queue(&data)
    }
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Box<G> {
    fn read_tournament(&self) -> StorageResult<Option<Vec<u8>>> {
        (**self).read_tournament()
    }

    fn write_tournament(&self, data: &[u8]) -> StorageResult<()> {
        (**self).write_tournament(data)
    }

    fn read_queue(&self) -> StorageResult<Option<Vec<u8>>> {
        (**self).read_queue()
    }

    fn write_queue(&self, data: &[u8]) -> StorageResult<()> {
        (**self).write_queue(data)
    }
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Arc<G> {
    fn read_tournament(&self) -> StorageResult<Option<Vec<u8>>> {
        (**self).read_tournament()
    }

    fn write_tournament(&self, data: &[u8]) -> StorageResult<()> {
        (**self).write_tournament(data)
    }

    fn read_queue(&self) -> StorageResult<Option<Vec<u8>>> {
        (**self).read_queue()
    }

    fn write_queue(&self, data: &[u8]) -> StorageResult<()> {
        (**self).write_queue(data)
    }
}

/// Gateway backed by two JSON files in a data directory
#[derive(Debug, Clone)]
pub struct FileGateway {
    config: StorageConfig,
}

impl FileGateway {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn read(path: &Path) -> StorageResult<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Write to a sibling temp file, sync, then rename over `path`
    fn write(&self, path: &Path, data: &[u8]) -> StorageResult<()> {
        let dir = self.config.data_dir();
        fs::create_dir_all(dir).map_err(|source| StorageError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        let replaced = File::create(&tmp)
            .and_then(|mut file| {
                file.write_all(data)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp, path));
        if let Err(source) = replaced {
            if let Err(err) = fs::remove_file(&tmp)
                && err.kind() != ErrorKind::NotFound
            {
                warn!("Could not remove {}: {err}", tmp.display());
            }
            return Err(StorageError::Write {
                path: path.to_path_buf(),
                source,
            });
        }

        debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}

impl PersistenceGateway for FileGateway {
    fn read_tournament(&self) -> StorageResult<Option<Vec<u8>>> {
        Self::read(&self.config.tournament_path())
    }

    fn write_tournament(&self, data: &[u8]) -> StorageResult<()> {
        self.write(&self.config.tournament_path(), data)
    }

    fn read_queue(&self) -> StorageResult<Option<Vec<u8>>> {
        Self::read(&self.config.pending_players_path())
    }

    fn write_queue(&self, data: &[u8]) -> StorageResult<()> {
        self.write(&self.config.pending_players_path(), data)
    }
}

/// Gateway keeping both records in memory
///
/// Useful for embedding and tests; contents are lost on drop.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tournament: Mutex<Option<Vec<u8>>>,
    queue: Mutex<Option<Vec<u8>>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last engine record written, if any
    pub fn tournament_bytes(&self) -> Option<Vec<u8>> {
        self.tournament.lock().clone()
    }

    /// Last queue record written, if any
    pub fn queue_bytes(&self) -> Option<Vec<u8>> {
        self.queue.lock().clone()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn read_tournament(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.tournament_bytes())
    }

    fn write_tournament(&self, data: &[u8]) -> StorageResult<()> {
        *self.tournament.lock() = Some(data.to_vec());
        Ok(())
    }

    fn read_queue(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.queue_bytes())
    }

    fn write_queue(&self, data: &[u8]) -> StorageResult<()> {
        *self.queue.lock() = Some(data.to_vec());
        Ok(())
    }
}
