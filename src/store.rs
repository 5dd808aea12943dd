//! Snapshot persistence.
//!
//! The ledger doesn't know how it is stored: it hands a [`Snapshot`] to a
//! [`Store`], and gets one back at startup.

use crate::ledger::{Account, Ledger};

use serde::{Deserialize, Serialize};
use std::{
    cell::RefCell,
    fs::{self, File},
    io::{self, BufReader, BufWriter, Write},
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{error, warn};

/// Bumped whenever the snapshot format changes in a way older readers
/// wouldn't understand.
pub const SNAPSHOT_VERSION: u32 = 1;

/// The full state of a ledger at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    /// Sequence of the next account number the ledger will hand out.
    pub next_account_number: u64,
    pub accounts: Vec<Account>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unsupported snapshot version {0}, expected {SNAPSHOT_VERSION}")]
    UnsupportedVersion(u32),

    /// The snapshot could be read, but doesn't describe a valid ledger.
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}

pub trait Store {
    /// Returns `Ok(None)` if nothing was ever saved.
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Stores the snapshot as a JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // The snapshot is first written next to the real file, then renamed over
    // it, so a save that fails half-way leaves the previous snapshot intact.
    fn temp_path(&self) -> PathBuf {
        let mut path = self.path.clone().into_os_string();
        path.push(".tmp");
        path.into()
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(&self.path)(err)),
        };

        Ok(Some(serde_json::from_reader(BufReader::new(file))?))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        let temp_path = self.temp_path();
        let file = File::create(&temp_path).map_err(io_error(&temp_path))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.flush().map_err(io_error(&temp_path))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(io_error(&temp_path))?;
        drop(writer);

        fs::rename(&temp_path, &self.path).map_err(io_error(&self.path))
    }
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: RefCell<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RefCell::new(Some(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.borrow().clone()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        *self.snapshot.borrow_mut() = Some(snapshot.clone());

        Ok(())
    }
}

/// A ledger that gets saved no matter how we exit.
///
/// Call [`AutoSave::finish`] on the normal exit path. If the guard is dropped
/// without it, e.g. while unwinding from a panic or returning early on an
/// error, the ledger is saved on drop.
pub struct AutoSave<'a> {
    ledger: Ledger,
    store: &'a dyn Store,
    saved: bool,
}

impl<'a> AutoSave<'a> {
    pub fn new(ledger: Ledger, store: &'a dyn Store) -> Self {
        Self {
            ledger,
            store,
            saved: false,
        }
    }

    pub fn finish(mut self) -> Result<(), StoreError> {
        // Don't try again on drop, even if this save fails.
        self.saved = true;
        self.ledger.save(self.store)
    }
}

impl Deref for AutoSave<'_> {
    type Target = Ledger;

    fn deref(&self) -> &Ledger {
        &self.ledger
    }
}

impl DerefMut for AutoSave<'_> {
    fn deref_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }
}

impl Drop for AutoSave<'_> {
    fn drop(&mut self) {
        if self.saved {
            return;
        }

        warn!("exiting abnormally, saving the ledger");
        if let Err(err) = self.ledger.save(self.store) {
            error!(%err, "failed to save the ledger");
        }
    }
}
