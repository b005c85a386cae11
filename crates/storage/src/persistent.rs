//! Persistent engine backed by redb
//!
//! The configured path is a directory; the database file inside it is
//! [`DB_FILE_NAME`]. All pairs live in one `&[u8] -> &[u8]` table.
//!
//! - Single-key writes run in their own redb write transaction
//! - [`Engine::write`] applies a whole batch inside one write transaction and
//!   commits once; an error drops the transaction, which aborts it
//! - Prefix scans hold a read transaction for their whole life (the
//!   snapshot) and page through the range [`SCAN_PAGE_SIZE`] pairs at a time
//!
//! redb serializes write transactions and lets readers run alongside them,
//! so the engine only guards the open/closed state itself.

use std::collections::VecDeque;
use std::ops::Bound;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use redb::{Database, ReadTransaction, Table, TableDefinition};
use stash_core::{KvPair, Value};
use tracing::{debug, info};

use crate::batch::{BatchOp, WriteBatch};
use crate::engine::{prefix_upper_bound, Engine, PrefixScan};
use crate::error::{Result, StorageError};

/// File name of the database inside the storage directory
pub const DB_FILE_NAME: &str = "stash.redb";

/// Number of pairs a prefix scan pulls from redb per refill
pub const SCAN_PAGE_SIZE: usize = 256;

const DATA_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("stash_data");

type RedbResult<T> = std::result::Result<T, redb::Error>;

/// redb-backed ordered engine
pub struct RedbEngine {
    /// `None` once closed
    db: RwLock<Option<Database>>,
    dir: PathBuf,
}

impl RedbEngine {
    /// Open (or create) the engine in the storage directory `dir`
    ///
    /// Creates the directory and the data table when they don't exist.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;

        let file = dir.join(DB_FILE_NAME);
        let db = open_database(&file)?;
        info!(path = %file.display(), "opened redb engine");

        Ok(Self {
            db: RwLock::new(Some(db)),
            dir,
        })
    }

    /// Storage directory this engine was opened in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Check if the engine has been closed
    pub fn is_closed(&self) -> bool {
        self.db.read().is_none()
    }
}

impl std::fmt::Debug for RedbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbEngine")
            .field("dir", &self.dir)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn open_database(file: &Path) -> RedbResult<Database> {
    let db = Database::create(file)?;
    let txn = db.begin_write()?;
    {
        txn.open_table(DATA_TABLE)?;
    }
    txn.commit()?;
    Ok(db)
}

fn put_one(db: &Database, key: &[u8], value: &[u8]) -> RedbResult<()> {
    let txn = db.begin_write()?;
    {
        let mut table = txn.open_table(DATA_TABLE)?;
        table.insert(key, value)?;
    }
    txn.commit()?;
    Ok(())
}

fn get_one(db: &Database, key: &[u8]) -> RedbResult<Option<Value>> {
    let txn = db.begin_read()?;
    let table = txn.open_table(DATA_TABLE)?;
    let value = table.get(key)?.map(|guard| guard.value().to_vec());
    Ok(value)
}

fn delete_one(db: &Database, key: &[u8]) -> RedbResult<()> {
    let txn = db.begin_write()?;
    {
        let mut table = txn.open_table(DATA_TABLE)?;
        table.remove(key)?;
    }
    txn.commit()?;
    Ok(())
}

type DataTable<'txn> = Table<'txn, &'static [u8], &'static [u8]>;

fn apply_op(table: &mut DataTable<'_>, op: &BatchOp) -> RedbResult<()> {
    match op {
        BatchOp::Put { key, value } => {
            table.insert(key.as_slice(), value.as_slice())?;
        }
        BatchOp::Delete { key } => {
            table.remove(key.as_slice())?;
        }
    }
    Ok(())
}

fn write_all(db: &Database, batch: &WriteBatch) -> RedbResult<()> {
    let txn = db.begin_write()?;
    {
        let mut table = txn.open_table(DATA_TABLE)?;
        for op in batch {
            apply_op(&mut table, op)?;
        }
    }
    txn.commit()?;
    Ok(())
}

impl Engine for RedbEngine {
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StorageError::Closed)?;
        Ok(put_one(db, key, value)?)
    }

    fn get(&self, key: &[u8]) -> Result<Option<Value>> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StorageError::Closed)?;
        Ok(get_one(db, key)?)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StorageError::Closed)?;
        Ok(delete_one(db, key)?)
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StorageError::Closed)?;
        let ops = batch.len();
        write_all(db, &batch).map_err(|e| StorageError::BatchRejected(e.to_string()))?;
        debug!(ops, "applied write batch");
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Box<dyn PrefixScan>> {
        let guard = self.db.read();
        let db = guard.as_ref().ok_or(StorageError::Closed)?;
        let txn = db.begin_read().map_err(redb::Error::from)?;
        Ok(Box::new(RedbScan::new(txn, prefix)))
    }

    fn close(&self) -> Result<()> {
        if let Some(db) = self.db.write().take() {
            drop(db);
            info!(dir = %self.dir.display(), "closed redb engine");
        }
        Ok(())
    }
}

/// Paging cursor over a redb read snapshot
struct RedbScan {
    txn: ReadTransaction,
    prefix: Vec<u8>,
    upper: Option<Vec<u8>>,
    /// Last key handed to `buffer`; the next page starts after it
    resume_after: Option<Vec<u8>>,
    buffer: VecDeque<KvPair>,
    exhausted: bool,
}

impl RedbScan {
    fn new(txn: ReadTransaction, prefix: &[u8]) -> Self {
        Self {
            txn,
            prefix: prefix.to_vec(),
            upper: prefix_upper_bound(prefix),
            resume_after: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    fn refill(&mut self) -> RedbResult<()> {
        let table = self.txn.open_table(DATA_TABLE)?;

        let start: Bound<&[u8]> = match &self.resume_after {
            Some(last) => Bound::Excluded(last.as_slice()),
            None => Bound::Included(self.prefix.as_slice()),
        };
        let end: Bound<&[u8]> = match &self.upper {
            Some(upper) => Bound::Excluded(upper.as_slice()),
            None => Bound::Unbounded,
        };

        let mut page = Vec::with_capacity(SCAN_PAGE_SIZE);
        for entry in table.range::<&[u8]>((start, end))?.take(SCAN_PAGE_SIZE) {
            let (key, value) = entry?;
            page.push((key.value().to_vec(), value.value().to_vec()));
        }

        if page.len() < SCAN_PAGE_SIZE {
            self.exhausted = true;
        }
        if let Some((last, _)) = page.last() {
            self.resume_after = Some(last.clone());
        }
        self.buffer.extend(page);
        Ok(())
    }
}

impl Iterator for RedbScan {
    type Item = Result<KvPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buffer.is_empty() && !self.exhausted {
            if let Err(e) = self.refill() {
                self.exhausted = true;
                return Some(Err(e.into()));
            }
        }
        self.buffer.pop_front().map(Ok)
    }
}
