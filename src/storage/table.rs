//! Generic table for JSON storage
//!
//! Each table keeps its records in memory behind a `RwLock` and persists
//! them to one JSON file. All access is keyed by the record's id. Saves of
//! one table are serialized, so the file always ends up holding the most
//! recent snapshot.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::LedgerError;
use crate::models::{Account, Entry, EntryRow, Journal, Ledger};

use super::file_io::{read_json, write_json_atomic};

/// A record that can live in a [`Table`]
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Primary key
    type Id: Copy + Eq + Hash + fmt::Display + Send + Sync;

    /// Table (and file) name
    const TABLE: &'static str;

    /// Entity name used in errors
    const ENTITY: &'static str;

    fn id(&self) -> Self::Id;

    /// Key used to order `select_all` results
    fn sort_key(&self) -> String;
}

/// Serializable table file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "R: Serialize + DeserializeOwned")]
struct TableData<R> {
    rows: Vec<R>,
}

impl<R> Default for TableData<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

/// Id-keyed table persisted to a JSON file
pub struct Table<R: Record> {
    path: PathBuf,
    data: RwLock<HashMap<R::Id, R>>,
    save_lock: Mutex<()>,
}

impl<R: Record> Table<R> {
    /// Create an empty table backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            save_lock: Mutex::new(()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<R::Id, R>>, LedgerError> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<R::Id, R>>, LedgerError> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn not_found(id: R::Id) -> LedgerError {
        LedgerError::NotFound {
            entity_type: R::ENTITY,
            identifier: id.to_string(),
        }
    }

    /// Load records from disk, replacing anything in memory
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TableData<R> = read_json(&self.path)?;

        let mut data = self.write()?;
        data.clear();
        for record in file_data.rows {
            data.insert(record.id(), record);
        }

        Ok(())
    }

    /// Save records to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let _guard = self
            .save_lock
            .lock()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire save lock: {}", e)))?;
        let file_data = TableData {
            rows: self.select_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Insert a new record; fails if the id already exists
    pub fn insert(&self, record: R) -> Result<(), LedgerError> {
        let mut data = self.write()?;
        let id = record.id();
        if data.contains_key(&id) {
            return Err(LedgerError::Duplicate {
                entity_type: R::ENTITY,
                identifier: id.to_string(),
            });
        }
        data.insert(id, record);
        Ok(())
    }

    /// Get a record by id
    pub fn select(&self, id: R::Id) -> Result<Option<R>, LedgerError> {
        Ok(self.read()?.get(&id).cloned())
    }

    /// Get a record by id, failing if it does not exist
    pub fn select_required(&self, id: R::Id) -> Result<R, LedgerError> {
        self.select(id)?.ok_or_else(|| Self::not_found(id))
    }

    /// All records ordered by their sort key
    pub fn select_all(&self) -> Result<Vec<R>, LedgerError> {
        let mut records: Vec<R> = self.read()?.values().cloned().collect();
        records.sort_by_key(|r| r.sort_key());
        Ok(records)
    }

    /// Records matching a predicate, ordered by their sort key
    pub fn select_where(&self, predicate: impl Fn(&R) -> bool) -> Result<Vec<R>, LedgerError> {
        let mut records: Vec<R> = self
            .read()?
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.sort_key());
        Ok(records)
    }

    /// Replace an existing record; fails if the id is unknown
    pub fn update(&self, record: R) -> Result<(), LedgerError> {
        let mut data = self.write()?;
        let id = record.id();
        match data.get_mut(&id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(Self::not_found(id)),
        }
    }

    /// Insert or replace a record
    pub fn upsert(&self, record: R) -> Result<(), LedgerError> {
        self.write()?.insert(record.id(), record);
        Ok(())
    }

    /// Delete a record, returning whether it existed
    pub fn delete(&self, id: R::Id) -> Result<bool, LedgerError> {
        Ok(self.write()?.remove(&id).is_some())
    }

    /// Count records matching a predicate
    pub fn count_where(&self, predicate: impl Fn(&R) -> bool) -> Result<usize, LedgerError> {
        Ok(self.read()?.values().filter(|r| predicate(r)).count())
    }

    /// Count all records
    pub fn count(&self) -> Result<usize, LedgerError> {
        Ok(self.read()?.len())
    }
}

impl Record for Ledger {
    type Id = crate::models::LedgerId;
    const TABLE: &'static str = "ledgers";
    const ENTITY: &'static str = "Ledger";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl Record for Account {
    type Id = crate::models::AccountId;
    const TABLE: &'static str = "accounts";
    const ENTITY: &'static str = "Account";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl Record for Journal {
    type Id = crate::models::JournalId;
    const TABLE: &'static str = "journals";
    const ENTITY: &'static str = "Journal";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn sort_key(&self) -> String {
        self.name.to_lowercase()
    }
}

impl Record for Entry {
    type Id = crate::models::EntryId;
    const TABLE: &'static str = "entries";
    const ENTITY: &'static str = "Entry";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn sort_key(&self) -> String {
        format!("{}{}", self.notes.to_lowercase(), self.id.as_uuid())
    }
}

impl Record for EntryRow {
    type Id = crate::models::EntryRowId;
    const TABLE: &'static str = "entry_rows";
    const ENTITY: &'static str = "Entry row";

    fn id(&self) -> Self::Id {
        self.id
    }

    fn sort_key(&self) -> String {
        format!("{}{}", self.date, self.id.as_uuid())
    }
}
