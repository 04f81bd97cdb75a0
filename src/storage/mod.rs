//! Storage layer for ledger-cli
//!
//! Provides id-keyed tables persisted as JSON files with atomic writes.
//! A single [`Storage`] is opened at startup and handed to every component
//! that needs it as an explicit `Arc<Storage>`.
//!
//! Effect jobs run on their own threads, so services hold the commit lock
//! from [`Storage::begin_commit`] while they check and write records.

pub mod file_io;
pub mod init;
pub mod table;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use table::{Record, Table};

use std::sync::{Mutex, MutexGuard};

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::{
    Account, AccountId, Entry, EntryId, EntryRow, Journal, JournalId, Ledger, LedgerId,
};

/// Main storage coordinator that provides access to all tables
pub struct Storage {
    paths: LedgerPaths,
    pub ledgers: Table<Ledger>,
    pub accounts: Table<Account>,
    pub journals: Table<Journal>,
    pub entries: Table<Entry>,
    pub entry_rows: Table<EntryRow>,
    commit_lock: Mutex<()>,
}

/// Access to the table holding records of type `R`
pub trait HasTable<R: Record> {
    fn table_ref(&self) -> &Table<R>;
}

macro_rules! has_table {
    ($record:ty, $field:ident) => {
        impl HasTable<$record> for Storage {
            fn table_ref(&self) -> &Table<$record> {
                &self.$field
            }
        }
    };
}

has_table!(Ledger, ledgers);
has_table!(Account, accounts);
has_table!(Journal, journals);
has_table!(Entry, entries);
has_table!(EntryRow, entry_rows);

impl Storage {
    /// Create a Storage instance with empty, unloaded tables
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            ledgers: Table::new(paths.table_file(Ledger::TABLE)),
            accounts: Table::new(paths.table_file(Account::TABLE)),
            journals: Table::new(paths.table_file(Journal::TABLE)),
            entries: Table::new(paths.table_file(Entry::TABLE)),
            entry_rows: Table::new(paths.table_file(EntryRow::TABLE)),
            commit_lock: Mutex::new(()),
            paths,
        })
    }

    /// Create a Storage instance and load every table from disk
    ///
    /// Failures here mean the data directory is unusable; callers treat
    /// them as fatal.
    pub fn open(paths: LedgerPaths) -> Result<Self, LedgerError> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        tracing::info!(
            ledgers = storage.ledgers.count()?,
            accounts = storage.accounts.count()?,
            journals = storage.journals.count()?,
            entries = storage.entries.count()?,
            "storage opened"
        );
        Ok(storage)
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Serialize a commit against every other commit
    ///
    /// Held across validation, the in-memory change and the save, so no
    /// other commit sees or writes a half-applied state.
    pub fn begin_commit(&self) -> Result<MutexGuard<'_, ()>, LedgerError> {
        self.commit_lock
            .lock()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire commit lock: {}", e)))
    }

    /// The table holding records of type `R`
    pub fn table<R: Record>(&self) -> &Table<R>
    where
        Self: HasTable<R>,
    {
        self.table_ref()
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.ledgers.load()?;
        self.accounts.load()?;
        self.journals.load()?;
        self.entries.load()?;
        self.entry_rows.load()?;
        Ok(())
    }

    /// Rows of one entry, ordered by date
    pub fn rows_for_entry(&self, entry_id: EntryId) -> Result<Vec<EntryRow>, LedgerError> {
        self.entry_rows.select_where(|r| r.entry_id == entry_id)
    }

    /// Rows posted to a ledger, ordered by date
    pub fn rows_for_ledger(&self, ledger_id: LedgerId) -> Result<Vec<EntryRow>, LedgerError> {
        self.entry_rows.select_where(|r| r.ledger_id == ledger_id)
    }

    /// Rows booked against an account, ordered by date
    pub fn rows_for_account(&self, account_id: AccountId) -> Result<Vec<EntryRow>, LedgerError> {
        self.entry_rows
            .select_where(|r| r.account_id == Some(account_id))
    }

    /// Entries recorded in a journal
    pub fn entries_for_journal(&self, journal_id: JournalId) -> Result<Vec<Entry>, LedgerError> {
        self.entries.select_where(|e| e.journal_id == journal_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LedgerType, Money};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert_eq!(storage.ledgers.count().unwrap(), 0);
    }

    #[test]
    fn test_generic_table_access() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        storage
            .table::<Ledger>()
            .insert(Ledger::new("Bank", LedgerType::Asset))
            .unwrap();
        assert_eq!(storage.ledgers.count().unwrap(), 1);
    }

    #[test]
    fn test_row_queries() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let ledger = LedgerId::new();
        let account = AccountId::new();
        let entry = EntryId::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        storage
            .entry_rows
            .insert(EntryRow::new(entry, ledger, date, Money::from_cents(10)).with_account(account))
            .unwrap();
        storage
            .entry_rows
            .insert(EntryRow::new(entry, LedgerId::new(), date, Money::from_cents(-10)))
            .unwrap();

        assert_eq!(storage.rows_for_entry(entry).unwrap().len(), 2);
        assert_eq!(storage.rows_for_ledger(ledger).unwrap().len(), 1);
        assert_eq!(storage.rows_for_account(account).unwrap().len(), 1);
    }

    #[test]
    fn test_commits_are_serialized() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let guard = storage.begin_commit().unwrap();
        assert!(storage.commit_lock.try_lock().is_err());
        drop(guard);
        assert!(storage.begin_commit().is_ok());
    }

    #[test]
    fn test_corrupt_table_fails_to_open() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.table_file("ledgers"), r#"{"rows":[{"bad":1}]}"#).unwrap();

        assert!(Storage::open(paths).is_err());
    }
}
