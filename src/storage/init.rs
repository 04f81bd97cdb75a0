//! Storage initialization
//!
//! Handles first-run setup and default data creation

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::{Journal, JournalType, Kind, Ledger, LedgerType};

use super::Storage;

/// Initialize storage for a fresh installation
///
/// Seeds one ledger per ledger type and one journal per journal type when
/// the respective tables are empty. Existing data is never overwritten.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<Storage, LedgerError> {
    let storage = Storage::open(paths.clone())?;

    if storage.ledgers.count()? == 0 {
        for kind in LedgerType::all() {
            storage.ledgers.insert(Ledger::new(default_ledger_name(*kind), *kind))?;
        }
        storage.ledgers.save()?;
    }

    if storage.journals.count()? == 0 {
        for kind in JournalType::all() {
            storage.journals.insert(Journal::new(default_journal_name(*kind), *kind))?;
        }
        storage.journals.save()?;
    }

    Ok(storage)
}

fn default_ledger_name(kind: LedgerType) -> &'static str {
    match kind {
        LedgerType::Income => "Revenue",
        LedgerType::Expense => "General Expenses",
        LedgerType::Asset => "Bank",
        LedgerType::Liability => "Payables",
        LedgerType::Equity => "Owner's Equity",
    }
}

fn default_journal_name(kind: JournalType) -> &'static str {
    match kind {
        JournalType::Income => "Sales",
        JournalType::Expense => "Purchases",
        JournalType::Cashflow => "Bank",
        JournalType::General => "General",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage_seeds_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let storage = initialize_storage(&paths).unwrap();

        assert_eq!(storage.ledgers.count().unwrap(), LedgerType::all().len());
        assert_eq!(storage.journals.count().unwrap(), JournalType::all().len());
        assert!(paths.table_file("ledgers").exists());
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let storage = Storage::open(paths.clone()).unwrap();
        storage
            .ledgers
            .insert(Ledger::new("Custom", LedgerType::Asset))
            .unwrap();
        storage.ledgers.save().unwrap();

        let storage = initialize_storage(&paths).unwrap();
        let ledgers = storage.ledgers.select_all().unwrap();
        assert_eq!(ledgers.len(), 1);
        assert_eq!(ledgers[0].name, "Custom");
        assert_eq!(storage.journals.count().unwrap(), 4);
    }
}
