//! Reference entity service
//!
//! Create, update and delete for ledgers, accounts and journals. One
//! generic service covers all three since they share the same shape.

use std::marker::PhantomData;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Journal, Ledger, Reference};
use crate::storage::{HasTable, Record, Storage};

/// How many records point at a reference entity
pub trait InUse: Record {
    fn usage_count(storage: &Storage, id: Self::Id) -> LedgerResult<usize>;
}

impl InUse for Ledger {
    fn usage_count(storage: &Storage, id: Self::Id) -> LedgerResult<usize> {
        storage.entry_rows.count_where(|r| r.ledger_id == id)
    }
}

impl InUse for Account {
    fn usage_count(storage: &Storage, id: Self::Id) -> LedgerResult<usize> {
        storage.entry_rows.count_where(|r| r.account_id == Some(id))
    }
}

impl InUse for Journal {
    fn usage_count(storage: &Storage, id: Self::Id) -> LedgerResult<usize> {
        storage.entries.count_where(|e| e.journal_id == id)
    }
}

/// Service for one kind of reference entity
pub struct ReferenceService<'a, R> {
    storage: &'a Storage,
    _record: PhantomData<R>,
}

impl<'a, R> ReferenceService<'a, R>
where
    R: Reference + InUse,
    Storage: HasTable<R>,
{
    /// Create a new reference service
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            _record: PhantomData,
        }
    }

    /// All records, ordered by name
    pub fn list(&self) -> LedgerResult<Vec<R>> {
        self.storage.table::<R>().select_all()
    }

    /// Create and persist a new record
    pub fn create(&self, name: &str, kind: R::Kind, notes: &str) -> LedgerResult<R> {
        let _commit = self.storage.begin_commit()?;
        let record = R::create(name.trim().to_string(), kind, notes.to_string());
        record.validate()?;
        self.check_unique_name(&record)?;

        let table = self.storage.table::<R>();
        table.insert(record.clone())?;
        table.save()?;

        tracing::info!(id = %record.id(), name = record.name(), "{} created", R::ENTITY);
        Ok(record)
    }

    /// Replace the editable fields of an existing record
    pub fn update(&self, record: R) -> LedgerResult<R> {
        let _commit = self.storage.begin_commit()?;
        let mut record = record;
        let name = record.name().trim().to_string();
        let notes = record.notes().to_string();
        let kind = record.kind();
        record.set_fields(name, kind, notes);
        record.validate()?;
        self.check_unique_name(&record)?;

        let table = self.storage.table::<R>();
        table.update(record.clone())?;
        table.save()?;

        tracing::info!(id = %record.id(), "{} updated", R::ENTITY);
        Ok(record)
    }

    /// Delete a record that nothing references any more
    pub fn delete(&self, id: R::Id) -> LedgerResult<R> {
        let _commit = self.storage.begin_commit()?;
        let table = self.storage.table::<R>();
        let record = table.select_required(id)?;

        let usage = R::usage_count(self.storage, id)?;
        if usage > 0 {
            return Err(LedgerError::Validation(format!(
                "{} '{}' is still used by {} record(s)",
                R::ENTITY,
                record.name(),
                usage
            )));
        }

        table.delete(id)?;
        table.save()?;

        tracing::info!(id = %id, "{} deleted", R::ENTITY);
        Ok(record)
    }

    fn check_unique_name(&self, record: &R) -> LedgerResult<()> {
        let name = record.name().to_lowercase();
        let id = record.id();
        let clash = self
            .storage
            .table::<R>()
            .count_where(|other| other.id() != id && other.name().to_lowercase() == name)?;
        if clash > 0 {
            return Err(LedgerError::Duplicate {
                entity_type: R::ENTITY,
                identifier: record.name().to_string(),
            });
        }
        Ok(())
    }
}
