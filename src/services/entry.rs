//! Entry service
//!
//! Commits entries together with their rows. The rows of an entry are only
//! ever written as a whole, after the balance check has passed.

use std::collections::HashSet;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Entry, EntryId, EntryRow, EntryRowId};
use crate::storage::Storage;

use super::balance::validate_balance;

/// Service for entry management
pub struct EntryService<'a> {
    storage: &'a Storage,
}

impl<'a> EntryService<'a> {
    /// Create a new entry service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Get an entry and its rows
    pub fn get(&self, id: EntryId) -> LedgerResult<(Entry, Vec<EntryRow>)> {
        let entry = self
            .storage
            .entries
            .select(id)?
            .ok_or_else(|| LedgerError::entry_not_found(id.to_string()))?;
        let rows = self.storage.rows_for_entry(id)?;
        Ok((entry, rows))
    }

    /// Persist a new entry with its rows
    ///
    /// Everything is checked before the first table is touched. If a write
    /// still fails, the in-memory tables are put back as they were.
    pub fn create(&self, entry: Entry, mut rows: Vec<EntryRow>) -> LedgerResult<Entry> {
        let _commit = self.storage.begin_commit()?;
        self.prepare(&entry, &mut rows)?;

        if self.storage.entries.select(entry.id)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "Entry",
                identifier: entry.id.to_string(),
            });
        }
        for row in rows.iter() {
            if self.storage.entry_rows.select(row.id)?.is_some() {
                return Err(duplicate_row(row.id));
            }
        }

        let applied = self.apply_create(&entry, &rows);
        if let Err(err) = applied {
            self.restore(entry.id, &rows, None);
            return Err(err);
        }

        tracing::info!(entry = %entry.id, rows = rows.len(), "entry created");
        Ok(entry)
    }

    /// Replace an existing entry and its rows
    ///
    /// Rows that were removed during editing are deleted, the rest are
    /// inserted or replaced. On failure the previous rows are restored.
    pub fn update(&self, entry: Entry, mut rows: Vec<EntryRow>) -> LedgerResult<Entry> {
        let _commit = self.storage.begin_commit()?;
        let previous = self
            .storage
            .entries
            .select(entry.id)?
            .ok_or_else(|| LedgerError::entry_not_found(entry.id.to_string()))?;
        self.prepare(&entry, &mut rows)?;

        for row in rows.iter() {
            if let Some(stored) = self.storage.entry_rows.select(row.id)? {
                if stored.entry_id != entry.id {
                    return Err(duplicate_row(row.id));
                }
            }
        }

        let old_rows = self.storage.rows_for_entry(entry.id)?;
        let kept: HashSet<EntryRowId> = rows.iter().map(|r| r.id).collect();
        let removed = old_rows.iter().filter(|r| !kept.contains(&r.id)).count();

        let applied = self.apply_update(&entry, &rows, &old_rows, &kept);
        if let Err(err) = applied {
            self.restore(entry.id, &rows, Some((previous, old_rows)));
            return Err(err);
        }

        tracing::info!(
            entry = %entry.id,
            rows = rows.len(),
            removed,
            "entry updated"
        );
        Ok(entry)
    }

    /// Delete an entry and all of its rows
    pub fn delete(&self, id: EntryId) -> LedgerResult<Entry> {
        let _commit = self.storage.begin_commit()?;
        let (entry, rows) = self.get(id)?;

        let applied = rows
            .iter()
            .try_for_each(|row| self.storage.entry_rows.delete(row.id).map(|_| ()))
            .and_then(|()| self.storage.entries.delete(id).map(|_| ()))
            .and_then(|()| self.save());
        if let Err(err) = applied {
            self.restore(id, &[], Some((entry, rows)));
            return Err(err);
        }

        tracing::info!(entry = %id, rows = rows.len(), "entry deleted");
        Ok(entry)
    }

    /// Check balance and everything the rows reference
    ///
    /// Also attaches the rows to the entry and rejects row ids used twice.
    fn prepare(&self, entry: &Entry, rows: &mut [EntryRow]) -> LedgerResult<()> {
        validate_balance(rows)?;

        if self.storage.journals.select(entry.journal_id)?.is_none() {
            return Err(LedgerError::journal_not_found(entry.journal_id.to_string()));
        }

        let mut seen = HashSet::new();
        for row in rows.iter_mut() {
            row.entry_id = entry.id;

            if !seen.insert(row.id) {
                return Err(duplicate_row(row.id));
            }
            if self.storage.ledgers.select(row.ledger_id)?.is_none() {
                return Err(LedgerError::ledger_not_found(row.ledger_id.to_string()));
            }
            if let Some(account_id) = row.account_id {
                if self.storage.accounts.select(account_id)?.is_none() {
                    return Err(LedgerError::account_not_found(account_id.to_string()));
                }
            }
        }

        Ok(())
    }

    fn apply_create(&self, entry: &Entry, rows: &[EntryRow]) -> LedgerResult<()> {
        self.storage.entries.insert(entry.clone())?;
        for row in rows {
            self.storage.entry_rows.insert(row.clone())?;
        }
        self.save()
    }

    fn apply_update(
        &self,
        entry: &Entry,
        rows: &[EntryRow],
        old_rows: &[EntryRow],
        kept: &HashSet<EntryRowId>,
    ) -> LedgerResult<()> {
        for existing in old_rows.iter().filter(|r| !kept.contains(&r.id)) {
            self.storage.entry_rows.delete(existing.id)?;
        }
        self.storage.entries.update(entry.clone())?;
        for row in rows {
            self.storage.entry_rows.upsert(row.clone())?;
        }
        self.save()
    }

    /// Put the tables back after a failed commit
    ///
    /// The entry and the `written` rows are removed, then the `previous`
    /// entry and rows, if any, are reinserted. Both tables are saved again
    /// so a partial save is undone on disk as well.
    fn restore(
        &self,
        entry_id: EntryId,
        written: &[EntryRow],
        previous: Option<(Entry, Vec<EntryRow>)>,
    ) {
        let restored = written
            .iter()
            .try_for_each(|row| self.storage.entry_rows.delete(row.id).map(|_| ()))
            .and_then(|()| self.storage.entries.delete(entry_id).map(|_| ()))
            .and_then(|()| match previous {
                Some((entry, rows)) => {
                    self.storage.entries.upsert(entry)?;
                    rows.into_iter()
                        .try_for_each(|row| self.storage.entry_rows.upsert(row))
                }
                None => Ok(()),
            })
            .and_then(|()| self.save());

        match restored {
            Ok(()) => tracing::debug!(entry = %entry_id, "failed commit rolled back"),
            Err(err) => tracing::error!(entry = %entry_id, error = %err, "rollback failed"),
        }
    }

    fn save(&self) -> LedgerResult<()> {
        self.storage.entry_rows.save()?;
        self.storage.entries.save()
    }
}

fn duplicate_row(id: EntryRowId) -> LedgerError {
    LedgerError::Duplicate {
        entity_type: "Entry row",
        identifier: id.to_string(),
    }
}
