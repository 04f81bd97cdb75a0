//! Reconciliation
//!
//! Reconciliation is staged: toggling a row only changes the working copy
//! held by a [`ReconciliationSession`]. A commit is accepted only when the
//! rows flagged reconciled sum to zero, and only rows whose flag differs
//! from the last persisted state are written.

use std::collections::HashMap;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{EntryRow, EntryRowId, Money};
use crate::storage::Storage;

use super::balance::total;

/// In-memory reconciliation state for a set of rows
#[derive(Debug, Clone, Default)]
pub struct ReconciliationSession {
    rows: Vec<EntryRow>,
    persisted: HashMap<EntryRowId, bool>,
}

impl ReconciliationSession {
    /// Start a session from rows as they are stored
    pub fn new(rows: Vec<EntryRow>) -> Self {
        let persisted = rows.iter().map(|r| (r.id, r.reconciled)).collect();
        Self { rows, persisted }
    }

    /// The working copy
    pub fn rows(&self) -> &[EntryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flip the reconciled flag of the row at `index`, returning the new flag
    pub fn toggle(&mut self, index: usize) -> LedgerResult<bool> {
        let row = self.rows.get_mut(index).ok_or(LedgerError::NoSelection)?;
        row.reconciled = !row.reconciled;
        Ok(row.reconciled)
    }

    /// Sum of the rows currently flagged reconciled
    pub fn reconciled_total(&self) -> LedgerResult<Money> {
        total(self.rows.iter().filter(|r| r.reconciled))
    }

    /// Rows whose flag differs from the persisted state
    pub fn changed_rows(&self) -> Vec<EntryRow> {
        self.rows
            .iter()
            .filter(|r| self.persisted.get(&r.id).copied() != Some(r.reconciled))
            .cloned()
            .collect()
    }

    pub fn is_dirty(&self) -> bool {
        self.rows
            .iter()
            .any(|r| self.persisted.get(&r.id).copied() != Some(r.reconciled))
    }

    /// Check the zero-sum rule and return the rows that need writing
    pub fn prepare_commit(&self) -> LedgerResult<Vec<EntryRow>> {
        let reconciled = self.reconciled_total()?;
        if !reconciled.is_zero() {
            return Err(LedgerError::UnbalancedReconciliation { total: reconciled });
        }
        Ok(self.changed_rows())
    }

    /// Record that `rows` have been written
    ///
    /// Only the given rows move the snapshot, so toggles made while a
    /// commit was in flight stay dirty.
    pub fn mark_persisted(&mut self, rows: &[EntryRow]) {
        for row in rows {
            self.persisted.insert(row.id, row.reconciled);
        }
    }
}

/// Write the reconciled flag of `rows` to storage
///
/// Every other field is taken from the stored row, so a stale working copy
/// never overwrites edits made elsewhere.
pub fn persist_reconciled(storage: &Storage, rows: &[EntryRow]) -> LedgerResult<usize> {
    let _commit = storage.begin_commit()?;
    for row in rows {
        let mut stored = storage.entry_rows.select_required(row.id)?;
        stored.reconciled = row.reconciled;
        storage.entry_rows.update(stored)?;
    }
    if !rows.is_empty() {
        storage.entry_rows.save()?;
    }

    tracing::info!(rows = rows.len(), "reconciliation committed");
    Ok(rows.len())
}
