//! Queries behind the load effects
//!
//! Each function reads storage once and returns display-ready data. They
//! run on worker threads, never inside an update step.

use std::collections::HashMap;

use crate::config::Settings;
use crate::error::LedgerResult;
use crate::models::{
    AccountId, Entry, EntryRow, JournalId, LedgerId, ModelKind, Money, RecordId,
};
use crate::services::balance;
use crate::storage::Storage;

use super::message::{DetailData, DetailRow, ListItem, LoadedData};

struct Names {
    ledgers: HashMap<LedgerId, String>,
    accounts: HashMap<AccountId, String>,
    journals: HashMap<JournalId, String>,
}

impl Names {
    fn load(storage: &Storage) -> LedgerResult<Self> {
        Ok(Self {
            ledgers: storage
                .ledgers
                .select_all()?
                .into_iter()
                .map(|l| (l.id, l.name))
                .collect(),
            accounts: storage
                .accounts
                .select_all()?
                .into_iter()
                .map(|a| (a.id, a.name))
                .collect(),
            journals: storage
                .journals
                .select_all()?
                .into_iter()
                .map(|j| (j.id, j.name))
                .collect(),
        })
    }

    fn ledger(&self, id: LedgerId) -> String {
        self.ledgers.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }

    fn account(&self, id: Option<AccountId>) -> String {
        match id {
            Some(id) => self.accounts.get(&id).cloned().unwrap_or_else(|| id.to_string()),
            None => String::new(),
        }
    }

    fn journal(&self, id: JournalId) -> String {
        self.journals.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }
}

/// Items for a list view or picker
pub fn list_items(storage: &Storage, settings: &Settings, model: ModelKind) -> LedgerResult<Vec<ListItem>> {
    let items = match model {
        ModelKind::Ledger => storage
            .ledgers
            .select_all()?
            .into_iter()
            .map(|l| ListItem {
                id: l.id.into(),
                label: l.name,
                detail: l.kind.to_string(),
            })
            .collect(),
        ModelKind::Account => storage
            .accounts
            .select_all()?
            .into_iter()
            .map(|a| ListItem {
                id: a.id.into(),
                label: a.name,
                detail: a.kind.to_string(),
            })
            .collect(),
        ModelKind::Journal => storage
            .journals
            .select_all()?
            .into_iter()
            .map(|j| ListItem {
                id: j.id.into(),
                label: j.name,
                detail: j.kind.to_string(),
            })
            .collect(),
        ModelKind::Entry => {
            let names = Names::load(storage)?;
            entry_items(storage, settings, &names, storage.entries.select_all()?)?
        }
        ModelKind::EntryRow => Vec::new(),
    };
    Ok(items)
}

fn entry_items(
    storage: &Storage,
    settings: &Settings,
    names: &Names,
    entries: Vec<Entry>,
) -> LedgerResult<Vec<ListItem>> {
    let mut items = Vec::with_capacity(entries.len());
    for entry in entries {
        let rows = storage.rows_for_entry(entry.id)?;
        let date = rows
            .iter()
            .map(|r| r.date)
            .min()
            .map(|d| d.format(&settings.date_format).to_string())
            .unwrap_or_default();
        let gross: Money = rows.iter().filter(|r| r.value.is_positive()).map(|r| r.value).sum();
        let notes = if entry.notes.is_empty() {
            entry.id.to_string()
        } else {
            entry.notes.clone()
        };

        items.push(ListItem {
            id: entry.id.into(),
            label: format!("{} {}", date, notes).trim().to_string(),
            detail: format!(
                "{} | {}",
                names.journal(entry.journal_id),
                gross.format_with_symbol(&settings.currency_symbol)
            ),
        });
    }
    Ok(items)
}

/// Fields and postings of one record
pub fn detail(storage: &Storage, settings: &Settings, record: RecordId) -> LedgerResult<DetailData> {
    let names = Names::load(storage)?;
    let symbol = settings.currency_symbol.as_str();

    let (title, mut fields, rows, entries) = match record {
        RecordId::Ledger(id) => {
            let ledger = storage.ledgers.select_required(id)?;
            (
                ledger.name.clone(),
                vec![
                    ("Type".to_string(), ledger.kind.to_string()),
                    ("Notes".to_string(), ledger.notes.clone()),
                ],
                storage.rows_for_ledger(id)?,
                Vec::new(),
            )
        }
        RecordId::Account(id) => {
            let account = storage.accounts.select_required(id)?;
            (
                account.name.clone(),
                vec![
                    ("Type".to_string(), account.kind.to_string()),
                    ("Notes".to_string(), account.notes.clone()),
                ],
                storage.rows_for_account(id)?,
                Vec::new(),
            )
        }
        RecordId::Journal(id) => {
            let journal = storage.journals.select_required(id)?;
            let entries = storage.entries_for_journal(id)?;
            (
                journal.name.clone(),
                vec![
                    ("Type".to_string(), journal.kind.to_string()),
                    ("Notes".to_string(), journal.notes.clone()),
                    ("Entries".to_string(), entries.len().to_string()),
                ],
                Vec::new(),
                entry_items(storage, settings, &names, entries)?,
            )
        }
        RecordId::Entry(id) => {
            let entry = storage.entries.select_required(id)?;
            (
                entry.to_string(),
                vec![
                    ("Journal".to_string(), names.journal(entry.journal_id)),
                    ("Notes".to_string(), entry.notes.clone()),
                ],
                storage.rows_for_entry(id)?,
                Vec::new(),
            )
        }
    };

    if !rows.is_empty() {
        let balance = balance::total(&rows)?;
        fields.push(("Balance".to_string(), balance.format_with_symbol(symbol)));
    }

    Ok(DetailData {
        model: record.model_kind(),
        record,
        title,
        fields,
        rows: rows.into_iter().map(|row| detail_row(&names, row)).collect(),
        entries,
    })
}

fn detail_row(names: &Names, row: EntryRow) -> DetailRow {
    DetailRow {
        ledger: names.ledger(row.ledger_id),
        account: names.account(row.account_id),
        row,
    }
}

/// A record in the shape its edit form expects
pub fn record(storage: &Storage, record: RecordId) -> LedgerResult<LoadedData> {
    Ok(match record {
        RecordId::Ledger(id) => LoadedData::Ledger(storage.ledgers.select_required(id)?),
        RecordId::Account(id) => LoadedData::Account(storage.accounts.select_required(id)?),
        RecordId::Journal(id) => LoadedData::Journal(storage.journals.select_required(id)?),
        RecordId::Entry(id) => LoadedData::Entry {
            entry: storage.entries.select_required(id)?,
            rows: storage.rows_for_entry(id)?,
        },
    })
}
