//! Delete confirmation view

use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::error::LedgerResult;
use crate::models::{Account, Journal, Ledger, ModelKind, RecordId};
use crate::services::{EntryService, ReferenceService};
use crate::storage::Storage;
use crate::tui::effect::Effect;
use crate::tui::input::Mode;
use crate::tui::keybindings::BindingSet;
use crate::tui::load;
use crate::tui::message::{Action, CommitOutcome, DetailData, LoadedData, Msg, ViewKind};
use crate::tui::widgets::Notification;

use super::{View, ViewContext, ViewEvent};

pub struct DeleteView {
    record: RecordId,
    accepts: [ModelKind; 1],
    ctx: ViewContext,
    data: Option<DetailData>,
    bindings: BindingSet,
}

impl DeleteView {
    pub fn new(record: RecordId, ctx: ViewContext) -> Self {
        Self {
            record,
            accepts: [record.model_kind()],
            ctx,
            data: None,
            bindings: BindingSet::new()
                .with(Mode::Normal, "y", Action::Commit)
                .with(Mode::Normal, "n", Action::switch_view(ViewKind::List)),
        }
    }
}

/// Delete `record`, refusing references that are still in use
fn delete(storage: &Storage, record: RecordId) -> LedgerResult<CommitOutcome> {
    match record {
        RecordId::Ledger(id) => ReferenceService::<Ledger>::new(storage).delete(id).map(|_| ()),
        RecordId::Account(id) => ReferenceService::<Account>::new(storage).delete(id).map(|_| ()),
        RecordId::Journal(id) => ReferenceService::<Journal>::new(storage).delete(id).map(|_| ()),
        RecordId::Entry(id) => EntryService::new(storage).delete(id).map(|_| ()),
    }?;
    Ok(CommitOutcome::Deleted(record))
}

impl View for DeleteView {
    fn kind(&self) -> ViewKind {
        ViewKind::Delete
    }

    fn accepts(&self) -> &[ModelKind] {
        &self.accepts
    }

    fn bindings(&self) -> Option<&BindingSet> {
        Some(&self.bindings)
    }

    fn init(&mut self) -> Effect {
        let storage = self.ctx.storage.clone();
        let settings = self.ctx.settings.clone();
        let target = self.ctx.target;
        let record = self.record;
        Effect::run(move || {
            Msg::loaded(target, load::detail(&storage, &settings, record).map(LoadedData::Detail))
        })
    }

    fn update(&mut self, event: ViewEvent) -> LedgerResult<Effect> {
        match event {
            ViewEvent::Loaded(LoadedData::Detail(data)) => self.data = Some(data),
            ViewEvent::LoadFailed(error) => return Err(error),
            ViewEvent::Action(Action::Commit) => {
                let storage = self.ctx.storage.clone();
                let target = self.ctx.target;
                let record = self.record;
                return Ok(Effect::run(move || Msg::Committed {
                    target,
                    model: record.model_kind(),
                    result: delete(&storage, record),
                }));
            }
            ViewEvent::Committed(Ok(CommitOutcome::Deleted(record))) => {
                let name = self
                    .data
                    .as_ref()
                    .map(|d| d.title.clone())
                    .unwrap_or_else(|| record.to_string());
                return Ok(Effect::batch([
                    self.ctx.notify(Notification::success(format!(
                        "{} '{}' deleted",
                        record.model_kind(),
                        name
                    ))),
                    self.ctx.navigate(ViewKind::List, None),
                ]));
            }
            ViewEvent::Committed(Err(error)) => return Err(error),
            _ => {}
        }
        Ok(Effect::none())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Delete {} ", self.record.model_kind()))
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let mut lines = Vec::new();
        match &self.data {
            Some(data) => {
                lines.push(Line::from(Span::styled(
                    data.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for (name, value) in &data.fields {
                    lines.push(Line::from(vec![
                        Span::styled(format!("{:<10}", name), Style::default().fg(Color::Cyan)),
                        Span::raw(value.clone()),
                    ]));
                }
                if !data.rows.is_empty() {
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        format!("{} row(s) reference this record", data.rows.len()),
                        Style::default().fg(Color::Yellow),
                    )));
                }
            }
            None => lines.push(Line::from("Loading...")),
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), chunks[0]);

        let prompt = Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" delete   "),
            Span::styled("n", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]);
        frame.render_widget(Paragraph::new(prompt), chunks[1]);
    }

    fn selected(&self) -> Option<RecordId> {
        Some(self.record)
    }

    fn record(&self) -> Option<RecordId> {
        Some(self.record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Entry, EntryRow, JournalType, LedgerType, Money};
    use crate::tui::message::AppKind;
    use crate::tui::views::fixtures::{context, drive, send};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_delete_unused_ledger() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Ledgers);
        let storage = ctx.storage.clone();
        let ledger = Ledger::new("Old", LedgerType::Expense);
        storage.ledgers.insert(ledger.clone()).unwrap();

        let mut view = DeleteView::new(ledger.id.into(), ctx);
        let effect = view.init();
        drive(&mut view, effect);

        let msgs = send(&mut view, ViewEvent::Action(Action::Commit));
        assert!(msgs
            .iter()
            .any(|m| matches!(m, Msg::Notify(n) if n.message == "Ledger 'Old' deleted")));
        assert!(msgs.iter().any(|m| matches!(
            m,
            Msg::Navigate { kind: ViewKind::List, record: None, .. }
        )));
        assert_eq!(storage.ledgers.count().unwrap(), 0);
    }

    #[test]
    fn test_referenced_journal_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Journals);
        let storage = ctx.storage.clone();

        let journal = Journal::new("Sales", JournalType::Income);
        let bank = Ledger::new("Bank", LedgerType::Asset);
        storage.journals.insert(journal.clone()).unwrap();
        storage.ledgers.insert(bank.clone()).unwrap();
        let entry = Entry::new(journal.id, "");
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        EntryService::new(&storage)
            .create(
                entry.clone(),
                vec![
                    EntryRow::new(entry.id, bank.id, date, Money::from_cents(100)),
                    EntryRow::new(entry.id, bank.id, date, Money::from_cents(-100)),
                ],
            )
            .unwrap();

        let mut view = DeleteView::new(journal.id.into(), ctx);
        let msgs = send(&mut view, ViewEvent::Action(Action::Commit));

        assert!(matches!(msgs.as_slice(), [Msg::Notify(n)] if n.message.contains("still used")));
        assert_eq!(storage.journals.count().unwrap(), 1);
    }

    #[test]
    fn test_delete_entry_cascades() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Entries);
        let storage = ctx.storage.clone();

        let journal = Journal::new("General", JournalType::General);
        let bank = Ledger::new("Bank", LedgerType::Asset);
        storage.journals.insert(journal.clone()).unwrap();
        storage.ledgers.insert(bank.clone()).unwrap();
        let entry = Entry::new(journal.id, "Mistake");
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        EntryService::new(&storage)
            .create(
                entry.clone(),
                vec![
                    EntryRow::new(entry.id, bank.id, date, Money::from_cents(100)),
                    EntryRow::new(entry.id, bank.id, date, Money::from_cents(-100)),
                ],
            )
            .unwrap();

        let mut view = DeleteView::new(entry.id.into(), ctx);
        send(&mut view, ViewEvent::Action(Action::Commit));

        assert_eq!(storage.entries.count().unwrap(), 0);
        assert_eq!(storage.entry_rows.count().unwrap(), 0);
    }
}
