//! Detail view
//!
//! Shows one record with its postings (or, for a journal, its entries).
//! Ledger and account details also stage reconciliation of their rows.

use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ModelKind, RecordId};
use crate::services::{persist_reconciled, ReconciliationSession};
use crate::tui::effect::Effect;
use crate::tui::input::Mode;
use crate::tui::keybindings::BindingSet;
use crate::tui::load;
use crate::tui::message::{Action, CommitOutcome, DetailData, Direction, LoadedData, Msg, ViewKind};
use crate::tui::widgets::Notification;

use super::{step, View, ViewContext, ViewEvent};

pub struct DetailView {
    record: RecordId,
    accepts: [ModelKind; 2],
    ctx: ViewContext,
    data: Option<DetailData>,
    /// Present for ledgers and accounts once loaded
    session: Option<ReconciliationSession>,
    selected: usize,
    bindings: BindingSet,
}

impl DetailView {
    pub fn new(record: RecordId, ctx: ViewContext) -> Self {
        let mut bindings =
            BindingSet::new().with(Mode::Normal, "d d", Action::switch_view(ViewKind::Delete));
        if Self::reconciles(record) {
            bindings
                .bind(Mode::Normal, "r", Action::ToggleReconciled)
                .bind(Mode::Normal, "R", Action::Reconcile);
        }

        Self {
            record,
            accepts: [record.model_kind(), ModelKind::EntryRow],
            ctx,
            data: None,
            session: None,
            selected: 0,
            bindings,
        }
    }

    fn reconciles(record: RecordId) -> bool {
        matches!(record, RecordId::Ledger(_) | RecordId::Account(_))
    }

    pub fn session(&self) -> Option<&ReconciliationSession> {
        self.session.as_ref()
    }

    fn len(&self) -> usize {
        match &self.data {
            Some(data) if matches!(self.record, RecordId::Journal(_)) => data.entries.len(),
            Some(data) => data.rows.len(),
            None => 0,
        }
    }

    /// Where `enter` on the highlighted line leads
    fn target_of_selection(&self) -> Option<RecordId> {
        let data = self.data.as_ref()?;
        match self.record {
            RecordId::Journal(_) => data.entries.get(self.selected).map(|e| e.id),
            RecordId::Entry(_) => data
                .rows
                .get(self.selected)
                .map(|r| r.row.ledger_id.into()),
            RecordId::Ledger(_) | RecordId::Account(_) => data
                .rows
                .get(self.selected)
                .map(|r| r.row.entry_id.into()),
        }
    }

    fn toggle(&mut self) -> LedgerResult<Effect> {
        let session = self.session.as_mut().ok_or_else(|| {
            LedgerError::Validation(format!("{} rows cannot be reconciled here", self.record.model_kind()))
        })?;
        session.toggle(self.selected)?;
        Ok(Effect::none())
    }

    fn commit(&mut self) -> LedgerResult<Effect> {
        let Some(session) = self.session.as_ref() else {
            return Ok(Effect::none());
        };

        let changed = session.prepare_commit()?;
        if changed.is_empty() {
            return Ok(Effect::none());
        }

        let storage = self.ctx.storage.clone();
        let target = self.ctx.target;
        Ok(Effect::run(move || {
            let result = persist_reconciled(&storage, &changed).map(|_| CommitOutcome::Reconciled(changed));
            Msg::Committed {
                target,
                model: ModelKind::EntryRow,
                result,
            }
        }))
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect, data: &DetailData) {
        let lines: Vec<Line> = data
            .fields
            .iter()
            .map(|(name, value)| {
                Line::from(vec![
                    Span::styled(format!("{:<10}", name), Style::default().fg(Color::Cyan)),
                    Span::raw(value.clone()),
                ])
            })
            .collect();

        let block = Block::default()
            .title(format!(" {} ", data.title))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL);
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect, data: &DetailData) {
        let settings = &self.ctx.settings;
        let symbol = settings.currency_symbol.as_str();

        let title = match &self.session {
            Some(session) => {
                let total = session.reconciled_total().unwrap_or_default();
                let marker = if session.is_dirty() { " *" } else { "" };
                format!(" Rows | reconciled {}{} ", total.format_with_symbol(symbol), marker)
            }
            None => " Rows ".to_string(),
        };

        let header = Row::new(vec!["Date", "Ledger", "Account", "Description", "Value", "R"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = data
            .rows
            .iter()
            .enumerate()
            .map(|(i, detail)| {
                // The session holds the staged flags
                let reconciled = self
                    .session
                    .as_ref()
                    .and_then(|s| s.rows().get(i))
                    .map(|r| r.reconciled)
                    .unwrap_or(detail.row.reconciled);
                let value_style = if detail.row.value.is_negative() {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default().fg(Color::Green)
                };
                Row::new(vec![
                    Cell::from(detail.row.date.format(&settings.date_format).to_string()),
                    Cell::from(detail.ledger.clone()),
                    Cell::from(detail.account.clone()),
                    Cell::from(detail.row.description.clone()),
                    Cell::from(detail.row.value.format_with_symbol(symbol)).style(value_style),
                    Cell::from(if reconciled { "✓" } else { "" }),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(12),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Min(10),
            Constraint::Length(14),
            Constraint::Length(3),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

        let mut state = TableState::default();
        if !data.rows.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn render_entries(&self, frame: &mut Frame, area: Rect, data: &DetailData) {
        let rows: Vec<Row> = data
            .entries
            .iter()
            .map(|e| Row::new(vec![Cell::from(e.label.clone()), Cell::from(e.detail.clone())]))
            .collect();

        let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
            .block(Block::default().title(" Entries ").borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

        let mut state = TableState::default();
        if !data.entries.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl View for DetailView {
    fn kind(&self) -> ViewKind {
        ViewKind::Detail
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
            let result = load::detail(&storage, &settings, record).map(LoadedData::Detail);
            Msg::loaded(target, result)
        })
    }

    fn update(&mut self, event: ViewEvent) -> LedgerResult<Effect> {
        match event {
            ViewEvent::Loaded(LoadedData::Detail(data)) => {
                if Self::reconciles(self.record) {
                    let rows = data.rows.iter().map(|r| r.row.clone()).collect();
                    self.session = Some(ReconciliationSession::new(rows));
                }
                self.data = Some(data);
                self.selected = self.selected.min(self.len().saturating_sub(1));
            }
            ViewEvent::LoadFailed(error) => return Err(error),
            ViewEvent::Committed(Ok(CommitOutcome::Reconciled(rows))) => {
                if let Some(session) = self.session.as_mut() {
                    session.mark_persisted(&rows);
                }
                return Ok(self
                    .ctx
                    .notify(Notification::success(format!("{} row(s) reconciled", rows.len()))));
            }
            ViewEvent::Committed(Err(error)) => return Err(error),
            ViewEvent::Action(action) => match action {
                Action::Navigate(Direction::Down) => {
                    self.selected = step(self.selected, self.len(), true);
                }
                Action::Navigate(Direction::Up) => {
                    self.selected = step(self.selected, self.len(), false);
                }
                Action::JumpVertical { to_end } => {
                    self.selected = if to_end { self.len().saturating_sub(1) } else { 0 };
                }
                Action::ToggleReconciled => return self.toggle(),
                Action::Reconcile | Action::Commit => return self.commit(),
                Action::Select => {
                    let record = self.target_of_selection().ok_or(LedgerError::NoSelection)?;
                    return Ok(self.ctx.navigate(ViewKind::Detail, Some(record)));
                }
                _ => {}
            },
            _ => {}
        }
        Ok(Effect::none())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let Some(data) = self.data.as_ref() else {
            let block = Block::default().title(" Loading ").borders(Borders::ALL);
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
            return;
        };

        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(data.fields.len() as u16 + 2),
                Constraint::Min(3),
            ])
            .split(area);

        self.render_fields(frame, chunks[0], data);
        if matches!(self.record, RecordId::Journal(_)) {
            self.render_entries(frame, chunks[1], data);
        } else {
            self.render_rows(frame, chunks[1], data);
        }
    }

    fn selected(&self) -> Option<RecordId> {
        Some(self.record)
    }

    fn record(&self) -> Option<RecordId> {
        Some(self.record)
    }
}
