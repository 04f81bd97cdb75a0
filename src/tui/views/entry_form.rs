//! Entry form
//!
//! Edits an entry together with its rows. Reference fields are filled
//! through the item picker; amounts and dates are typed. The running total
//! is shown while editing, and nothing unbalanced is ever submitted.

use chrono::{Local, NaiveDate};
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, Entry, EntryId, EntryRow, EntryRowId, JournalId, LedgerId, ModelKind, Money, RecordId,
};
use crate::services::{balancing_value, sum_values, validate_balance, EntryService};
use crate::tui::effect::Effect;
use crate::tui::input::Mode;
use crate::tui::keybindings::BindingSet;
use crate::tui::load;
use crate::tui::message::{
    Action, CommitOutcome, Cycle, Direction, ListItem, LoadedData, Msg, PickSlot, PickerRequest, ViewKind,
};
use crate::tui::widgets::{Notification, TextInput};

use super::{View, ViewContext, ViewEvent};

static ACCEPTS: [ModelKind; 4] = [
    ModelKind::Entry,
    ModelKind::Ledger,
    ModelKind::Account,
    ModelKind::Journal,
];

/// Header fields before the first row
const HEADER_FIELDS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Ledger,
    Account,
    Date,
    Description,
    Value,
}

impl Column {
    const ALL: [Column; 5] = [
        Column::Ledger,
        Column::Account,
        Column::Date,
        Column::Description,
        Column::Value,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Journal,
    Notes,
    Row { index: usize, column: Column },
}

/// A row as it is being edited
///
/// `date_value` and `amount` hold the real values of a row until the user
/// changes the matching text; only typed text is ever parsed.
#[derive(Debug, Clone)]
struct RowDraft {
    /// Set for rows that already exist
    id: Option<EntryRowId>,
    ledger: Option<LedgerId>,
    account: Option<AccountId>,
    date: TextInput,
    date_value: Option<NaiveDate>,
    description: TextInput,
    value: TextInput,
    amount: Option<Money>,
    reconciled: bool,
}

impl RowDraft {
    fn new(date: NaiveDate, amount: Option<Money>, date_format: &str) -> Self {
        Self {
            id: None,
            ledger: None,
            account: None,
            date: TextInput::default().content(date.format(date_format).to_string()),
            date_value: Some(date),
            description: TextInput::default(),
            value: TextInput::default()
                .content(amount.map(|m| m.to_input_string()).unwrap_or_default()),
            amount,
            reconciled: false,
        }
    }

    fn from_row(row: &EntryRow, date_format: &str) -> Self {
        Self {
            id: Some(row.id),
            description: TextInput::default().content(row.description.clone()),
            ledger: Some(row.ledger_id),
            account: row.account_id,
            reconciled: row.reconciled,
            ..Self::new(row.date, Some(row.value), date_format)
        }
    }

    /// Feed typed keys to `column`, dropping the held value if its text changed
    fn type_into(&mut self, column: Column, keys: &[KeyEvent]) {
        let Some(input) = self.input_mut(column) else {
            return;
        };
        let before = input.value().to_string();
        for key in keys {
            input.handle_key(key);
        }
        if input.value() == before {
            return;
        }
        match column {
            Column::Date => self.date_value = None,
            Column::Value => self.amount = None,
            _ => {}
        }
    }

    /// The date of the row, parsing the text only once it was edited
    fn date(&self, date_format: &str) -> Option<NaiveDate> {
        self.date_value
            .or_else(|| NaiveDate::parse_from_str(self.date.value().trim(), date_format).ok())
    }

    fn input_mut(&mut self, column: Column) -> Option<&mut TextInput> {
        match column {
            Column::Date => Some(&mut self.date),
            Column::Description => Some(&mut self.description),
            Column::Value => Some(&mut self.value),
            Column::Ledger | Column::Account => None,
        }
    }

    /// The amount of the row, if it has one
    fn amount(&self) -> Option<Money> {
        self.amount.or_else(|| Money::parse(self.value.value()).ok())
    }

    fn to_row(&self, number: usize, entry_id: EntryId, date_format: &str) -> LedgerResult<EntryRow> {
        let ledger = self
            .ledger
            .ok_or_else(|| LedgerError::Validation(format!("Row {}: select a ledger", number)))?;

        let date = self.date(date_format).ok_or_else(|| {
            LedgerError::Validation(format!(
                "Row {}: '{}' is not a date ({})",
                number,
                self.date.value().trim(),
                date_format
            ))
        })?;

        let value = match self.amount {
            Some(amount) => amount,
            None => Money::parse(self.value.value())
                .map_err(|e| LedgerError::Validation(format!("Row {}: {}", number, e)))?,
        };

        let mut row = EntryRow::new(entry_id, ledger, date, value)
            .with_description(self.description.value().trim());
        if let Some(id) = self.id {
            row.id = id;
        }
        row.account_id = self.account;
        row.reconciled = self.reconciled;
        Ok(row)
    }
}

/// Picker choices, filled by the load effects
#[derive(Debug, Default)]
struct Choices {
    journals: Option<Vec<ListItem>>,
    ledgers: Option<Vec<ListItem>>,
    accounts: Option<Vec<ListItem>>,
}

impl Choices {
    fn set(&mut self, model: ModelKind, items: Vec<ListItem>) {
        match model {
            ModelKind::Journal => self.journals = Some(items),
            ModelKind::Ledger => self.ledgers = Some(items),
            ModelKind::Account => self.accounts = Some(items),
            ModelKind::Entry | ModelKind::EntryRow => {}
        }
    }

    fn get(&self, model: ModelKind) -> Option<&Vec<ListItem>> {
        match model {
            ModelKind::Journal => self.journals.as_ref(),
            ModelKind::Ledger => self.ledgers.as_ref(),
            ModelKind::Account => self.accounts.as_ref(),
            ModelKind::Entry | ModelKind::EntryRow => None,
        }
    }

    /// Display name of `id`, falling back to the id itself
    fn label(&self, id: Option<RecordId>) -> String {
        let Some(id) = id else {
            return String::new();
        };
        self.get(id.model_kind())
            .and_then(|items| items.iter().find(|i| i.id == id))
            .map(|i| i.label.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

pub struct EntryForm {
    view: ViewKind,
    entry_id: Option<EntryId>,
    original: Option<Entry>,
    ctx: ViewContext,
    journal: Option<JournalId>,
    notes: TextInput,
    rows: Vec<RowDraft>,
    focus: usize,
    choices: Choices,
    bindings: BindingSet,
}

impl EntryForm {
    fn new(view: ViewKind, entry_id: Option<EntryId>, ctx: ViewContext) -> Self {
        let rows = match entry_id {
            Some(_) => Vec::new(),
            None => vec![RowDraft::new(
                Local::now().date_naive(),
                None,
                &ctx.settings.date_format,
            )],
        };

        let mut form = Self {
            view,
            entry_id,
            original: None,
            ctx,
            journal: None,
            notes: TextInput::new("Notes").placeholder("optional"),
            rows,
            focus: 0,
            choices: Choices::default(),
            bindings: BindingSet::new()
                .with(Mode::Normal, "o", Action::AddRow)
                .with(Mode::Normal, "d d", Action::DeleteRow),
        };
        form.refresh_focus();
        form
    }

    /// An empty entry with one row dated today
    pub fn create(ctx: ViewContext) -> Self {
        Self::new(ViewKind::Create, None, ctx)
    }

    pub fn edit(id: EntryId, ctx: ViewContext) -> Self {
        Self::new(ViewKind::Update, Some(id), ctx)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Sum of the amounts that currently parse
    pub fn running_total(&self) -> Money {
        sum_values(self.rows.iter().filter_map(RowDraft::amount)).unwrap_or_default()
    }

    fn focus_count(&self) -> usize {
        HEADER_FIELDS + self.rows.len() * Column::ALL.len()
    }

    fn focused(&self) -> Focus {
        match self.focus {
            0 => Focus::Journal,
            1 => Focus::Notes,
            n => {
                let n = n - HEADER_FIELDS;
                Focus::Row {
                    index: n / Column::ALL.len(),
                    column: Column::ALL[n % Column::ALL.len()],
                }
            }
        }
    }

    fn focus_row(&mut self, index: usize, column: Column) {
        self.focus = HEADER_FIELDS + index * Column::ALL.len() + column.position();
        self.refresh_focus();
    }

    fn refresh_focus(&mut self) {
        if self.focus >= self.focus_count() {
            self.focus = self.focus_count().saturating_sub(1);
        }
        let focus = self.focused();
        self.notes.focused = focus == Focus::Notes;
        for (i, row) in self.rows.iter_mut().enumerate() {
            for column in [Column::Date, Column::Description, Column::Value] {
                let focused = focus == Focus::Row { index: i, column };
                if let Some(input) = row.input_mut(column) {
                    input.focused = focused;
                }
            }
        }
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused() {
            Focus::Notes => Some(&mut self.notes),
            Focus::Row { index, column } => self.rows.get_mut(index)?.input_mut(column),
            Focus::Journal => None,
        }
    }

    fn navigate(&mut self, direction: Direction) {
        match (self.focused(), direction) {
            (Focus::Row { index, column }, Direction::Down) => {
                if index + 1 < self.rows.len() {
                    self.focus_row(index + 1, column);
                }
            }
            (Focus::Row { index: 0, .. }, Direction::Up) => {
                self.focus = 1;
                self.refresh_focus();
            }
            (Focus::Row { index, column }, Direction::Up) => self.focus_row(index - 1, column),
            (Focus::Row { index, column }, Direction::Right) => {
                let next = (column.position() + 1).min(Column::ALL.len() - 1);
                self.focus_row(index, Column::ALL[next]);
            }
            (Focus::Row { index, column }, Direction::Left) => {
                let prev = column.position().saturating_sub(1);
                self.focus_row(index, Column::ALL[prev]);
            }
            (_, Direction::Down) => self.cycle(Cycle::Next),
            (_, Direction::Up) => self.cycle(Cycle::Prev),
            (Focus::Journal | Focus::Notes, Direction::Left | Direction::Right) => {}
        }
    }

    fn cycle(&mut self, cycle: Cycle) {
        let count = self.focus_count();
        self.focus = match cycle {
            Cycle::Next => (self.focus + 1) % count,
            Cycle::Prev => (self.focus + count - 1) % count,
        };
        self.refresh_focus();
    }

    fn add_row(&mut self) -> LedgerResult<Effect> {
        let balance = balancing_value(self.rows.iter().filter_map(RowDraft::amount))?;
        let date_format = self.ctx.settings.date_format.as_str();
        let date = self
            .rows
            .last()
            .and_then(|row| row.date(date_format))
            .unwrap_or_else(|| Local::now().date_naive());
        self.rows.push(RowDraft::new(date, Some(balance), date_format));
        self.focus_row(self.rows.len() - 1, Column::Ledger);
        Ok(Effect::none())
    }

    fn delete_row(&mut self) -> LedgerResult<Effect> {
        let Focus::Row { index, column } = self.focused() else {
            return Err(LedgerError::NoSelection);
        };
        self.rows.remove(index);
        if self.rows.is_empty() {
            self.focus = 1;
            self.refresh_focus();
        } else {
            self.focus_row(index.min(self.rows.len() - 1), column);
        }
        Ok(Effect::none())
    }

    fn pick(&self) -> LedgerResult<Effect> {
        let (slot, current, allow_none) = match self.focused() {
            Focus::Journal => (PickSlot::Journal, self.journal.map(RecordId::from), false),
            Focus::Row {
                index,
                column: Column::Ledger,
            } => (
                PickSlot::Ledger { row: index },
                self.rows[index].ledger.map(RecordId::from),
                false,
            ),
            Focus::Row {
                index,
                column: Column::Account,
            } => (
                PickSlot::Account { row: index },
                self.rows[index].account.map(RecordId::from),
                true,
            ),
            _ => return Ok(Effect::none()),
        };

        let model = slot.model();
        let items = self
            .choices
            .get(model)
            .ok_or_else(|| LedgerError::Validation(format!("{} choices are still loading", model)))?
            .clone();

        Ok(Effect::message(Msg::ShowPicker(PickerRequest {
            target: self.ctx.target,
            slot,
            title: format!("Select {}", model),
            items,
            current,
            allow_none,
        })))
    }

    fn apply_pick(&mut self, slot: PickSlot, choice: Option<RecordId>) {
        match (slot, choice) {
            (PickSlot::Journal, Some(RecordId::Journal(id))) => self.journal = Some(id),
            (PickSlot::Ledger { row }, Some(RecordId::Ledger(id))) => {
                if let Some(draft) = self.rows.get_mut(row) {
                    draft.ledger = Some(id);
                }
            }
            (PickSlot::Account { row }, choice) => {
                if let Some(draft) = self.rows.get_mut(row) {
                    draft.account = match choice {
                        Some(RecordId::Account(id)) => Some(id),
                        _ => None,
                    };
                }
            }
            _ => {}
        }
    }

    /// Turn the form into an entry and rows, checking everything but storage
    fn build(&self) -> LedgerResult<(Entry, Vec<EntryRow>)> {
        let journal = self
            .journal
            .ok_or_else(|| LedgerError::Validation("Select a journal for the entry".into()))?;

        let mut entry = match (self.view, &self.original) {
            (ViewKind::Update, None) => {
                return Err(LedgerError::Validation("Entry is still loading".into()))
            }
            (_, Some(original)) => original.clone(),
            (_, None) => Entry::new(journal, ""),
        };
        entry.journal_id = journal;
        entry.notes = self.notes.value().trim().to_string();

        if self.rows.is_empty() {
            return Err(LedgerError::Validation("An entry needs at least one row".into()));
        }

        let date_format = self.ctx.settings.date_format.as_str();
        let rows = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, draft)| draft.to_row(i + 1, entry.id, date_format))
            .collect::<LedgerResult<Vec<_>>>()?;
        validate_balance(&rows)?;

        Ok((entry, rows))
    }

    fn commit(&self) -> LedgerResult<Effect> {
        let (entry, rows) = self.build()?;
        let creating = self.original.is_none();
        let storage = self.ctx.storage.clone();
        let target = self.ctx.target;

        Ok(Effect::run(move || {
            let service = EntryService::new(&storage);
            let result = if creating {
                service
                    .create(entry, rows)
                    .map(|e| CommitOutcome::Created(e.id.into()))
            } else {
                service
                    .update(entry, rows)
                    .map(|e| CommitOutcome::Updated(e.id.into()))
            };
            Msg::Committed {
                target,
                model: ModelKind::Entry,
                result,
            }
        }))
    }

    fn load_choices(&self, model: ModelKind) -> Effect {
        let storage = self.ctx.storage.clone();
        let settings = self.ctx.settings.clone();
        let target = self.ctx.target;
        Effect::run(move || {
            let result = load::list_items(&storage, &settings, model)
                .map(|items| LoadedData::Choices { model, items });
            Msg::loaded(target, result)
        })
    }

    fn cell_style(&self, focus: Focus) -> Style {
        if self.focused() == focus {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let title = match self.view {
            ViewKind::Create => " New Entry ".to_string(),
            _ => " Edit Entry ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let journal = match self.journal {
            Some(id) => self.choices.label(Some(id.into())),
            None => "(press enter to pick)".to_string(),
        };
        let line = Line::from(vec![
            Span::styled("Journal: ", Style::default().fg(Color::Cyan)),
            Span::styled(journal, self.cell_style(Focus::Journal)),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[0]);
        frame.render_widget(&self.notes, chunks[1]);
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect) {
        let symbol = self.ctx.settings.currency_symbol.as_str();
        let total = self.running_total();
        let (summary, color) = if total.is_zero() {
            (format!(" Balanced {} ", total.format_with_symbol(symbol)), Color::Green)
        } else {
            (format!(" Discrepancy {} ", total.format_with_symbol(symbol)), Color::Red)
        };

        let header = Row::new(vec!["Ledger", "Account", "Date", "Description", "Value"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .rows
            .iter()
            .enumerate()
            .map(|(index, draft)| {
                let text = |column: Column| match column {
                    Column::Ledger => self.choices.label(draft.ledger.map(RecordId::from)),
                    Column::Account => self.choices.label(draft.account.map(RecordId::from)),
                    Column::Date => draft.date.value().to_string(),
                    Column::Description => draft.description.value().to_string(),
                    Column::Value => draft.value.value().to_string(),
                };
                Row::new(
                    Column::ALL
                        .iter()
                        .map(|column| {
                            Cell::from(text(*column)).style(self.cell_style(Focus::Row {
                                index,
                                column: *column,
                            }))
                        })
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        let widths = [
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Length(12),
            Constraint::Min(10),
            Constraint::Length(14),
        ];
        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .title(" Rows ")
                .title_bottom(Line::from(Span::styled(summary, Style::default().fg(color))))
                .borders(Borders::ALL),
        );
        frame.render_widget(table, area);
    }
}

impl View for EntryForm {
    fn kind(&self) -> ViewKind {
        self.view
    }

    fn accepts(&self) -> &[ModelKind] {
        &ACCEPTS
    }

    fn bindings(&self) -> Option<&BindingSet> {
        Some(&self.bindings)
    }

    fn init(&mut self) -> Effect {
        let record = self.entry_id.map(|id| {
            let storage = self.ctx.storage.clone();
            let target = self.ctx.target;
            Effect::run(move || Msg::loaded(target, load::record(&storage, id.into())))
        });

        Effect::batch([
            self.load_choices(ModelKind::Journal),
            self.load_choices(ModelKind::Ledger),
            self.load_choices(ModelKind::Account),
            record.unwrap_or_default(),
        ])
    }

    fn update(&mut self, event: ViewEvent) -> LedgerResult<Effect> {
        match event {
            ViewEvent::Loaded(LoadedData::Choices { model, items }) => self.choices.set(model, items),
            ViewEvent::Loaded(LoadedData::Entry { entry, rows }) => {
                let date_format = self.ctx.settings.date_format.clone();
                self.journal = Some(entry.journal_id);
                self.notes.set_value(entry.notes.clone());
                self.rows = rows.iter().map(|r| RowDraft::from_row(r, &date_format)).collect();
                self.original = Some(entry);
                self.refresh_focus();
            }
            ViewEvent::Loaded(_) => {}
            ViewEvent::LoadFailed(error) => return Err(error),
            ViewEvent::Text(keys) => match self.focused() {
                Focus::Row { index, column } => {
                    if let Some(row) = self.rows.get_mut(index) {
                        row.type_into(column, &keys);
                    }
                }
                _ => {
                    if let Some(input) = self.focused_input() {
                        for key in &keys {
                            input.handle_key(key);
                        }
                    }
                }
            },
            ViewEvent::Picked { slot, choice } => self.apply_pick(slot, choice),
            ViewEvent::Action(action) => match action {
                Action::SwitchFocus(cycle) => self.cycle(cycle),
                Action::Navigate(direction) => self.navigate(direction),
                Action::JumpVertical { to_end } => {
                    if let Focus::Row { column, .. } = self.focused() {
                        let index = if to_end { self.rows.len() - 1 } else { 0 };
                        self.focus_row(index, column);
                    }
                }
                Action::JumpHorizontal { to_end } => {
                    if let Focus::Row { index, .. } = self.focused() {
                        let column = if to_end { Column::Value } else { Column::Ledger };
                        self.focus_row(index, column);
                    }
                }
                Action::AddRow => return self.add_row(),
                Action::DeleteRow => return self.delete_row(),
                Action::Select => return self.pick(),
                Action::Commit => return self.commit(),
                _ => {}
            },
            ViewEvent::Committed(Ok(CommitOutcome::Created(id) | CommitOutcome::Updated(id))) => {
                return Ok(Effect::batch([
                    self.ctx.notify(Notification::success("Entry saved")),
                    self.ctx.navigate(ViewKind::Detail, Some(id)),
                ]));
            }
            ViewEvent::Committed(Ok(_)) => {}
            ViewEvent::Committed(Err(error)) => return Err(error),
        }
        Ok(Effect::none())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_rows(frame, chunks[1]);

        let hints = Line::from(Span::styled(
            "enter: pick  o: add row  dd: delete row  i: type  ctrl+s: save",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(hints), chunks[2]);
    }

    fn selected(&self) -> Option<RecordId> {
        self.entry_id.map(RecordId::from)
    }

    fn record(&self) -> Option<RecordId> {
        self.entry_id.map(RecordId::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::models::{Journal, JournalType, Ledger, LedgerType};
    use crate::storage::Storage;
    use crate::tui::message::AppKind;
    use crate::tui::widgets::NotificationLevel;
    use std::sync::Arc;
    use crate::tui::views::fixtures::{context, drive, send};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    struct Fixture {
        journal: Journal,
        bank: Ledger,
        revenue: Ledger,
    }

    fn seeded(ctx: &ViewContext) -> Fixture {
        let fixture = Fixture {
            journal: Journal::new("Sales", JournalType::Income),
            bank: Ledger::new("Bank", LedgerType::Asset),
            revenue: Ledger::new("Revenue", LedgerType::Income),
        };
        ctx.storage.journals.insert(fixture.journal.clone()).unwrap();
        ctx.storage.ledgers.insert(fixture.bank.clone()).unwrap();
        ctx.storage.ledgers.insert(fixture.revenue.clone()).unwrap();
        fixture
    }

    fn typed(text: &str) -> ViewEvent {
        ViewEvent::Text(
            text.chars()
                .map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .collect(),
        )
    }

    fn action(action: Action) -> ViewEvent {
        ViewEvent::Action(action)
    }

    fn picked(slot: PickSlot, choice: impl Into<RecordId>) -> ViewEvent {
        ViewEvent::Picked {
            slot,
            choice: Some(choice.into()),
        }
    }

    #[test]
    fn test_create_balanced_entry() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Entries);
        let storage = ctx.storage.clone();
        let fixture = seeded(&ctx);

        let mut form = EntryForm::create(ctx);
        let effect = form.init();
        drive(&mut form, effect);

        send(&mut form, picked(PickSlot::Journal, fixture.journal.id));
        send(&mut form, picked(PickSlot::Ledger { row: 0 }, fixture.bank.id));

        // Journal -> Notes -> first row, then to its value column
        send(&mut form, action(Action::Navigate(Direction::Down)));
        send(&mut form, action(Action::Navigate(Direction::Down)));
        send(&mut form, action(Action::JumpHorizontal { to_end: true }));
        send(&mut form, typed("12.50"));
        assert_eq!(form.running_total(), Money::from_cents(1250));

        send(&mut form, action(Action::AddRow));
        assert_eq!(form.row_count(), 2);
        assert!(form.running_total().is_zero());
        send(&mut form, picked(PickSlot::Ledger { row: 1 }, fixture.revenue.id));

        let msgs = send(&mut form, action(Action::Commit));
        assert!(msgs.iter().any(|m| matches!(
            m,
            Msg::Navigate { kind: ViewKind::Detail, record: Some(RecordId::Entry(_)), .. }
        )));

        let entries = storage.entries.select_all().unwrap();
        assert_eq!(entries.len(), 1);
        let rows = storage.rows_for_entry(entries[0].id).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r.ledger_id == fixture.revenue.id && r.value.cents() == -1250));
    }

    #[test]
    fn test_unbalanced_entry_is_not_submitted() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Entries);
        let storage = ctx.storage.clone();
        let fixture = seeded(&ctx);

        let mut form = EntryForm::create(ctx);
        send(&mut form, picked(PickSlot::Journal, fixture.journal.id));
        send(&mut form, picked(PickSlot::Ledger { row: 0 }, fixture.bank.id));
        form.focus_row(0, Column::Value);
        send(&mut form, typed("10"));

        let err = form.update(action(Action::Commit)).err().unwrap();
        assert!(matches!(err, LedgerError::Unbalanced { discrepancy } if discrepancy.cents() == 1000));
        assert_eq!(storage.entries.count().unwrap(), 0);
    }

    #[test]
    fn test_missing_journal_and_ledger_are_reported() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Entries);
        let fixture = seeded(&ctx);
        let mut form = EntryForm::create(ctx);

        let err = form.update(action(Action::Commit)).err().unwrap();
        assert!(err.to_string().contains("Select a journal"));

        send(&mut form, picked(PickSlot::Journal, fixture.journal.id));
        let err = form.update(action(Action::Commit)).err().unwrap();
        assert!(err.to_string().contains("Row 1: select a ledger"));
    }

    #[test]
    fn test_select_opens_picker_with_current_value() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Entries);
        let fixture = seeded(&ctx);

        let mut form = EntryForm::create(ctx);
        let effect = form.init();
        drive(&mut form, effect);
        send(&mut form, picked(PickSlot::Ledger { row: 0 }, fixture.bank.id));
        form.focus_row(0, Column::Ledger);

        let msgs = send(&mut form, action(Action::Select));
        let [Msg::ShowPicker(request)] = msgs.as_slice() else {
            panic!("expected a picker request, got {:?}", msgs);
        };
        assert_eq!(request.slot, PickSlot::Ledger { row: 0 });
        assert_eq!(request.current, Some(RecordId::from(fixture.bank.id)));
        assert_eq!(request.items.len(), 2);
        assert!(!request.allow_none);

        form.focus_row(0, Column::Account);
        let msgs = send(&mut form, action(Action::Select));
        assert!(matches!(msgs.as_slice(), [Msg::ShowPicker(r)] if r.allow_none));
    }

    #[test]
    fn test_edit_replaces_rows() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Entries);
        let storage = ctx.storage.clone();
        let fixture = seeded(&ctx);

        let entry = Entry::new(fixture.journal.id, "Invoice");
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        EntryService::new(&storage)
            .create(
                entry.clone(),
                vec![
                    EntryRow::new(entry.id, fixture.bank.id, date, Money::from_cents(500)),
                    EntryRow::new(entry.id, fixture.revenue.id, date, Money::from_cents(-300)),
                    EntryRow::new(entry.id, fixture.revenue.id, date, Money::from_cents(-200)),
                ],
            )
            .unwrap();

        let mut form = EntryForm::edit(entry.id, ctx);
        let effect = form.init();
        drive(&mut form, effect);
        assert_eq!(form.row_count(), 3);

        // Drop the last row and let a new one absorb the difference
        form.focus_row(2, Column::Value);
        send(&mut form, action(Action::DeleteRow));
        send(&mut form, action(Action::AddRow));
        send(&mut form, picked(PickSlot::Ledger { row: 2 }, fixture.revenue.id));
        send(&mut form, action(Action::Commit));

        let rows = storage.rows_for_entry(entry.id).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.iter().map(|r| r.value.cents()).sum::<i64>(), 0);
        assert_eq!(storage.entry_rows.count().unwrap(), 3);
    }

    fn stored_entry(storage: &Storage, fixture: &Fixture, date: NaiveDate, cents: i64) -> Entry {
        let entry = Entry::new(fixture.journal.id, "Stored");
        EntryService::new(storage)
            .create(
                entry.clone(),
                vec![
                    EntryRow::new(entry.id, fixture.bank.id, date, Money::from_cents(cents)),
                    EntryRow::new(entry.id, fixture.revenue.id, date, Money::from_cents(-cents)),
                ],
            )
            .unwrap();
        entry
    }

    #[test]
    fn test_unedited_rows_commit_stored_values() {
        let temp_dir = TempDir::new().unwrap();
        let mut ctx = context(&temp_dir, AppKind::Entries);
        ctx.settings = Arc::new(Settings {
            date_format: "%d %b".into(),
            ..Settings::default()
        });
        let storage = ctx.storage.clone();
        let fixture = seeded(&ctx);

        let date = NaiveDate::from_ymd_opt(2019, 3, 7).unwrap();
        let entry = stored_entry(&storage, &fixture, date, 987_654_321);
        let before = storage.rows_for_entry(entry.id).unwrap();

        let mut form = EntryForm::edit(entry.id, ctx);
        let effect = form.init();
        drive(&mut form, effect);
        let msgs = send(&mut form, action(Action::Commit));
        assert!(!msgs
            .iter()
            .any(|m| matches!(m, Msg::Notify(n) if n.level == NotificationLevel::Error)));

        let after = storage.rows_for_entry(entry.id).unwrap();
        assert_eq!(after.len(), 2);
        for row in &before {
            let stored = after.iter().find(|r| r.id == row.id).unwrap();
            assert_eq!(stored.value, row.value);
            assert_eq!(stored.date, date);
        }
    }

    #[test]
    fn test_typed_value_replaces_stored_amount() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Entries);
        let storage = ctx.storage.clone();
        let fixture = seeded(&ctx);

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let entry = stored_entry(&storage, &fixture, date, 500);

        let mut form = EntryForm::edit(entry.id, ctx);
        let effect = form.init();
        drive(&mut form, effect);

        form.focus_row(0, Column::Value);
        let mut keys = vec![KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE); 4];
        keys.extend("45".chars().map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)));
        send(&mut form, ViewEvent::Text(keys));
        assert_eq!(form.rows[0].amount, None);
        assert_eq!(form.running_total(), Money::from_cents(4000));

        // Moving the cursor alone keeps the held amount
        form.focus_row(1, Column::Value);
        send(
            &mut form,
            ViewEvent::Text(vec![KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)]),
        );
        assert_eq!(form.rows[1].amount, Some(Money::from_cents(-500)));
    }

    #[test]
    fn test_delete_row_needs_a_row_focus() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Entries);
        let mut form = EntryForm::create(ctx);

        let err = form.update(action(Action::DeleteRow)).err().unwrap();
        assert!(matches!(err, LedgerError::NoSelection));
    }
}
