//! Create and update form for ledgers, accounts and journals

use ratatui::{
    layout::{Constraint, Direction as LayoutDirection, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Journal, Kind, Ledger, ModelKind, RecordId, Reference};
use crate::services::{InUse, ReferenceService};
use crate::storage::{HasTable, Storage};
use crate::tui::effect::Effect;
use crate::tui::load;
use crate::tui::message::{Action, CommitOutcome, Cycle, Direction, LoadedData, Msg, ViewKind};
use crate::tui::widgets::{Notification, TextInput};

use super::{View, ViewContext, ViewEvent};

/// Pull a record of this type out of loaded data
pub trait FromLoaded: Sized {
    fn from_loaded(data: LoadedData) -> Option<Self>;
}

impl FromLoaded for Ledger {
    fn from_loaded(data: LoadedData) -> Option<Self> {
        match data {
            LoadedData::Ledger(ledger) => Some(ledger),
            _ => None,
        }
    }
}

impl FromLoaded for Account {
    fn from_loaded(data: LoadedData) -> Option<Self> {
        match data {
            LoadedData::Account(account) => Some(account),
            _ => None,
        }
    }
}

impl FromLoaded for Journal {
    fn from_loaded(data: LoadedData) -> Option<Self> {
        match data {
            LoadedData::Journal(journal) => Some(journal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Kind,
    Notes,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::Kind,
            Self::Kind => Self::Notes,
            Self::Notes => Self::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Name => Self::Notes,
            Self::Kind => Self::Name,
            Self::Notes => Self::Kind,
        }
    }
}

pub struct ReferenceForm<R: Reference> {
    view: ViewKind,
    /// Set when editing
    record_id: Option<RecordId>,
    original: Option<R>,
    accepts: [ModelKind; 1],
    ctx: ViewContext,
    name: TextInput,
    kind: R::Kind,
    notes: TextInput,
    focus: Field,
}

impl<R> ReferenceForm<R>
where
    R: Reference + InUse + FromLoaded,
    Storage: HasTable<R>,
{
    fn new(view: ViewKind, record_id: Option<RecordId>, ctx: ViewContext) -> Self {
        let mut name = TextInput::new("Name").placeholder(format!("{} name", R::MODEL));
        name.focused = true;
        Self {
            view,
            record_id,
            original: None,
            accepts: [R::MODEL],
            ctx,
            name,
            kind: R::Kind::all()[0],
            notes: TextInput::new("Notes").placeholder("optional"),
            focus: Field::Name,
        }
    }

    /// An empty form for a new record
    pub fn create(ctx: ViewContext) -> Self {
        Self::new(ViewKind::Create, None, ctx)
    }

    /// A form over an existing record, filled once it has loaded
    pub fn edit(id: impl Into<RecordId>, ctx: ViewContext) -> Self {
        Self::new(ViewKind::Update, Some(id.into()), ctx)
    }

    pub fn name(&self) -> &str {
        self.name.value()
    }

    pub fn kind_value(&self) -> R::Kind {
        self.kind
    }

    fn set_focus(&mut self, field: Field) {
        self.focus = field;
        self.name.focused = field == Field::Name;
        self.notes.focused = field == Field::Notes;
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focus {
            Field::Name => Some(&mut self.name),
            Field::Notes => Some(&mut self.notes),
            Field::Kind => None,
        }
    }

    fn commit(&self) -> LedgerResult<Effect> {
        let name = self.name.value().to_string();
        let notes = self.notes.value().to_string();
        let kind = self.kind;
        let storage = self.ctx.storage.clone();
        let target = self.ctx.target;

        let edited = match (self.view, &self.original) {
            (ViewKind::Update, None) => {
                return Err(LedgerError::Validation(format!("{} is still loading", R::MODEL)))
            }
            (_, original) => original.clone(),
        };

        Ok(Effect::run(move || {
            let service = ReferenceService::<R>::new(&storage);
            let result = match edited {
                Some(mut record) => {
                    record.set_fields(name, kind, notes);
                    service
                        .update(record)
                        .map(|r| CommitOutcome::Updated(r.record_id()))
                }
                None => service
                    .create(&name, kind, &notes)
                    .map(|r| CommitOutcome::Created(r.record_id())),
            };
            Msg::Committed {
                target,
                model: R::MODEL,
                result,
            }
        }))
    }

    fn field_line<'a>(&self, field: Field, label: &'a str, value: String) -> Line<'a> {
        let style = if self.focus == field {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::Cyan)),
            Span::styled(value, style),
        ])
    }
}

impl<R> View for ReferenceForm<R>
where
    R: Reference + InUse + FromLoaded,
    Storage: HasTable<R>,
{
    fn kind(&self) -> ViewKind {
        self.view
    }

    fn accepts(&self) -> &[ModelKind] {
        &self.accepts
    }

    fn init(&mut self) -> Effect {
        let Some(record) = self.record_id else {
            return Effect::none();
        };
        let storage = self.ctx.storage.clone();
        let target = self.ctx.target;
        Effect::run(move || Msg::loaded(target, load::record(&storage, record)))
    }

    fn update(&mut self, event: ViewEvent) -> LedgerResult<Effect> {
        match event {
            ViewEvent::Loaded(data) => {
                if let Some(record) = R::from_loaded(data) {
                    self.name.set_value(record.name());
                    self.notes.set_value(record.notes());
                    self.kind = record.kind();
                    self.original = Some(record);
                }
            }
            ViewEvent::LoadFailed(error) => return Err(error),
            ViewEvent::Text(keys) => {
                if let Some(input) = self.focused_input() {
                    for key in &keys {
                        input.handle_key(key);
                    }
                }
            }
            ViewEvent::Action(action) => match action {
                Action::SwitchFocus(Cycle::Next) | Action::Navigate(Direction::Down) => {
                    self.set_focus(self.focus.next())
                }
                Action::SwitchFocus(Cycle::Prev) | Action::Navigate(Direction::Up) => {
                    self.set_focus(self.focus.prev())
                }
                Action::Navigate(Direction::Right) if self.focus == Field::Kind => {
                    self.kind = self.kind.next();
                }
                Action::Navigate(Direction::Left) if self.focus == Field::Kind => {
                    self.kind = self.kind.prev();
                }
                Action::Navigate(Direction::Right) => {
                    if let Some(input) = self.focused_input() {
                        input.move_right();
                    }
                }
                Action::Navigate(Direction::Left) => {
                    if let Some(input) = self.focused_input() {
                        input.move_left();
                    }
                }
                Action::JumpHorizontal { to_end } => {
                    if let Some(input) = self.focused_input() {
                        if to_end {
                            input.move_end();
                        } else {
                            input.move_start();
                        }
                    }
                }
                Action::Commit => return self.commit(),
                _ => {}
            },
            ViewEvent::Committed(Ok(CommitOutcome::Created(id) | CommitOutcome::Updated(id))) => {
                let verb = if self.view == ViewKind::Create { "created" } else { "saved" };
                return Ok(Effect::batch([
                    self.ctx
                        .notify(Notification::success(format!("{} {}", R::MODEL, verb))),
                    self.ctx.navigate(ViewKind::Detail, Some(id)),
                ]));
            }
            ViewEvent::Committed(Err(error)) => return Err(error),
            _ => {}
        }
        Ok(Effect::none())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = match self.view {
            ViewKind::Create => format!(" New {} ", R::MODEL),
            _ => format!(" Edit {} ", R::MODEL),
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        frame.render_widget(&self.name, chunks[0]);
        let kind = self.field_line(Field::Kind, "Type", format!("< {} >", self.kind));
        frame.render_widget(Paragraph::new(kind), chunks[2]);
        frame.render_widget(&self.notes, chunks[4]);

        let hints = Line::from(Span::styled(
            "tab: next field  h/l: change type  i: type text  ctrl+s: save",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(Paragraph::new(hints), chunks[6]);
    }

    fn selected(&self) -> Option<RecordId> {
        self.record_id
    }

    fn record(&self) -> Option<RecordId> {
        self.record_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JournalType, LedgerType};
    use crate::tui::message::AppKind;
    use crate::tui::views::fixtures::{context, drive, send};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    fn typed(text: &str) -> ViewEvent {
        ViewEvent::Text(
            text.chars()
                .map(|c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .collect(),
        )
    }

    #[test]
    fn test_create_ledger() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Ledgers);
        let storage = ctx.storage.clone();
        let mut form = ReferenceForm::<Ledger>::create(ctx);
        assert!(form.init().is_none());

        send(&mut form, typed("Petty cash"));
        send(&mut form, ViewEvent::Action(Action::SwitchFocus(Cycle::Next)));
        send(&mut form, ViewEvent::Action(Action::Navigate(Direction::Right)));
        send(&mut form, ViewEvent::Action(Action::Navigate(Direction::Right)));
        assert_eq!(form.kind_value(), LedgerType::Asset);

        let msgs = send(&mut form, ViewEvent::Action(Action::Commit));
        let ledgers = storage.ledgers.select_all().unwrap();
        assert_eq!(ledgers.len(), 1);
        assert_eq!(ledgers[0].name, "Petty cash");
        assert_eq!(ledgers[0].kind, LedgerType::Asset);

        assert!(msgs.iter().any(|m| matches!(
            m,
            Msg::Navigate { kind: ViewKind::Detail, record: Some(RecordId::Ledger(_)), .. }
        )));
    }

    #[test]
    fn test_edit_loads_and_updates() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Journals);
        let storage = ctx.storage.clone();
        let journal = Journal::new("Sales", JournalType::Income);
        storage.journals.insert(journal.clone()).unwrap();

        let mut form = ReferenceForm::<Journal>::edit(journal.id, ctx);
        let effect = form.init();
        drive(&mut form, effect);
        assert_eq!(form.name(), "Sales");

        send(&mut form, typed(" 2024"));
        send(&mut form, ViewEvent::Action(Action::Commit));

        let stored = storage.journals.select_required(journal.id).unwrap();
        assert_eq!(stored.name, "Sales 2024");
        assert_eq!(stored.kind, JournalType::Income);
    }

    #[test]
    fn test_empty_name_is_a_notification() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Accounts);
        let mut form = ReferenceForm::<Account>::create(ctx);

        let msgs = send(&mut form, ViewEvent::Action(Action::Commit));
        assert!(matches!(msgs.as_slice(), [Msg::Notify(n)] if n.message.contains("cannot be empty")));
    }

    #[test]
    fn test_kind_field_ignores_text() {
        let temp_dir = TempDir::new().unwrap();
        let ctx = context(&temp_dir, AppKind::Accounts);
        let mut form = ReferenceForm::<Account>::create(ctx);

        send(&mut form, ViewEvent::Action(Action::SwitchFocus(Cycle::Next)));
        send(&mut form, typed("xyz"));
        assert_eq!(form.name(), "");
    }
}
