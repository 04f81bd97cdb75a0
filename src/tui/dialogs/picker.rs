//! Item picker dialog
//!
//! Chooses one record for a reference field of a form. The current value
//! is preselected by id, and optional fields get an explicit "(none)" item.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem as ListRow, ListState},
    Frame,
};

use crate::models::RecordId;
use crate::tui::effect::Effect;
use crate::tui::input::Mode;
use crate::tui::keybindings::BindingSet;
use crate::tui::layout::centered_rect;
use crate::tui::message::{Action, Direction, ListItem, Msg, PickSlot, PickerRequest, ViewTarget};
use crate::tui::views::step;

use super::{dismiss_bindings, ModalOutcome};

const NONE_LABEL: &str = "(none)";

pub struct PickerDialog {
    target: ViewTarget,
    slot: PickSlot,
    title: String,
    /// `None` stands for the explicit empty choice
    options: Vec<Option<ListItem>>,
    selected: usize,
    bindings: BindingSet,
}

impl PickerDialog {
    pub fn new(request: PickerRequest) -> Self {
        let mut options: Vec<Option<ListItem>> = Vec::with_capacity(request.items.len() + 1);
        if request.allow_none {
            options.push(None);
        }
        options.extend(request.items.into_iter().map(Some));

        let selected = options
            .iter()
            .position(|option| option.as_ref().map(|item| item.id) == request.current)
            .unwrap_or(0);

        Self {
            target: request.target,
            slot: request.slot,
            title: request.title,
            options,
            selected,
            bindings: dismiss_bindings()
                .with(Mode::Normal, "enter", Action::Select)
                .with(Mode::Normal, "home", Action::JumpVertical { to_end: false })
                .with(Mode::Normal, "end", Action::JumpVertical { to_end: true }),
        }
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    /// The highlighted choice
    pub fn choice(&self) -> Option<RecordId> {
        self.options
            .get(self.selected)
            .and_then(|option| option.as_ref())
            .map(|item| item.id)
    }

    pub fn handle_action(&mut self, action: Action) -> ModalOutcome {
        let len = self.options.len();
        match action {
            Action::Navigate(Direction::Down) => self.selected = step(self.selected, len, true),
            Action::Navigate(Direction::Up) => self.selected = step(self.selected, len, false),
            Action::JumpVertical { to_end: false } => self.selected = 0,
            Action::JumpVertical { to_end: true } => self.selected = len.saturating_sub(1),
            Action::Dismiss => return ModalOutcome::Close(Effect::none()),
            Action::Select if len == 0 => return ModalOutcome::Close(Effect::none()),
            Action::Select => {
                return ModalOutcome::Close(Effect::message(Msg::Picked {
                    target: self.target,
                    slot: self.slot,
                    choice: self.choice(),
                }))
            }
            _ => {}
        }
        ModalOutcome::Stay
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = centered_rect(50, 60, area);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .title_bottom(Line::from(Span::styled(
                " enter: pick  esc: cancel ",
                Style::default().fg(Color::DarkGray),
            )))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let rows: Vec<ListRow> = self
            .options
            .iter()
            .map(|option| match option {
                Some(item) => ListRow::new(Line::from(vec![
                    Span::styled(format!("{:<24}", item.label), Style::default().fg(Color::White)),
                    Span::styled(item.detail.clone(), Style::default().fg(Color::Yellow)),
                ])),
                None => ListRow::new(Span::styled(NONE_LABEL, Style::default().fg(Color::DarkGray))),
            })
            .collect();

        let list = List::new(rows)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        let mut state = ListState::default();
        if !self.options.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, LedgerId};
    use crate::tui::input::{InputResolver, Resolved};
    use crate::tui::keybindings::{default_global, CompleteBindingSet};
    use crate::tui::message::AppKind;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(c: char) -> KeyEvent {
        let modifiers = if c.is_ascii_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::NONE
        };
        KeyEvent::new(KeyCode::Char(c), modifiers)
    }

    fn item(id: RecordId, label: &str) -> ListItem {
        ListItem {
            id,
            label: label.to_string(),
            detail: String::new(),
        }
    }

    fn request(items: Vec<ListItem>, current: Option<RecordId>, allow_none: bool) -> PickerRequest {
        PickerRequest {
            target: ViewTarget {
                app: AppKind::Entries,
                generation: 4,
            },
            slot: PickSlot::Account { row: 1 },
            title: "Select Account".to_string(),
            items,
            current,
            allow_none,
        }
    }

    #[test]
    fn test_current_value_is_preselected() {
        let a = RecordId::from(AccountId::new());
        let b = RecordId::from(AccountId::new());
        let picker = PickerDialog::new(request(vec![item(a, "A"), item(b, "B")], Some(b), true));
        assert_eq!(picker.choice(), Some(b));

        let picker = PickerDialog::new(request(vec![item(a, "A"), item(b, "B")], None, true));
        assert_eq!(picker.choice(), None);
    }

    #[test]
    fn test_enter_posts_the_choice() {
        let a = RecordId::from(LedgerId::new());
        let mut picker = PickerDialog::new(request(vec![item(a, "Bank")], None, true));

        assert!(matches!(
            picker.handle_action(Action::Navigate(Direction::Down)),
            ModalOutcome::Stay
        ));
        let ModalOutcome::Close(effect) = picker.handle_action(Action::Select) else {
            panic!("enter should close the picker");
        };
        let msgs = effect.run_inline();
        assert!(matches!(
            msgs.as_slice(),
            [Msg::Picked { slot: PickSlot::Account { row: 1 }, choice: Some(id), target }]
                if *id == a && target.generation == 4
        ));
    }

    #[test]
    fn test_escape_cancels_without_a_message() {
        let mut picker = PickerDialog::new(request(Vec::new(), None, false));
        let ModalOutcome::Close(effect) = picker.handle_action(Action::Dismiss) else {
            panic!("dismiss should close the picker");
        };
        assert!(effect.is_none());
    }

    #[test]
    fn test_keys_resolve_through_layered_bindings() {
        let items: Vec<ListItem> = (0..3)
            .map(|i| item(RecordId::from(LedgerId::new()), &format!("L{i}")))
            .collect();
        let last = items[2].id;
        let first = items[0].id;
        let mut picker = PickerDialog::new(request(items, Some(last), false));
        let global = default_global();
        let mut resolver = InputResolver::new();

        // A lone `g` is a prefix of `g g` and does nothing yet
        let set = CompleteBindingSet::new(&global).with_override(Some(picker.bindings()));
        assert_eq!(resolver.resolve(key('g'), &set), None);
        let resolved = resolver.resolve(key('g'), &set);
        assert_eq!(
            resolved,
            Some(Resolved::Action(Action::JumpVertical { to_end: false }))
        );
        if let Some(Resolved::Action(action)) = resolved {
            picker.handle_action(action);
        }
        assert_eq!(picker.choice(), Some(first));

        let set = CompleteBindingSet::new(&global).with_override(Some(picker.bindings()));
        assert_eq!(
            resolver.resolve(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &set),
            Some(Resolved::Action(Action::Dismiss))
        );
    }
}
