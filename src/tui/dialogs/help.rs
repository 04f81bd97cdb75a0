//! Help dialog
//!
//! Lists the bindings reachable in the current mode and the commands.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::commands::COMMANDS;
use crate::tui::effect::Effect;
use crate::tui::input::Mode;
use crate::tui::keybindings::{BindingSet, CompleteBindingSet};
use crate::tui::layout::centered_rect;
use crate::tui::message::{Action, Direction};

use super::{dismiss_bindings, ModalOutcome};

pub struct HelpDialog {
    mode: Mode,
    lines: Vec<(String, String)>,
    scroll: u16,
    bindings: BindingSet,
}

impl HelpDialog {
    /// Snapshot the bindings active for `mode`
    pub fn new(mode: Mode, bindings: &CompleteBindingSet<'_>) -> Self {
        Self {
            mode,
            lines: bindings.describe(mode),
            scroll: 0,
            bindings: dismiss_bindings()
                .with(Mode::Normal, "enter", Action::Dismiss)
                .with(Mode::Normal, "?", Action::Dismiss),
        }
    }

    /// The described bindings, as (keys, description)
    pub fn entries(&self) -> &[(String, String)] {
        &self.lines
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn handle_action(&mut self, action: Action) -> ModalOutcome {
        match action {
            Action::Navigate(Direction::Down) => self.scroll = self.scroll.saturating_add(1),
            Action::Navigate(Direction::Up) => self.scroll = self.scroll.saturating_sub(1),
            Action::JumpVertical { to_end: false } => self.scroll = 0,
            Action::Dismiss => return ModalOutcome::Close(Effect::none()),
            _ => {}
        }
        ModalOutcome::Stay
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let heading = |text: String| {
            Line::from(Span::styled(
                text,
                Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
            ))
        };

        let mut lines = vec![heading(format!("{} mode", self.mode)), Line::from("")];
        lines.extend(self.lines.iter().map(|(keys, action)| key_line(keys, action)));

        lines.push(Line::from(""));
        lines.push(heading("Commands".to_string()));
        lines.push(Line::from(""));
        lines.extend(
            COMMANDS
                .iter()
                .map(|cmd| key_line(&format!(":{}", cmd.name), cmd.description)),
        );
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = centered_rect(60, 70, area);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Help ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>12}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::raw(description.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::keybindings::{app_bindings, default_global, Lookup};
    use crate::tui::message::AppKind;

    #[test]
    fn test_lists_layered_bindings_once() {
        let global = default_global();
        let app = app_bindings(AppKind::Ledgers);
        let set = CompleteBindingSet::new(&global).with_override(Some(&app));

        let help = HelpDialog::new(Mode::Normal, &set);
        let keys: Vec<&str> = help.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"n"));
        assert!(keys.contains(&"g g"));
        assert_eq!(keys.iter().filter(|k| **k == "j").count(), 1);
    }

    #[test]
    fn test_scrolls_and_closes() {
        let global = default_global();
        let mut help = HelpDialog::new(Mode::Insert, &CompleteBindingSet::new(&global));

        help.handle_action(Action::Navigate(Direction::Down));
        help.handle_action(Action::Navigate(Direction::Down));
        assert_eq!(help.scroll(), 2);
        help.handle_action(Action::JumpVertical { to_end: false });
        assert_eq!(help.scroll(), 0);

        let outcome = help.handle_action(Action::Dismiss);
        assert!(matches!(outcome, ModalOutcome::Close(effect) if effect.is_none()));
    }

    #[test]
    fn test_question_mark_closes_over_global_help() {
        let global = default_global();
        let help = HelpDialog::new(Mode::Normal, &CompleteBindingSet::new(&global));
        let set = CompleteBindingSet::new(&global).with_override(Some(help.bindings()));

        let path = crate::tui::keys::parse_sequence("?");
        assert_eq!(set.lookup(Mode::Normal, &path), Lookup::Exact(&Action::Dismiss));
    }
}
