//! Status bar view
//!
//! Shows the input mode, pending keys or the command line, and the newest
//! notification.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::input::Mode;
use crate::tui::widgets::Notification;

/// What the status bar shows for one frame
pub struct StatusLine<'a> {
    pub mode: Mode,
    /// Keys typed so far for an unfinished sequence
    pub pending: &'a str,
    pub command_line: &'a str,
    pub notification: Option<&'a Notification>,
    pub hint: &'a str,
}

fn mode_style(mode: Mode) -> Style {
    let bg = match mode {
        Mode::Normal => Color::Blue,
        Mode::Insert => Color::Green,
        Mode::Command => Color::Magenta,
    };
    Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

/// Render the status bar
pub fn render(frame: &mut Frame, area: Rect, status: &StatusLine<'_>) {
    let mut spans = vec![Span::styled(
        format!(" {} ", status.mode.to_string().to_uppercase()),
        mode_style(status.mode),
    )];
    spans.push(Span::raw(" "));

    if status.mode == Mode::Command {
        spans.push(Span::styled(
            format!(":{}", status.command_line),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled("█", Style::default().fg(Color::White)));
    } else if !status.pending.is_empty() {
        spans.push(Span::styled(
            status.pending.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    } else if let Some(notification) = status.notification {
        spans.push(Span::styled(
            notification.message.clone(),
            Style::default().fg(notification.level.color()),
        ));
    } else {
        spans.push(Span::styled(
            status.hint.to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(status: &StatusLine<'_>) -> String {
        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), status))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_command_line_is_shown_in_command_mode() {
        let text = rendered(&StatusLine {
            mode: Mode::Command,
            pending: "",
            command_line: "wq",
            notification: None,
            hint: "",
        });
        assert!(text.contains("COMMAND"));
        assert!(text.contains(":wq"));
    }

    #[test]
    fn test_pending_keys_take_precedence_over_notifications() {
        let notification = Notification::info("Saved");
        let text = rendered(&StatusLine {
            mode: Mode::Normal,
            pending: "g",
            command_line: "",
            notification: Some(&notification),
            hint: "",
        });
        assert!(text.contains("NORMAL"));
        assert!(!text.contains("Saved"));

        let text = rendered(&StatusLine {
            mode: Mode::Normal,
            pending: "",
            command_line: "",
            notification: Some(&notification),
            hint: "",
        });
        assert!(text.contains("Saved"));
    }
}
