//! Single-line text field
//!
//! The cursor is a character index, so multi-byte input edits cleanly.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// A text field with a label and cursor
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    content: String,
    cursor: usize,
    /// Whether the field has focus
    pub focused: bool,
    /// Shown when empty and unfocused
    pub placeholder: String,
    pub label: String,
}

impl TextInput {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the placeholder
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set content, cursor at the end
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.set_value(content);
        self
    }

    pub fn set_value(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.content.chars().count();
    }

    /// Get the current content
    pub fn value(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_offset(&self, index: usize) -> usize {
        self.content
            .char_indices()
            .nth(index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    /// Insert a character at the cursor
    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete character at cursor
    pub fn delete(&mut self) {
        if self.cursor < self.content.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.content.chars().count());
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.chars().count();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Apply an editing key; returns whether the key was used
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_start(),
            KeyCode::End => self.move_end(),
            _ => return false,
        }
        true
    }
}

impl Widget for &TextInput {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label_width = if self.label.is_empty() {
            0
        } else {
            self.label.chars().count() as u16 + 2
        };

        if label_width > 0 {
            let label_line = Line::from(vec![
                Span::styled(self.label.as_str(), Style::default().fg(Color::Cyan)),
                Span::raw(": "),
            ]);
            buf.set_line(area.x, area.y, &label_line, label_width.min(area.width));
        }

        let input_start = area.x + label_width.min(area.width);
        let input_width = area.width.saturating_sub(label_width);

        let (text, style) = if self.content.is_empty() && !self.focused {
            (self.placeholder.as_str(), Style::default().fg(Color::DarkGray))
        } else if self.focused {
            (self.content.as_str(), Style::default().fg(Color::White))
        } else {
            (self.content.as_str(), Style::default().fg(Color::Yellow))
        };
        buf.set_stringn(input_start, area.y, text, input_width as usize, style);

        if self.focused {
            let cursor_x = input_start + self.cursor as u16;
            if cursor_x < area.x + area.width {
                let cursor_char = self.content.chars().nth(self.cursor).unwrap_or(' ');
                buf.set_string(
                    cursor_x,
                    area.y,
                    cursor_char.to_string(),
                    Style::default().fg(Color::Black).bg(Color::Cyan),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editing() {
        let mut input = TextInput::new("Name").content("Bnk");
        input.move_left();
        input.move_left();
        input.insert('a');
        assert_eq!(input.value(), "Bank");

        input.move_end();
        input.backspace();
        assert_eq!(input.value(), "Ban");
        input.move_start();
        input.delete();
        assert_eq!(input.value(), "an");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut input = TextInput::new("Notes");
        for c in "€é".chars() {
            input.insert(c);
        }
        input.backspace();
        assert_eq!(input.value(), "€");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn test_handle_key() {
        let mut input = TextInput::new("");
        assert!(input.handle_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(!input.handle_key(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(!input.handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert_eq!(input.value(), "x");
    }

    #[test]
    fn test_render() {
        let input = TextInput::new("Name").content("Bank");
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        (&input).render(area, &mut buf);

        let rendered: String = buf.content.iter().map(|cell| cell.symbol()).collect();
        assert!(rendered.starts_with("Name: Bank"));
    }
}
