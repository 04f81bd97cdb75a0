//! Key tokens
//!
//! A token is the textual name of one keystroke: `"g"`, `"G"`, `"ctrl+n"`,
//! `"enter"`, `"shift+tab"`. Binding tables are written in this notation,
//! with the tokens of a sequence separated by spaces.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// One keystroke, by name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token(String);

impl Token {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name a key press; releases and unnamed keys yield `None`
    pub fn from_key_event(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        let base = match key.code {
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(c) if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                c.to_lowercase().to_string()
            }
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "enter".into(),
            KeyCode::Esc => "esc".into(),
            KeyCode::Tab => "tab".into(),
            KeyCode::BackTab => return Some(Self::new("shift+tab")),
            KeyCode::Backspace => "backspace".into(),
            KeyCode::Delete => "delete".into(),
            KeyCode::Up => "up".into(),
            KeyCode::Down => "down".into(),
            KeyCode::Left => "left".into(),
            KeyCode::Right => "right".into(),
            KeyCode::Home => "home".into(),
            KeyCode::End => "end".into(),
            KeyCode::PageUp => "pageup".into(),
            KeyCode::PageDown => "pagedown".into(),
            KeyCode::F(n) => format!("f{}", n),
            _ => return None,
        };

        let mut name = String::new();
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            name.push_str("ctrl+");
        }
        if key.modifiers.contains(KeyModifiers::ALT) {
            name.push_str("alt+");
        }
        // Shift is already in the character itself
        if key.modifiers.contains(KeyModifiers::SHIFT) && !matches!(key.code, KeyCode::Char(_)) {
            name.push_str("shift+");
        }
        name.push_str(&base);

        Some(Self(name))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a binding like `"g g"` into its tokens
pub fn parse_sequence(sequence: &str) -> Vec<Token> {
    sequence.split_whitespace().map(Token::new).collect()
}

/// Render tokens back into binding notation
pub fn format_sequence(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
