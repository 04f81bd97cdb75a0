//! Modal input resolution
//!
//! Turns raw key events into at most one [`Resolved`] per completed key
//! sequence. Keystrokes are buffered while they form a valid prefix of a
//! binding; a sequence that matches nothing is discarded without effect.

use std::fmt;
use std::mem;

use crossterm::event::{KeyCode, KeyEvent};

use super::commands::{command_trie, CommandAction};
use super::keybindings::{CompleteBindingSet, Lookup};
use super::keys::{format_sequence, KeySequenceTrie, Token};
use super::message::Action;

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Insert,
    Command,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Insert => write!(f, "Insert"),
            Self::Command => write!(f, "Command"),
        }
    }
}

/// Outcome of a completed key sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A bound action
    Action(Action),
    /// Literal keys for the focused field (insert mode)
    Text(Vec<KeyEvent>),
    /// The command line named no known command
    UnknownCommand(String),
}

/// Per-session key resolver
pub struct InputResolver {
    mode: Mode,
    pending: Vec<Token>,
    pending_keys: Vec<KeyEvent>,
    command_line: String,
    commands: KeySequenceTrie<char, CommandAction>,
}

impl InputResolver {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            pending: Vec::new(),
            pending_keys: Vec::new(),
            command_line: String::new(),
            commands: command_trie(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Buffered keys, in binding notation
    pub fn pending(&self) -> String {
        format_sequence(&self.pending)
    }

    pub fn command_line(&self) -> &str {
        &self.command_line
    }

    /// Enter `mode`, dropping any partial sequence and command text
    pub fn set_mode(&mut self, mode: Mode) {
        if mode != self.mode {
            tracing::debug!(from = %self.mode, to = %mode, "mode switch");
        }
        self.mode = mode;
        self.clear_pending();
        self.command_line.clear();
    }

    /// Back to normal mode with nothing buffered
    pub fn reset(&mut self) {
        self.set_mode(Mode::Normal);
    }

    fn clear_pending(&mut self) {
        self.pending.clear();
        self.pending_keys.clear();
    }

    /// Feed one key event
    pub fn resolve(&mut self, key: KeyEvent, bindings: &CompleteBindingSet<'_>) -> Option<Resolved> {
        let token = Token::from_key_event(&key)?;
        self.pending.push(token);
        self.pending_keys.push(key);

        match bindings.lookup(self.mode, &self.pending) {
            Lookup::Exact(action) => {
                let action = action.clone();
                self.clear_pending();
                if let Action::SwitchMode(mode) = action {
                    self.set_mode(mode);
                }
                Some(Resolved::Action(action))
            }
            Lookup::Prefix => None,
            Lookup::None => {
                let keys = mem::take(&mut self.pending_keys);
                let tokens = mem::take(&mut self.pending);
                let mode = self.mode;
                match mode {
                    Mode::Normal => {
                        tracing::trace!(keys = %format_sequence(&tokens), "discarding unbound sequence");
                        None
                    }
                    Mode::Insert => Some(Resolved::Text(keys)),
                    Mode::Command => keys.into_iter().filter_map(|k| self.edit_command(k)).last(),
                }
            }
        }
    }

    /// Apply one key to the command line
    fn edit_command(&mut self, key: KeyEvent) -> Option<Resolved> {
        match key.code {
            KeyCode::Enter => {
                let name = mem::take(&mut self.command_line);
                self.set_mode(Mode::Normal);
                self.submit(name.trim())
            }
            KeyCode::Backspace => {
                if self.command_line.pop().is_none() {
                    self.set_mode(Mode::Normal);
                }
                None
            }
            KeyCode::Char(c) => {
                self.command_line.push(c);
                None
            }
            _ => None,
        }
    }

    fn submit(&self, name: &str) -> Option<Resolved> {
        if name.is_empty() {
            return None;
        }
        let path: Vec<char> = name.chars().collect();
        match self.commands.get(&path) {
            Some(command) => Some(Resolved::Action(Action::ExecuteCommand(*command))),
            None => Some(Resolved::UnknownCommand(name.to_string())),
        }
    }
}

impl Default for InputResolver {
    fn default() -> Self {
        Self::new()
    }
}
