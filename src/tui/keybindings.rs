//! Keybinding definitions
//!
//! A [`BindingSet`] holds one key sequence trie per input mode. Bindings
//! are layered: the active view's set first, then the application's, then
//! the global defaults. [`CompleteBindingSet`] is that stack for one
//! keystroke.

use super::input::Mode;
use super::keys::{format_sequence, parse_sequence, KeySequenceTrie, Token};
use super::message::{Action, AppKind, Cycle, Direction, ViewKind};

/// Bindings for every mode
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    normal: KeySequenceTrie<Token, Action>,
    insert: KeySequenceTrie<Token, Action>,
    command: KeySequenceTrie<Token, Action>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The trie consulted in `mode`
    pub fn trie(&self, mode: Mode) -> &KeySequenceTrie<Token, Action> {
        match mode {
            Mode::Normal => &self.normal,
            Mode::Insert => &self.insert,
            Mode::Command => &self.command,
        }
    }

    fn trie_mut(&mut self, mode: Mode) -> &mut KeySequenceTrie<Token, Action> {
        match mode {
            Mode::Normal => &mut self.normal,
            Mode::Insert => &mut self.insert,
            Mode::Command => &mut self.command,
        }
    }

    /// Bind a space separated sequence like `"g g"` in `mode`
    pub fn bind(&mut self, mode: Mode, sequence: &str, action: Action) -> &mut Self {
        let tokens = parse_sequence(sequence);
        if !self.trie_mut(mode).insert(&tokens, action) {
            tracing::warn!(sequence, "ignoring empty key binding");
        }
        self
    }

    /// Builder form of [`BindingSet::bind`]
    pub fn with(mut self, mode: Mode, sequence: &str, action: Action) -> Self {
        self.bind(mode, sequence, action);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.normal.is_empty() && self.insert.is_empty() && self.command.is_empty()
    }
}

/// Result of looking a buffered sequence up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// The sequence is bound
    Exact(&'a Action),
    /// The sequence can still grow into a binding
    Prefix,
    /// Nothing matches
    None,
}

/// Layers of bindings for one keystroke, highest priority first
pub struct CompleteBindingSet<'a> {
    layers: Vec<&'a BindingSet>,
}

impl<'a> CompleteBindingSet<'a> {
    pub fn new(global: &'a BindingSet) -> Self {
        Self {
            layers: vec![global],
        }
    }

    /// Put an override layer in front of the existing ones
    pub fn with_override(mut self, layer: Option<&'a BindingSet>) -> Self {
        if let Some(layer) = layer {
            self.layers.insert(0, layer);
        }
        self
    }

    /// Look `path` up layer by layer
    ///
    /// The first layer that knows the sequence decides, either with an
    /// exact match or as a prefix. Within a layer an exact match wins over
    /// a longer binding that shares the prefix.
    pub fn lookup(&self, mode: Mode, path: &[Token]) -> Lookup<'a> {
        for layer in self.layers.iter() {
            let trie = layer.trie(mode);
            if let Some(action) = trie.get(path) {
                return Lookup::Exact(action);
            }
            if trie.contains_path(path) {
                return Lookup::Prefix;
            }
        }
        Lookup::None
    }

    /// Every reachable binding in `mode`, shadowed ones removed
    pub fn describe(&self, mode: Mode) -> Vec<(String, String)> {
        let mut seen: Vec<String> = Vec::new();
        let mut lines = Vec::new();
        for layer in self.layers.iter() {
            for (path, action) in layer.trie(mode).entries() {
                let keys = format_sequence(&path);
                if seen.contains(&keys) {
                    continue;
                }
                seen.push(keys.clone());
                lines.push((keys, action.describe()));
            }
        }
        lines
    }
}

/// Bindings available everywhere
pub fn default_global() -> BindingSet {
    use Mode::{Command, Insert, Normal};

    let mut set = BindingSet::new();
    set.bind(Normal, "i", Action::SwitchMode(Insert))
        .bind(Normal, ":", Action::SwitchMode(Command))
        .bind(Normal, "esc", Action::SwitchMode(Normal))
        .bind(Normal, "ctrl+c", Action::SwitchMode(Normal))
        // Motions
        .bind(Normal, "h", Action::Navigate(Direction::Left))
        .bind(Normal, "j", Action::Navigate(Direction::Down))
        .bind(Normal, "k", Action::Navigate(Direction::Up))
        .bind(Normal, "l", Action::Navigate(Direction::Right))
        .bind(Normal, "left", Action::Navigate(Direction::Left))
        .bind(Normal, "down", Action::Navigate(Direction::Down))
        .bind(Normal, "up", Action::Navigate(Direction::Up))
        .bind(Normal, "right", Action::Navigate(Direction::Right))
        .bind(Normal, "g g", Action::JumpVertical { to_end: false })
        .bind(Normal, "G", Action::JumpVertical { to_end: true })
        .bind(Normal, "0", Action::JumpHorizontal { to_end: false })
        .bind(Normal, "$", Action::JumpHorizontal { to_end: true })
        .bind(Normal, "tab", Action::SwitchFocus(Cycle::Next))
        .bind(Normal, "shift+tab", Action::SwitchFocus(Cycle::Prev))
        // Tabs and views
        .bind(Normal, "g t", Action::SwitchTab(Cycle::Next))
        .bind(Normal, "g T", Action::SwitchTab(Cycle::Prev))
        .bind(Normal, "g l", Action::switch_view(ViewKind::List))
        .bind(Normal, "g d", Action::switch_view(ViewKind::Detail))
        .bind(Normal, "g c", Action::switch_view(ViewKind::Create))
        .bind(Normal, "g u", Action::switch_view(ViewKind::Update))
        .bind(Normal, "g x", Action::switch_view(ViewKind::Delete))
        .bind(Normal, "enter", Action::Select)
        .bind(Normal, "ctrl+s", Action::Commit)
        .bind(Normal, "?", Action::Help)
        // Leader
        .bind(Normal, "space l", Action::SwitchApp(AppKind::Ledgers))
        .bind(Normal, "space a", Action::SwitchApp(AppKind::Accounts))
        .bind(Normal, "space j", Action::SwitchApp(AppKind::Journals))
        .bind(Normal, "space e", Action::SwitchApp(AppKind::Entries))
        // Insert
        .bind(Insert, "esc", Action::SwitchMode(Normal))
        .bind(Insert, "ctrl+c", Action::SwitchMode(Normal))
        .bind(Insert, "tab", Action::SwitchFocus(Cycle::Next))
        .bind(Insert, "shift+tab", Action::SwitchFocus(Cycle::Prev))
        .bind(Insert, "ctrl+s", Action::Commit)
        // Command
        .bind(Command, "esc", Action::SwitchMode(Normal))
        .bind(Command, "ctrl+c", Action::SwitchMode(Normal));
    set
}

/// Bindings every application adds on top of the globals
pub fn app_bindings(_app: AppKind) -> BindingSet {
    BindingSet::new()
        .with(Mode::Normal, "n", Action::switch_view(ViewKind::Create))
        .with(Mode::Normal, "e", Action::switch_view(ViewKind::Update))
        .with(Mode::Normal, "backspace", Action::switch_view(ViewKind::List))
}
