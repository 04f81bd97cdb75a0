//! Command-line commands
//!
//! Everything that can be typed after `:`. Names are resolved exactly,
//! through a character trie built from [`COMMANDS`].

use super::keys::KeySequenceTrie;

/// A command that can be executed
#[derive(Debug, Clone)]
pub struct Command {
    /// Command name (what user types)
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// Command action
    pub action: CommandAction,
}

/// Actions that commands can perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAction {
    Write,
    Quit,
    WriteQuit,
    Reconcile,
    Help,
    Refresh,
    Ledgers,
    Accounts,
    Journals,
    Entries,
    New,
    Edit,
    Delete,
    List,
}

impl CommandAction {
    /// Canonical name of the command
    pub fn name(self) -> &'static str {
        COMMANDS
            .iter()
            .find(|cmd| cmd.action == self)
            .map(|cmd| cmd.name)
            .unwrap_or("?")
    }
}

/// All available commands, short aliases after their long form
pub static COMMANDS: &[Command] = &[
    Command {
        name: "write",
        description: "Save the current view",
        action: CommandAction::Write,
    },
    Command {
        name: "w",
        description: "Save the current view",
        action: CommandAction::Write,
    },
    Command {
        name: "quit",
        description: "Quit application",
        action: CommandAction::Quit,
    },
    Command {
        name: "q",
        description: "Quit application",
        action: CommandAction::Quit,
    },
    Command {
        name: "wq",
        description: "Save, then quit",
        action: CommandAction::WriteQuit,
    },
    Command {
        name: "reconcile",
        description: "Commit staged reconciliation",
        action: CommandAction::Reconcile,
    },
    Command {
        name: "help",
        description: "Show help",
        action: CommandAction::Help,
    },
    Command {
        name: "refresh",
        description: "Reload the current view from storage",
        action: CommandAction::Refresh,
    },
    Command {
        name: "ledgers",
        description: "Go to ledgers",
        action: CommandAction::Ledgers,
    },
    Command {
        name: "accounts",
        description: "Go to accounts",
        action: CommandAction::Accounts,
    },
    Command {
        name: "journals",
        description: "Go to journals",
        action: CommandAction::Journals,
    },
    Command {
        name: "entries",
        description: "Go to entries",
        action: CommandAction::Entries,
    },
    Command {
        name: "new",
        description: "Create a record",
        action: CommandAction::New,
    },
    Command {
        name: "edit",
        description: "Edit the selected record",
        action: CommandAction::Edit,
    },
    Command {
        name: "delete",
        description: "Delete the selected record",
        action: CommandAction::Delete,
    },
    Command {
        name: "list",
        description: "Back to the list",
        action: CommandAction::List,
    },
];

/// Build the trie the command line is resolved against
pub fn command_trie() -> KeySequenceTrie<char, CommandAction> {
    let mut trie = KeySequenceTrie::new();
    for cmd in COMMANDS {
        let path: Vec<char> = cmd.name.chars().collect();
        trie.insert(&path, cmd.action);
    }
    trie
}
