//! Terminal User Interface module
//!
//! A modal, vim-style interface built on ratatui. Keys are resolved into
//! actions by the [`input`] module, the [`router`] dispatches every message
//! to the right application, view or modal, and deferred work runs as
//! [`effect`]s off the update path.

pub mod app;
pub mod effect;
pub mod event;
pub mod input;
pub mod keys;
pub mod load;
pub mod message;
pub mod router;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

// Commands and keybindings
pub mod commands;
pub mod keybindings;

pub use router::MessageRouter;
pub use terminal::run_tui;
