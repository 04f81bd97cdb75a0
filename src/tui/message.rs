//! Messages flowing through the event loop
//!
//! Everything the router reacts to is a [`Msg`]: terminal input, ticks,
//! resolved actions and the results of deferred effects. Results of effects
//! are addressed to one view instance through a [`ViewTarget`].

use std::fmt;

use crossterm::event::KeyEvent;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Entry, EntryRow, Journal, Ledger, ModelKind, RecordId};

use super::commands::CommandAction;
use super::input::Mode;
use super::widgets::Notification;

/// Direction of a motion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Forward or backward through a cycle (tabs, fields)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cycle {
    Next,
    Prev,
}

/// The applications shown as tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppKind {
    Ledgers,
    Accounts,
    Journals,
    Entries,
}

impl AppKind {
    pub const ALL: [AppKind; 4] = [
        AppKind::Ledgers,
        AppKind::Accounts,
        AppKind::Journals,
        AppKind::Entries,
    ];

    /// The model this application manages
    pub fn model(self) -> ModelKind {
        match self {
            Self::Ledgers => ModelKind::Ledger,
            Self::Accounts => ModelKind::Account,
            Self::Journals => ModelKind::Journal,
            Self::Entries => ModelKind::Entry,
        }
    }

    /// The application managing `model`, if any
    pub fn for_model(model: ModelKind) -> Option<Self> {
        Self::ALL.into_iter().find(|app| app.model() == model)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Ledgers => "Ledgers",
            Self::Accounts => "Accounts",
            Self::Journals => "Journals",
            Self::Entries => "Entries",
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// The view variants every application can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewKind {
    List,
    Detail,
    Create,
    Update,
    Delete,
}

impl ViewKind {
    /// Whether this view shows one specific record
    pub fn needs_record(self) -> bool {
        matches!(self, Self::Detail | Self::Update | Self::Delete)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "List"),
            Self::Detail => write!(f, "Detail"),
            Self::Create => write!(f, "Create"),
            Self::Update => write!(f, "Update"),
            Self::Delete => write!(f, "Delete"),
        }
    }
}

/// What a key binding or command asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SwitchMode(Mode),
    SwitchApp(AppKind),
    /// Replace the active view; `None` means the view's current selection
    SwitchView {
        kind: ViewKind,
        record: Option<RecordId>,
    },
    SwitchFocus(Cycle),
    SwitchTab(Cycle),
    Navigate(Direction),
    JumpHorizontal { to_end: bool },
    JumpVertical { to_end: bool },
    ExecuteCommand(CommandAction),
    Commit,
    ToggleReconciled,
    Reconcile,
    Select,
    AddRow,
    DeleteRow,
    Help,
    /// Close the open dialog
    Dismiss,
    Refresh,
    Quit,
}

impl Action {
    pub fn switch_view(kind: ViewKind) -> Self {
        Self::SwitchView { kind, record: None }
    }

    /// Short description for the help overlay
    pub fn describe(&self) -> String {
        match self {
            Self::SwitchMode(mode) => format!("{} mode", mode),
            Self::SwitchApp(app) => format!("Go to {}", app),
            Self::SwitchView { kind, .. } => format!("{} view", kind),
            Self::SwitchFocus(Cycle::Next) => "Next field".into(),
            Self::SwitchFocus(Cycle::Prev) => "Previous field".into(),
            Self::SwitchTab(Cycle::Next) => "Next tab".into(),
            Self::SwitchTab(Cycle::Prev) => "Previous tab".into(),
            Self::Navigate(Direction::Up) => "Move up".into(),
            Self::Navigate(Direction::Down) => "Move down".into(),
            Self::Navigate(Direction::Left) => "Move left".into(),
            Self::Navigate(Direction::Right) => "Move right".into(),
            Self::JumpHorizontal { to_end: false } => "Line start".into(),
            Self::JumpHorizontal { to_end: true } => "Line end".into(),
            Self::JumpVertical { to_end: false } => "Go to top".into(),
            Self::JumpVertical { to_end: true } => "Go to bottom".into(),
            Self::ExecuteCommand(command) => format!("Run :{}", command.name()),
            Self::Commit => "Save".into(),
            Self::ToggleReconciled => "Toggle reconciled".into(),
            Self::Reconcile => "Commit reconciliation".into(),
            Self::Select => "Open / pick".into(),
            Self::AddRow => "Add row".into(),
            Self::DeleteRow => "Delete row".into(),
            Self::Help => "Help".into(),
            Self::Dismiss => "Close".into(),
            Self::Refresh => "Reload".into(),
            Self::Quit => "Quit".into(),
        }
    }
}

/// Addresses the result of an effect to one view instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewTarget {
    pub app: AppKind,
    /// Bumped every time the application's view is replaced
    pub generation: u64,
}

/// One line of a list or picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub id: RecordId,
    pub label: String,
    pub detail: String,
}

/// A posting shown in a detail view, with its references resolved to names
#[derive(Debug, Clone)]
pub struct DetailRow {
    pub row: EntryRow,
    pub ledger: String,
    pub account: String,
}

/// Everything a detail or delete view shows for one record
#[derive(Debug, Clone)]
pub struct DetailData {
    pub model: ModelKind,
    pub record: RecordId,
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub rows: Vec<DetailRow>,
    pub entries: Vec<ListItem>,
}

/// Data produced by a load effect
#[derive(Debug, Clone)]
pub enum LoadedData {
    List { model: ModelKind, items: Vec<ListItem> },
    Choices { model: ModelKind, items: Vec<ListItem> },
    Detail(DetailData),
    Ledger(Ledger),
    Account(Account),
    Journal(Journal),
    Entry { entry: Entry, rows: Vec<EntryRow> },
}

impl LoadedData {
    /// The model this data is about
    pub fn model_kind(&self) -> ModelKind {
        match self {
            Self::List { model, .. } | Self::Choices { model, .. } => *model,
            Self::Detail(data) => data.model,
            Self::Ledger(_) => ModelKind::Ledger,
            Self::Account(_) => ModelKind::Account,
            Self::Journal(_) => ModelKind::Journal,
            Self::Entry { .. } => ModelKind::Entry,
        }
    }
}

/// What a successful commit did
#[derive(Debug, Clone)]
pub enum CommitOutcome {
    Created(RecordId),
    Updated(RecordId),
    Deleted(RecordId),
    Reconciled(Vec<EntryRow>),
}

/// Which field of a form a picker fills in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickSlot {
    Journal,
    Ledger { row: usize },
    Account { row: usize },
}

impl PickSlot {
    pub fn model(self) -> ModelKind {
        match self {
            Self::Journal => ModelKind::Journal,
            Self::Ledger { .. } => ModelKind::Ledger,
            Self::Account { .. } => ModelKind::Account,
        }
    }
}

/// A request from a view to open the item picker
#[derive(Debug, Clone)]
pub struct PickerRequest {
    pub target: ViewTarget,
    pub slot: PickSlot,
    pub title: String,
    pub items: Vec<ListItem>,
    /// Preselected item, compared by id
    pub current: Option<RecordId>,
    /// Offer an explicit "none" entry
    pub allow_none: bool,
}

/// Messages processed by the router
#[derive(Debug)]
pub enum Msg {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    Tick,
    Action(Action),
    DataLoaded {
        target: ViewTarget,
        data: LoadedData,
    },
    LoadFailed {
        target: ViewTarget,
        error: LedgerError,
    },
    Committed {
        target: ViewTarget,
        model: ModelKind,
        result: LedgerResult<CommitOutcome>,
    },
    Picked {
        target: ViewTarget,
        slot: PickSlot,
        choice: Option<RecordId>,
    },
    /// Replace the view of `target.app`, or of the app managing `record`
    ///
    /// Sent by views once their work is done. Dropped if the sending view
    /// has been replaced in the meantime.
    Navigate {
        target: ViewTarget,
        kind: ViewKind,
        record: Option<RecordId>,
    },
    ShowPicker(PickerRequest),
    /// Shown in the shared status bar whichever application is active
    Notify(Notification),
    Quit,
}

impl Msg {
    /// Wrap the result of a load for delivery to `target`
    pub fn loaded(target: ViewTarget, result: LedgerResult<LoadedData>) -> Self {
        match result {
            Ok(data) => Self::DataLoaded { target, data },
            Err(error) => Self::LoadFailed { target, error },
        }
    }
}
