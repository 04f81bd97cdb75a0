//! Views
//!
//! Every application shows exactly one view at a time. All variants share
//! the [`View`] contract; the router replaces the instance on navigation
//! and never keeps the previous one around.

pub mod delete;
pub mod detail;
pub mod entry_form;
pub mod list;
pub mod reference_form;
pub mod status_bar;

use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::config::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Journal, Ledger, ModelKind, RecordId};
use crate::storage::Storage;

use super::effect::Effect;
use super::keybindings::BindingSet;
use super::message::{AppKind, CommitOutcome, LoadedData, Msg, PickSlot, ViewKind, ViewTarget};
use super::widgets::Notification;

pub use delete::DeleteView;
pub use detail::DetailView;
pub use entry_form::EntryForm;
pub use list::ListView;
pub use reference_form::ReferenceForm;

/// What a view is handed when it is built
#[derive(Clone)]
pub struct ViewContext {
    pub storage: Arc<Storage>,
    pub settings: Arc<Settings>,
    /// Address for the results of this view's effects
    pub target: ViewTarget,
}

impl ViewContext {
    /// Post a notification
    pub fn notify(&self, notification: Notification) -> Effect {
        Effect::message(Msg::Notify(notification))
    }

    /// Ask the router to replace this view
    pub fn navigate(&self, kind: ViewKind, record: Option<RecordId>) -> Effect {
        Effect::message(Msg::Navigate {
            target: self.target,
            kind,
            record,
        })
    }
}

/// Input delivered to a view
#[derive(Debug)]
pub enum ViewEvent {
    Action(super::message::Action),
    Text(Vec<KeyEvent>),
    Loaded(LoadedData),
    LoadFailed(LedgerError),
    Committed(LedgerResult<CommitOutcome>),
    Picked {
        slot: PickSlot,
        choice: Option<RecordId>,
    },
}

/// The contract every view variant implements
pub trait View {
    fn kind(&self) -> ViewKind;

    /// Models whose loaded data or commit results this view takes
    fn accepts(&self) -> &[ModelKind];

    /// Bindings consulted before the application and global ones
    fn bindings(&self) -> Option<&BindingSet> {
        None
    }

    /// Called once, right after the view becomes active
    fn init(&mut self) -> Effect;

    /// Handle one event; errors become notifications
    fn update(&mut self, event: ViewEvent) -> LedgerResult<Effect>;

    fn render(&mut self, frame: &mut Frame, area: Rect);

    /// The record an action like "edit" or "delete" should apply to
    fn selected(&self) -> Option<RecordId> {
        None
    }

    /// The record this view is bound to, if any
    fn record(&self) -> Option<RecordId> {
        None
    }
}

/// Construct the `kind` view of `app`
///
/// `record` must belong to the application's model when the view needs
/// one; the router guarantees that.
pub fn build(
    app: AppKind,
    kind: ViewKind,
    record: Option<RecordId>,
    ctx: ViewContext,
) -> LedgerResult<Box<dyn View>> {
    if let Some(record) = record {
        if record.model_kind() != app.model() {
            panic!(
                "{} record {} routed to the {} application",
                record.model_kind(),
                record,
                app
            );
        }
    }

    let view: Box<dyn View> = match (kind, record) {
        (ViewKind::List, _) => Box::new(ListView::new(app.model(), ctx)),
        (ViewKind::Detail, Some(record)) => Box::new(DetailView::new(record, ctx)),
        (ViewKind::Delete, Some(record)) => Box::new(DeleteView::new(record, ctx)),
        (ViewKind::Create, _) => match app {
            AppKind::Ledgers => Box::new(ReferenceForm::<Ledger>::create(ctx)),
            AppKind::Accounts => Box::new(ReferenceForm::<Account>::create(ctx)),
            AppKind::Journals => Box::new(ReferenceForm::<Journal>::create(ctx)),
            AppKind::Entries => Box::new(EntryForm::create(ctx)),
        },
        (ViewKind::Update, Some(record)) => match record {
            RecordId::Ledger(id) => Box::new(ReferenceForm::<Ledger>::edit(id, ctx)),
            RecordId::Account(id) => Box::new(ReferenceForm::<Account>::edit(id, ctx)),
            RecordId::Journal(id) => Box::new(ReferenceForm::<Journal>::edit(id, ctx)),
            RecordId::Entry(id) => Box::new(EntryForm::edit(id, ctx)),
        },
        (ViewKind::Detail | ViewKind::Update | ViewKind::Delete, None) => {
            return Err(LedgerError::NoSelection)
        }
    };
    Ok(view)
}

/// Move a selection index within `len` items
pub(crate) fn step(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (index + 1).min(len - 1)
    } else {
        index.saturating_sub(1)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::LedgerId;
    use tempfile::TempDir;

    fn ctx(temp_dir: &TempDir, app: AppKind) -> ViewContext {
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        ViewContext {
            storage: Arc::new(Storage::open(paths).unwrap()),
            settings: Arc::new(Settings::default()),
            target: ViewTarget { app, generation: 1 },
        }
    }

    #[test]
    fn test_build_every_kind() {
        let temp_dir = TempDir::new().unwrap();
        let record = Some(RecordId::from(LedgerId::new()));

        for kind in [
            ViewKind::List,
            ViewKind::Detail,
            ViewKind::Create,
            ViewKind::Update,
            ViewKind::Delete,
        ] {
            let view = build(AppKind::Ledgers, kind, record, ctx(&temp_dir, AppKind::Ledgers)).unwrap();
            assert_eq!(view.kind(), kind);
            assert!(view.accepts().contains(&ModelKind::Ledger));
        }
    }

    #[test]
    fn test_record_views_need_a_record() {
        let temp_dir = TempDir::new().unwrap();
        let err = build(AppKind::Journals, ViewKind::Detail, None, ctx(&temp_dir, AppKind::Journals))
            .err()
            .unwrap();
        assert!(matches!(err, LedgerError::NoSelection));
    }

    #[test]
    #[should_panic(expected = "routed to the Accounts application")]
    fn test_foreign_record_is_an_invariant_violation() {
        let temp_dir = TempDir::new().unwrap();
        let _ = build(
            AppKind::Accounts,
            ViewKind::Detail,
            Some(LedgerId::new().into()),
            ctx(&temp_dir, AppKind::Accounts),
        );
    }

    #[test]
    fn test_step() {
        assert_eq!(step(0, 0, true), 0);
        assert_eq!(step(0, 3, true), 1);
        assert_eq!(step(2, 3, true), 2);
        assert_eq!(step(0, 3, false), 0);
    }
}
