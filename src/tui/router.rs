//! Message router
//!
//! The root of the application hierarchy. It owns every application, the
//! optional modal and the input resolver, and decides for each [`Msg`]
//! who receives it:
//!
//! - while a modal is open it receives every key and nothing else does
//! - resize events reach every application and the modal
//! - resolved keys go to the active application's view
//! - effect results go to the view named by their [`ViewTarget`], which
//!   must still be current and must accept the model they carry
//!
//! Navigation replaces a view in one step and runs the new view's init.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::KeyEvent;
use ratatui::{
    style::{Color, Modifier, Style},
    widgets::Tabs,
    Frame,
};

use crate::config::Settings;
use crate::error::LedgerError;
use crate::models::{ModelKind, RecordId};
use crate::storage::Storage;

use super::app::App;
use super::commands::CommandAction;
use super::dialogs::{Dialog, HelpDialog, Modal, ModalOutcome, PickerDialog};
use super::effect::Effect;
use super::input::{InputResolver, Mode, Resolved};
use super::keybindings::{default_global, BindingSet, CompleteBindingSet};
use super::layout::{toast_rect, AppLayout};
use super::message::{Action, AppKind, Cycle, Msg, PickerRequest, ViewKind, ViewTarget};
use super::views::{self, status_bar, ListView, ViewContext, ViewEvent};
use super::widgets::{Notification, NotificationLevel, NotificationQueue, NotificationWidget};

const HINT: &str = "? help  :q quit";

pub struct MessageRouter {
    storage: Arc<Storage>,
    settings: Arc<Settings>,
    global: BindingSet,
    resolver: InputResolver,
    apps: Vec<App>,
    active: usize,
    modal: Option<Modal>,
    notifications: NotificationQueue,
    width: u16,
    height: u16,
    next_generation: u64,
    should_quit: bool,
    /// Quit once the commit addressed to this view succeeds
    quit_after_commit: Option<ViewTarget>,
}

impl MessageRouter {
    /// Build the router with every application on its list view
    pub fn new(storage: Arc<Storage>, settings: Arc<Settings>, width: u16, height: u16) -> Self {
        let notifications = NotificationQueue::new(Duration::from_secs(settings.notification_secs));
        let mut router = Self {
            storage,
            settings,
            global: default_global(),
            resolver: InputResolver::new(),
            apps: Vec::with_capacity(AppKind::ALL.len()),
            active: 0,
            modal: None,
            notifications,
            width,
            height,
            next_generation: 0,
            should_quit: false,
            quit_after_commit: None,
        };

        for kind in AppKind::ALL {
            let generation = router.bump_generation();
            let ctx = router.context(ViewTarget {
                app: kind,
                generation,
            });
            let mut app = App::new(kind, Box::new(ListView::new(kind.model(), ctx)), generation);
            app.resize(width, height);
            router.apps.push(app);
        }
        router
    }

    /// Run the init hook of every application's view
    pub fn init(&mut self) -> Effect {
        tracing::debug!(apps = self.apps.len(), "initialising applications");
        Effect::batch(self.apps.iter_mut().map(|app| app.view_mut().init()))
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn mode(&self) -> Mode {
        self.resolver.mode()
    }

    pub fn active_app(&self) -> AppKind {
        self.apps[self.active].kind()
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Process one message and return the work it schedules
    pub fn update(&mut self, msg: Msg) -> Effect {
        match msg {
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize { width, height } => {
                self.resize(width, height);
                Effect::none()
            }
            Msg::Tick => {
                self.notifications.remove_expired();
                Effect::none()
            }
            Msg::Action(action) => self.handle_action(action),
            Msg::DataLoaded { target, data } => {
                let model = data.model_kind();
                self.deliver(target, Some(model), ViewEvent::Loaded(data))
            }
            Msg::LoadFailed { target, error } => {
                self.deliver(target, None, ViewEvent::LoadFailed(error))
            }
            Msg::Committed {
                target,
                model,
                result,
            } => {
                if self.quit_after_commit == Some(target) {
                    self.quit_after_commit = None;
                    if result.is_ok() {
                        self.should_quit = true;
                    }
                }
                self.deliver(target, Some(model), ViewEvent::Committed(result))
            }
            Msg::Picked {
                target,
                slot,
                choice,
            } => self.deliver(target, Some(slot.model()), ViewEvent::Picked { slot, choice }),
            Msg::Navigate {
                target,
                kind,
                record,
            } => self.navigate(target, kind, record),
            Msg::ShowPicker(request) => {
                self.show_picker(request);
                Effect::none()
            }
            Msg::Notify(notification) => {
                self.notifications.push(notification);
                Effect::none()
            }
            Msg::Quit => {
                self.should_quit = true;
                Effect::none()
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Effect {
        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        let app = &self.apps[self.active];
        let bindings = CompleteBindingSet::new(&self.global)
            .with_override(Some(app.bindings()))
            .with_override(app.view().bindings());

        match self.resolver.resolve(key, &bindings) {
            None => Effect::none(),
            Some(Resolved::Action(action)) => self.handle_action(action),
            Some(Resolved::Text(keys)) => self.deliver_active(ViewEvent::Text(keys)),
            Some(Resolved::UnknownCommand(name)) => {
                self.report(&LedgerError::UnknownCommand(name));
                Effect::none()
            }
        }
    }

    /// Resolve `key` against the dialog's bindings over the globals
    ///
    /// Dialogs only work in normal mode; a binding that would switch modes
    /// is ignored while one is open.
    fn handle_modal_key(&mut self, key: KeyEvent) -> Effect {
        let Some(modal) = self.modal.as_mut() else {
            return Effect::none();
        };
        let bindings = CompleteBindingSet::new(&self.global).with_override(Some(modal.bindings()));
        let resolved = self.resolver.resolve(key, &bindings);
        if self.resolver.mode() != Mode::Normal {
            self.resolver.reset();
        }

        let Some(Resolved::Action(action)) = resolved else {
            return Effect::none();
        };
        match modal.handle_action(action) {
            ModalOutcome::Stay => Effect::none(),
            ModalOutcome::Close(effect) => {
                tracing::debug!("modal closed");
                self.resolver.reset();
                self.modal = None;
                effect
            }
        }
    }

    fn handle_action(&mut self, action: Action) -> Effect {
        tracing::debug!(?action, app = %self.active_app(), "action");
        match action {
            Action::SwitchMode(mode) => {
                self.resolver.set_mode(mode);
                Effect::none()
            }
            Action::SwitchApp(kind) => self.activate(kind),
            Action::SwitchTab(cycle) => {
                let len = self.apps.len();
                let index = match cycle {
                    Cycle::Next => (self.active + 1) % len,
                    Cycle::Prev => (self.active + len - 1) % len,
                };
                let kind = self.apps[index].kind();
                self.activate(kind)
            }
            Action::SwitchView { kind, record } => self.switch_view(kind, record),
            Action::Help => {
                self.show_help();
                Effect::none()
            }
            Action::Refresh => {
                let view = self.apps[self.active].view();
                let (kind, record) = (view.kind(), view.record());
                self.replace_view(self.active_app(), kind, record, true)
            }
            Action::Quit => {
                self.should_quit = true;
                Effect::none()
            }
            Action::ExecuteCommand(command) => self.execute(command),
            Action::Commit => self.commit(Action::Commit, "Nothing to save"),
            Action::Reconcile => self.commit(Action::Reconcile, "Nothing to reconcile"),
            other => self.deliver_active(ViewEvent::Action(other)),
        }
    }

    fn execute(&mut self, command: CommandAction) -> Effect {
        tracing::debug!(command = command.name(), "executing command");
        match command {
            CommandAction::Write => self.handle_action(Action::Commit),
            CommandAction::Quit => self.handle_action(Action::Quit),
            CommandAction::WriteQuit => self.write_quit(),
            CommandAction::Reconcile => self.handle_action(Action::Reconcile),
            CommandAction::Help => self.handle_action(Action::Help),
            CommandAction::Refresh => self.handle_action(Action::Refresh),
            CommandAction::Ledgers => self.activate(AppKind::Ledgers),
            CommandAction::Accounts => self.activate(AppKind::Accounts),
            CommandAction::Journals => self.activate(AppKind::Journals),
            CommandAction::Entries => self.activate(AppKind::Entries),
            CommandAction::New => self.switch_view(ViewKind::Create, None),
            CommandAction::Edit => self.switch_view(ViewKind::Update, None),
            CommandAction::Delete => self.switch_view(ViewKind::Delete, None),
            CommandAction::List => self.switch_view(ViewKind::List, None),
        }
    }

    /// Ask the active view to commit; a view with nothing pending says so
    fn commit(&mut self, action: Action, idle: &str) -> Effect {
        match self.apps[self.active].view_mut().update(ViewEvent::Action(action)) {
            Ok(effect) if effect.is_none() => {
                self.notifications.push(Notification::info(idle));
                Effect::none()
            }
            Ok(effect) => effect,
            Err(error) => {
                self.report(&error);
                Effect::none()
            }
        }
    }

    fn write_quit(&mut self) -> Effect {
        let target = self.apps[self.active].target();
        match self.apps[self.active].view_mut().update(ViewEvent::Action(Action::Commit)) {
            Ok(effect) if effect.is_none() => {
                self.should_quit = true;
                Effect::none()
            }
            Ok(effect) => {
                self.quit_after_commit = Some(target);
                effect
            }
            Err(error) => {
                self.report(&error);
                Effect::none()
            }
        }
    }

    fn switch_view(&mut self, kind: ViewKind, record: Option<RecordId>) -> Effect {
        let record = if kind.needs_record() {
            match record.or_else(|| self.apps[self.active].view().selected()) {
                Some(record) => Some(record),
                None => {
                    self.report(&LedgerError::NoSelection);
                    return Effect::none();
                }
            }
        } else {
            None
        };

        let app = match record {
            Some(record) => Self::manager_of(record),
            None => self.active_app(),
        };
        self.replace_view(app, kind, record, true)
    }

    /// Navigation requested by the view at `target`
    ///
    /// Only the sending application is affected; the active application
    /// changes only if the sender was active or the record belongs elsewhere.
    fn navigate(&mut self, target: ViewTarget, kind: ViewKind, record: Option<RecordId>) -> Effect {
        let sender = self.index_of(target.app);
        if self.apps[sender].generation() != target.generation {
            tracing::warn!(
                app = %target.app,
                generation = target.generation,
                %kind,
                "dropping navigation from a replaced view"
            );
            return Effect::none();
        }

        let app = record.map_or(target.app, Self::manager_of);
        let focus = app != target.app || sender == self.active;
        self.replace_view(app, kind, record, focus)
    }

    fn manager_of(record: RecordId) -> AppKind {
        match AppKind::for_model(record.model_kind()) {
            Some(app) => app,
            None => panic!("no application manages {} records", record.model_kind()),
        }
    }

    /// Swap the view of `app` and run its init; `focus` also makes the app active
    fn replace_view(
        &mut self,
        app: AppKind,
        kind: ViewKind,
        record: Option<RecordId>,
        focus: bool,
    ) -> Effect {
        let index = self.index_of(app);
        let generation = self.bump_generation();
        let ctx = self.context(ViewTarget { app, generation });

        let mut view = match views::build(app, kind, record, ctx) {
            Ok(view) => view,
            Err(error) => {
                self.report(&error);
                return Effect::none();
            }
        };
        let effect = view.init();
        self.apps[index].replace(view, generation);
        if focus {
            self.resolver.reset();
            self.active = index;
        }
        effect
    }

    fn activate(&mut self, kind: AppKind) -> Effect {
        let index = self.index_of(kind);
        if index != self.active {
            tracing::debug!(from = %self.active_app(), to = %kind, "switching application");
        }
        self.active = index;
        self.resolver.reset();
        Effect::none()
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        for app in self.apps.iter_mut() {
            app.resize(width, height);
        }
        if let Some(modal) = self.modal.as_mut() {
            modal.resize(width, height);
        }
    }

    fn show_help(&mut self) {
        let app = &self.apps[self.active];
        let bindings = CompleteBindingSet::new(&self.global)
            .with_override(Some(app.bindings()))
            .with_override(app.view().bindings());
        let dialog = HelpDialog::new(self.resolver.mode(), &bindings);
        self.resolver.reset();
        self.modal = Some(Modal::new(Dialog::Help(dialog), self.width, self.height));
    }

    fn show_picker(&mut self, request: PickerRequest) {
        let current = self.apps[self.index_of(request.target.app)].target();
        if current != request.target {
            tracing::warn!(view = ?request.target, "dropping picker request from a replaced view");
            return;
        }
        self.resolver.reset();
        self.modal = Some(Modal::new(
            Dialog::Picker(PickerDialog::new(request)),
            self.width,
            self.height,
        ));
    }

    fn deliver_active(&mut self, event: ViewEvent) -> Effect {
        let target = self.apps[self.active].target();
        self.deliver(target, None, event)
    }

    /// Hand `event` to the view addressed by `target`
    ///
    /// Results for a replaced view are dropped. A current view receiving a
    /// model it does not accept is a routing defect and aborts.
    fn deliver(&mut self, target: ViewTarget, model: Option<ModelKind>, event: ViewEvent) -> Effect {
        let index = self.index_of(target.app);
        let app = &mut self.apps[index];

        if app.generation() != target.generation {
            tracing::warn!(
                app = %target.app,
                generation = target.generation,
                current = app.generation(),
                "dropping message for a replaced view"
            );
            return Effect::none();
        }

        if let Some(model) = model {
            if !app.view().accepts().contains(&model) {
                panic!(
                    "{} view of {} does not accept {} data",
                    app.view().kind(),
                    target.app,
                    model
                );
            }
        }

        match app.view_mut().update(event) {
            Ok(effect) => effect,
            Err(error) => {
                self.report(&error);
                Effect::none()
            }
        }
    }

    /// Turn an error returned by a view into a notification
    fn report(&mut self, error: &LedgerError) {
        if error.is_user_facing() {
            tracing::debug!(%error, "user error");
        } else {
            tracing::error!(%error, "operation failed");
        }
        self.notifications.push(Notification::from_error(error));
    }

    fn index_of(&self, kind: AppKind) -> usize {
        match self.apps.iter().position(|app| app.kind() == kind) {
            Some(index) => index,
            None => panic!("application {} is not registered", kind),
        }
    }

    fn bump_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    fn context(&self, target: ViewTarget) -> ViewContext {
        ViewContext {
            storage: self.storage.clone(),
            settings: self.settings.clone(),
            target,
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let layout = AppLayout::new(area);

        let titles: Vec<String> = self
            .apps
            .iter()
            .map(|app| format!(" {} ", app.kind().title()))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.active)
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("|");
        frame.render_widget(tabs, layout.tabs);

        self.apps[self.active].view_mut().render(frame, layout.main);

        let pending = self.resolver.pending();
        status_bar::render(
            frame,
            layout.status_bar,
            &status_bar::StatusLine {
                mode: self.resolver.mode(),
                pending: &pending,
                command_line: self.resolver.command_line(),
                notification: self.notifications.current(),
                hint: HINT,
            },
        );

        if let Some(modal) = &self.modal {
            modal.render(frame, area);
        } else if let Some(notification) = self.notifications.current() {
            if notification.level == NotificationLevel::Error {
                let toast = toast_rect(48, 4, layout.main);
                frame.render_widget(NotificationWidget::new(notification), toast);
            }
        }
    }
}

#[cfg(test)]
impl MessageRouter {
    fn app(&self, kind: AppKind) -> &App {
        &self.apps[self.index_of(kind)]
    }

    pub(crate) fn view_kind(&self, kind: AppKind) -> ViewKind {
        self.app(kind).view().kind()
    }

    pub(crate) fn target(&self, kind: AppKind) -> ViewTarget {
        self.app(kind).target()
    }

    pub(crate) fn app_size(&self, kind: AppKind) -> (u16, u16) {
        self.app(kind).size()
    }

    pub(crate) fn modal_size(&self) -> Option<(u16, u16)> {
        self.modal.as_ref().map(Modal::size)
    }

    pub(crate) fn has_modal(&self) -> bool {
        self.modal.is_some()
    }

    pub(crate) fn pending_keys(&self) -> String {
        self.resolver.pending()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Account, AccountType, Entry, EntryRow, Journal, JournalType, Ledger, LedgerType, Money};
    use crate::services::EntryService;
    use crate::tui::message::LoadedData;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<Storage>, MessageRouter) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Arc::new(Storage::open(paths).unwrap());
        let router = MessageRouter::new(storage.clone(), Arc::new(Settings::default()), 80, 24);
        (temp_dir, storage, router)
    }

    /// Run effects inline until the loop goes quiet
    fn pump(router: &mut MessageRouter, effect: Effect) {
        let mut queue: VecDeque<Msg> = effect.run_inline().into();
        while let Some(msg) = queue.pop_front() {
            queue.extend(router.update(msg).run_inline());
        }
    }

    fn press(router: &mut MessageRouter, keys: &str) {
        for c in keys.chars() {
            let modifiers = if c.is_ascii_uppercase() {
                KeyModifiers::SHIFT
            } else {
                KeyModifiers::NONE
            };
            let effect = router.update(Msg::Key(KeyEvent::new(KeyCode::Char(c), modifiers)));
            pump(router, effect);
        }
    }

    fn press_code(router: &mut MessageRouter, code: KeyCode) {
        let effect = router.update(Msg::Key(KeyEvent::new(code, KeyModifiers::NONE)));
        pump(router, effect);
    }

    fn started(router: &mut MessageRouter) {
        let effect = router.init();
        pump(router, effect);
    }

    #[test]
    fn test_every_app_starts_on_its_list() {
        let (_temp_dir, _storage, mut router) = setup();
        let effect = router.init();
        assert_eq!(effect.count(), AppKind::ALL.len());
        pump(&mut router, effect);

        for kind in AppKind::ALL {
            assert_eq!(router.view_kind(kind), ViewKind::List);
        }
        assert_eq!(router.active_app(), AppKind::Ledgers);
        assert!(router.notifications().is_empty());
    }

    #[test]
    fn test_leader_sequence_switches_app() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);

        press(&mut router, " ");
        assert_eq!(router.active_app(), AppKind::Ledgers);
        press(&mut router, "a");
        assert_eq!(router.active_app(), AppKind::Accounts);

        press(&mut router, "gt");
        assert_eq!(router.active_app(), AppKind::Journals);
    }

    #[test]
    fn test_app_binding_opens_create_view() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);
        let before = router.target(AppKind::Ledgers).generation;

        press(&mut router, "n");

        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::Create);
        assert!(router.target(AppKind::Ledgers).generation > before);
    }

    #[test]
    fn test_create_ledger_through_keys() {
        let (_temp_dir, storage, mut router) = setup();
        started(&mut router);

        press(&mut router, "ni");
        assert_eq!(router.mode(), Mode::Insert);
        press(&mut router, "Cash");
        press_code(&mut router, KeyCode::Esc);
        press(&mut router, ":w");
        press_code(&mut router, KeyCode::Enter);

        let ledgers = storage.ledgers.select_all().unwrap();
        assert_eq!(ledgers.len(), 1);
        assert_eq!(ledgers[0].name, "Cash");
        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::Detail);
        assert_eq!(router.mode(), Mode::Normal);
        assert_eq!(
            router.notifications().current().map(|n| n.message.as_str()),
            Some("Ledger created")
        );
    }

    #[test]
    fn test_modal_receives_keys_exclusively() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);

        press(&mut router, "?");
        assert!(router.has_modal());

        press(&mut router, "n");
        assert!(router.has_modal());
        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::List);

        press_code(&mut router, KeyCode::Esc);
        assert!(!router.has_modal());

        press(&mut router, "n");
        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::Create);
    }

    #[test]
    fn test_modal_keys_use_layered_bindings() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);
        press(&mut router, "?");

        press(&mut router, "i:");
        assert_eq!(router.mode(), Mode::Normal);
        press(&mut router, " a");
        assert_eq!(router.active_app(), AppKind::Ledgers);

        press(&mut router, "g");
        assert_eq!(router.pending_keys(), "g");
        press(&mut router, "g");
        assert_eq!(router.pending_keys(), "");
        assert!(router.has_modal());

        press(&mut router, "?");
        assert!(!router.has_modal());
    }

    #[test]
    fn test_resize_reaches_modal_and_every_app() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);
        press(&mut router, "?");

        router.update(Msg::Resize {
            width: 120,
            height: 40,
        });

        assert_eq!(router.modal_size(), Some((120, 40)));
        for kind in AppKind::ALL {
            assert_eq!(router.app_size(kind), (120, 40));
        }
    }

    #[test]
    #[should_panic(expected = "does not accept")]
    fn test_mismatched_model_is_fatal() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);

        let target = router.target(AppKind::Ledgers);
        router.update(Msg::DataLoaded {
            target,
            data: LoadedData::Account(Account::new("Customer", AccountType::Debtor)),
        });
    }

    #[test]
    fn test_stale_results_are_dropped() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);
        let stale = router.target(AppKind::Ledgers);

        press(&mut router, "n");
        router.update(Msg::DataLoaded {
            target: stale,
            data: LoadedData::Account(Account::new("Customer", AccountType::Debtor)),
        });

        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::Create);
        assert!(router.notifications().is_empty());
    }

    #[test]
    fn test_unknown_command_notifies() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);

        press(&mut router, ":xyz");
        assert_eq!(router.mode(), Mode::Command);
        press_code(&mut router, KeyCode::Enter);

        assert_eq!(router.mode(), Mode::Normal);
        let message = router.notifications().current().map(|n| n.message.clone());
        assert_eq!(message.as_deref(), Some("Unknown command: xyz"));
    }

    #[test]
    fn test_enter_opens_detail_of_selection() {
        let (_temp_dir, storage, mut router) = setup();
        storage
            .ledgers
            .insert(Ledger::new("Bank", LedgerType::Asset))
            .unwrap();
        started(&mut router);
        let before = router.target(AppKind::Ledgers).generation;

        press_code(&mut router, KeyCode::Enter);

        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::Detail);
        assert!(router.target(AppKind::Ledgers).generation > before);
        assert!(router.notifications().is_empty());
    }

    #[test]
    fn test_record_view_needs_selection() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);

        press(&mut router, "e");

        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::List);
        let message = router.notifications().current().map(|n| n.message.clone());
        assert_eq!(message.as_deref(), Some("No item selected"));
    }

    #[test]
    fn test_switch_view_redirects_to_owning_app() {
        let (_temp_dir, storage, mut router) = setup();
        let journal = Journal::new("General", JournalType::General);
        let bank = Ledger::new("Bank", LedgerType::Asset);
        storage.journals.insert(journal.clone()).unwrap();
        storage.ledgers.insert(bank.clone()).unwrap();
        let entry = Entry::new(journal.id, "Opening");
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        EntryService::new(&storage)
            .create(
                entry.clone(),
                vec![
                    EntryRow::new(entry.id, bank.id, date, Money::from_cents(500)),
                    EntryRow::new(entry.id, bank.id, date, Money::from_cents(-500)),
                ],
            )
            .unwrap();
        started(&mut router);

        let effect = router.update(Msg::Action(Action::SwitchView {
            kind: ViewKind::Detail,
            record: Some(entry.id.into()),
        }));
        pump(&mut router, effect);

        assert_eq!(router.active_app(), AppKind::Entries);
        assert_eq!(router.view_kind(AppKind::Entries), ViewKind::Detail);
        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::List);
    }

    #[test]
    fn test_navigation_after_commit_stays_in_sending_app() {
        let (_temp_dir, storage, mut router) = setup();
        let old = Ledger::new("Old", LedgerType::Expense);
        storage.ledgers.insert(old.clone()).unwrap();
        started(&mut router);

        let effect = router.update(Msg::Action(Action::SwitchView {
            kind: ViewKind::Delete,
            record: Some(old.id.into()),
        }));
        pump(&mut router, effect);
        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::Delete);

        // The commit finishes only after the user moved on
        let commit = router.update(Msg::Action(Action::Commit));
        press(&mut router, " a");
        assert_eq!(router.active_app(), AppKind::Accounts);
        pump(&mut router, commit);

        assert_eq!(storage.ledgers.count().unwrap(), 0);
        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::List);
        assert_eq!(router.view_kind(AppKind::Accounts), ViewKind::List);
        assert_eq!(router.active_app(), AppKind::Accounts);
    }

    #[test]
    fn test_navigation_from_replaced_view_is_dropped() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);
        let stale = router.target(AppKind::Ledgers);

        press(&mut router, "n");
        let effect = router.update(Msg::Navigate {
            target: stale,
            kind: ViewKind::List,
            record: None,
        });
        pump(&mut router, effect);

        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::Create);
    }

    #[test]
    fn test_notifications_are_shown_for_any_app() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);
        press(&mut router, " j");

        router.update(Msg::Notify(Notification::success("Ledger created")));

        assert_eq!(router.active_app(), AppKind::Journals);
        assert_eq!(
            router.notifications().current().map(|n| n.message.as_str()),
            Some("Ledger created")
        );
    }

    #[test]
    fn test_write_quit_without_changes_quits() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);

        press(&mut router, ":wq");
        press_code(&mut router, KeyCode::Enter);

        assert!(router.should_quit());
    }

    #[test]
    fn test_write_quit_stays_on_failed_commit() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);

        press(&mut router, "n:wq");
        press_code(&mut router, KeyCode::Enter);

        assert!(!router.should_quit());
        assert_eq!(router.view_kind(AppKind::Ledgers), ViewKind::Create);
        assert!(!router.notifications().is_empty());
    }

    #[test]
    fn test_render_shows_tabs_and_mode() {
        let (_temp_dir, _storage, mut router) = setup();
        started(&mut router);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| router.render(frame)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Ledgers"));
        assert!(text.contains("Entries"));
        assert!(text.contains("NORMAL"));
    }
}
