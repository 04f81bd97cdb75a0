//! Modal dialogs
//!
//! At most one dialog is open at a time. While it is, it receives every
//! key and nothing underneath it does. Keys reach a dialog as actions,
//! resolved against its own bindings layered over the global ones.

pub mod help;
pub mod picker;

use ratatui::{layout::Rect, Frame};

use super::effect::Effect;
use super::input::Mode;
use super::keybindings::BindingSet;
use super::message::Action;

pub use help::HelpDialog;
pub use picker::PickerDialog;

/// What a key did to the open dialog
#[derive(Debug)]
pub enum ModalOutcome {
    Stay,
    /// Close the dialog and run the effect
    Close(Effect),
}

pub enum Dialog {
    Picker(PickerDialog),
    Help(HelpDialog),
}

/// The open dialog and the terminal size it was last told about
pub struct Modal {
    dialog: Dialog,
    width: u16,
    height: u16,
}

impl Modal {
    pub fn new(dialog: Dialog, width: u16, height: u16) -> Self {
        Self {
            dialog,
            width,
            height,
        }
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Bindings layered over the globals while the dialog is open
    pub fn bindings(&self) -> &BindingSet {
        match &self.dialog {
            Dialog::Picker(picker) => picker.bindings(),
            Dialog::Help(help) => help.bindings(),
        }
    }

    pub fn handle_action(&mut self, action: Action) -> ModalOutcome {
        match &mut self.dialog {
            Dialog::Picker(picker) => picker.handle_action(action),
            Dialog::Help(help) => help.handle_action(action),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let area = Rect::new(
            area.x,
            area.y,
            self.width.min(area.width),
            self.height.min(area.height),
        );
        match &self.dialog {
            Dialog::Picker(picker) => picker.render(frame, area),
            Dialog::Help(help) => help.render(frame, area),
        }
    }
}

/// Keys that close any dialog
fn dismiss_bindings() -> BindingSet {
    BindingSet::new()
        .with(Mode::Normal, "esc", Action::Dismiss)
        .with(Mode::Normal, "ctrl+c", Action::Dismiss)
        .with(Mode::Normal, "q", Action::Dismiss)
}
