//! One application (tab) of the TUI
//!
//! An application owns exactly one view at a time plus the bindings it
//! layers over the global ones. Replacing the view bumps the generation
//! that effect results are checked against.

use super::keybindings::{app_bindings, BindingSet};
use super::message::{AppKind, ViewTarget};
use super::views::View;

pub struct App {
    kind: AppKind,
    view: Box<dyn View>,
    generation: u64,
    bindings: BindingSet,
    width: u16,
    height: u16,
}

impl App {
    pub fn new(kind: AppKind, view: Box<dyn View>, generation: u64) -> Self {
        Self {
            kind,
            view,
            generation,
            bindings: app_bindings(kind),
            width: 0,
            height: 0,
        }
    }

    pub fn kind(&self) -> AppKind {
        self.kind
    }

    pub fn view(&self) -> &dyn View {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut dyn View {
        self.view.as_mut()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Address for effects of the current view
    pub fn target(&self) -> ViewTarget {
        ViewTarget {
            app: self.kind,
            generation: self.generation,
        }
    }

    pub fn bindings(&self) -> &BindingSet {
        &self.bindings
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    /// Swap in a new view; the old one is dropped
    pub fn replace(&mut self, view: Box<dyn View>, generation: u64) {
        tracing::debug!(
            app = %self.kind,
            from = %self.view.kind(),
            to = %view.kind(),
            generation,
            "view replaced"
        );
        self.view = view;
        self.generation = generation;
    }
}
