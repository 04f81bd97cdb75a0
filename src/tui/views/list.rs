//! List view
//!
//! Selectable list of every record of one model.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ModelKind, RecordId};
use crate::tui::effect::Effect;
use crate::tui::input::Mode;
use crate::tui::keybindings::BindingSet;
use crate::tui::load;
use crate::tui::message::{Action, Direction, ListItem, LoadedData, Msg, ViewKind};

use super::{step, View, ViewContext, ViewEvent};

pub struct ListView {
    model: ModelKind,
    accepts: [ModelKind; 1],
    ctx: ViewContext,
    items: Vec<ListItem>,
    selected: usize,
    loading: bool,
    bindings: BindingSet,
}

impl ListView {
    pub fn new(model: ModelKind, ctx: ViewContext) -> Self {
        Self {
            model,
            accepts: [model],
            ctx,
            items: Vec::new(),
            selected: 0,
            loading: true,
            bindings: BindingSet::new()
                .with(Mode::Normal, "o", Action::switch_view(ViewKind::Create))
                .with(Mode::Normal, "d d", Action::switch_view(ViewKind::Delete)),
        }
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }
}

impl View for ListView {
    fn kind(&self) -> ViewKind {
        ViewKind::List
    }

    fn accepts(&self) -> &[ModelKind] {
        &self.accepts
    }

    fn bindings(&self) -> Option<&BindingSet> {
        Some(&self.bindings)
    }

    fn init(&mut self) -> Effect {
        let storage = self.ctx.storage.clone();
        let settings = self.ctx.settings.clone();
        let target = self.ctx.target;
        let model = self.model;
        Effect::run(move || {
            let result = load::list_items(&storage, &settings, model)
                .map(|items| LoadedData::List { model, items });
            Msg::loaded(target, result)
        })
    }

    fn update(&mut self, event: ViewEvent) -> LedgerResult<Effect> {
        match event {
            ViewEvent::Loaded(LoadedData::List { items, .. }) => {
                // Keep the cursor on the same record across reloads
                let previous = self.selected();
                self.items = items;
                self.selected = previous
                    .and_then(|id| self.items.iter().position(|i| i.id == id))
                    .unwrap_or(0);
                self.loading = false;
            }
            ViewEvent::LoadFailed(error) => {
                self.loading = false;
                return Err(error);
            }
            ViewEvent::Action(Action::Navigate(Direction::Down)) => {
                self.selected = step(self.selected, self.items.len(), true);
            }
            ViewEvent::Action(Action::Navigate(Direction::Up)) => {
                self.selected = step(self.selected, self.items.len(), false);
            }
            ViewEvent::Action(Action::JumpVertical { to_end }) => {
                self.selected = if to_end {
                    self.items.len().saturating_sub(1)
                } else {
                    0
                };
            }
            ViewEvent::Action(Action::Select) => {
                let record = self.selected().ok_or(LedgerError::NoSelection)?;
                return Ok(self.ctx.navigate(ViewKind::Detail, Some(record)));
            }
            _ => {}
        }
        Ok(Effect::none())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(" {}s ", self.model);
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL);

        if self.loading {
            frame.render_widget(Paragraph::new("Loading...").block(block), area);
            return;
        }

        let header = Row::new(vec![
            Cell::from("Name").style(Style::default().add_modifier(Modifier::BOLD)),
            Cell::from("Details").style(Style::default().add_modifier(Modifier::BOLD)),
        ])
        .style(Style::default().fg(Color::Yellow));

        let rows: Vec<Row> = self
            .items
            .iter()
            .map(|item| Row::new(vec![Cell::from(item.label.clone()), Cell::from(item.detail.clone())]))
            .collect();

        let table = Table::new(rows, [Constraint::Percentage(60), Constraint::Percentage(40)])
            .header(header)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        if !self.items.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn selected(&self) -> Option<RecordId> {
        self.items.get(self.selected).map(|i| i.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{paths::LedgerPaths, Settings};
    use crate::models::{Ledger, LedgerType};
    use crate::storage::Storage;
    use crate::tui::message::{AppKind, ViewTarget};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn list_view(temp_dir: &TempDir) -> ListView {
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        storage.ledgers.insert(Ledger::new("Bank", LedgerType::Asset)).unwrap();
        storage.ledgers.insert(Ledger::new("Cash", LedgerType::Asset)).unwrap();
        ListView::new(
            ModelKind::Ledger,
            ViewContext {
                storage: Arc::new(storage),
                settings: Arc::new(Settings::default()),
                target: ViewTarget {
                    app: AppKind::Ledgers,
                    generation: 3,
                },
            },
        )
    }

    fn load(view: &mut ListView) {
        for msg in view.init().run_inline() {
            match msg {
                Msg::DataLoaded { target, data } => {
                    assert_eq!(target.generation, 3);
                    view.update(ViewEvent::Loaded(data)).unwrap();
                }
                other => panic!("unexpected message {:?}", other),
            }
        }
    }

    #[test]
    fn test_loads_and_navigates() {
        let temp_dir = TempDir::new().unwrap();
        let mut view = list_view(&temp_dir);
        load(&mut view);

        assert_eq!(view.items().len(), 2);
        view.update(ViewEvent::Action(Action::Navigate(Direction::Down))).unwrap();
        view.update(ViewEvent::Action(Action::Navigate(Direction::Down))).unwrap();
        assert_eq!(view.selected(), Some(view.items()[1].id));

        view.update(ViewEvent::Action(Action::JumpVertical { to_end: false })).unwrap();
        assert_eq!(view.selected(), Some(view.items()[0].id));
    }

    #[test]
    fn test_select_opens_detail() {
        let temp_dir = TempDir::new().unwrap();
        let mut view = list_view(&temp_dir);
        load(&mut view);

        let msgs = view.update(ViewEvent::Action(Action::Select)).unwrap().run_inline();
        assert!(matches!(
            msgs.as_slice(),
            [Msg::Navigate { kind: ViewKind::Detail, record: Some(_), .. }]
        ));
    }

    #[test]
    fn test_select_on_empty_list_is_no_selection() {
        let temp_dir = TempDir::new().unwrap();
        let mut view = list_view(&temp_dir);
        assert!(view.update(ViewEvent::Action(Action::Select)).is_err());
    }
}
