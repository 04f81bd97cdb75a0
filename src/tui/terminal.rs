//! Terminal setup, teardown and the event loop
//!
//! The panic hook restores the terminal first so an aborted session never
//! leaves the shell in raw mode.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::storage::Storage;

use super::effect::Scheduler;
use super::event::EventHandler;
use super::router::MessageRouter;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI until the user quits
///
/// One message is processed at a time; effects returned by the router run
/// on worker threads and post their result back through the event channel.
pub fn run_tui(storage: Arc<Storage>, settings: Arc<Settings>) -> Result<()> {
    let (width, height) = terminal::size()?;
    let mut terminal = init_terminal()?;

    let events = EventHandler::new(Duration::from_millis(settings.tick_rate_ms));
    let scheduler = Scheduler::new(events.sender());
    let mut router = MessageRouter::new(storage, settings, width, height);
    scheduler.spawn(router.init());

    tracing::info!(width, height, "TUI started");

    let result = event_loop(&mut terminal, &events, &scheduler, &mut router);

    restore_terminal()?;
    tracing::info!("TUI stopped");
    result
}

fn event_loop(
    terminal: &mut Tui,
    events: &EventHandler,
    scheduler: &Scheduler,
    router: &mut MessageRouter,
) -> Result<()> {
    loop {
        terminal.draw(|frame| router.render(frame))?;

        let msg = events.next()?;
        let effect = router.update(msg);
        scheduler.spawn(effect);

        if router.should_quit() {
            return Ok(());
        }
    }
}
