//! Terminal event source
//!
//! A background thread polls crossterm and turns key presses, resizes and
//! the periodic tick into [`Msg`]s on the same channel that effect results
//! arrive on.

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use super::message::Msg;

/// Event handler for terminal events
pub struct EventHandler {
    sender: mpsc::Sender<Msg>,
    receiver: mpsc::Receiver<Msg>,
}

impl EventHandler {
    /// Start polling with the given tick rate
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        let poller = sender.clone();
        thread::spawn(move || poll_terminal(poller, tick_rate));
        Self { sender, receiver }
    }

    /// A sender for effect results
    pub fn sender(&self) -> mpsc::Sender<Msg> {
        self.sender.clone()
    }

    /// Get the next message (blocking)
    pub fn next(&self) -> Result<Msg, mpsc::RecvError> {
        self.receiver.recv()
    }
}

fn poll_terminal(sender: mpsc::Sender<Msg>, tick_rate: Duration) {
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        let ready = match event::poll(timeout) {
            Ok(ready) => ready,
            Err(e) => {
                tracing::error!(error = %e, "failed to poll terminal events");
                return;
            }
        };

        if ready {
            let msg = match event::read() {
                Ok(CrosstermEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    Some(Msg::Key(key))
                }
                Ok(CrosstermEvent::Resize(width, height)) => Some(Msg::Resize { width, height }),
                Ok(_) => None,
                Err(e) => {
                    tracing::error!(error = %e, "failed to read terminal event");
                    return;
                }
            };
            if let Some(msg) = msg {
                if sender.send(msg).is_err() {
                    return;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if sender.send(Msg::Tick).is_err() {
                return;
            }
            last_tick = Instant::now();
        }
    }
}
