//! Deferred effects
//!
//! `update` never blocks. Work that touches storage is returned as an
//! [`Effect`] and run by the [`Scheduler`] on a worker thread; each job
//! posts exactly one [`Msg`] back into the event loop.

use std::fmt;
use std::sync::mpsc::Sender;
use std::thread;

use super::message::Msg;

/// A unit of deferred work
pub type Job = Box<dyn FnOnce() -> Msg + Send + 'static>;

/// Work returned from an update step
#[derive(Default)]
pub enum Effect {
    #[default]
    None,
    Run(Job),
    Batch(Vec<Effect>),
}

impl Effect {
    pub fn none() -> Self {
        Self::None
    }

    /// Run `job` off the update path
    pub fn run<F>(job: F) -> Self
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        Self::Run(Box::new(job))
    }

    /// Post `msg` back into the loop
    pub fn message(msg: Msg) -> Self {
        Self::run(move || msg)
    }

    /// Combine effects; empty parts are dropped
    pub fn batch(effects: impl IntoIterator<Item = Effect>) -> Self {
        let mut effects: Vec<Effect> = effects.into_iter().filter(|e| !e.is_none()).collect();
        match effects.len() {
            0 => Self::None,
            1 => effects.pop().unwrap_or_default(),
            _ => Self::Batch(effects),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Number of jobs this effect will run
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Run(_) => 1,
            Self::Batch(effects) => effects.iter().map(Effect::count).sum(),
        }
    }

    /// Flatten into individual jobs
    pub fn into_jobs(self) -> Vec<Job> {
        match self {
            Self::None => Vec::new(),
            Self::Run(job) => vec![job],
            Self::Batch(effects) => effects.into_iter().flat_map(Effect::into_jobs).collect(),
        }
    }

    /// Run every job on the current thread, in order
    ///
    /// Used where there is no event loop, such as tests.
    pub fn run_inline(self) -> Vec<Msg> {
        self.into_jobs().into_iter().map(|job| job()).collect()
    }
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Run(_) => write!(f, "Run(..)"),
            Self::Batch(effects) => f.debug_tuple("Batch").field(effects).finish(),
        }
    }
}

/// Runs effects on worker threads and feeds their messages back
pub struct Scheduler {
    sender: Sender<Msg>,
}

impl Scheduler {
    pub fn new(sender: Sender<Msg>) -> Self {
        Self { sender }
    }

    /// Start every job of `effect`; ordering between them is not defined
    pub fn spawn(&self, effect: Effect) {
        for job in effect.into_jobs() {
            let sender = self.sender.clone();
            thread::spawn(move || {
                let msg = job();
                if sender.send(msg).is_err() {
                    tracing::debug!("event loop gone, dropping effect result");
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn test_batch_flattens_and_drops_none() {
        assert!(Effect::batch([Effect::none(), Effect::none()]).is_none());
        assert!(matches!(
            Effect::batch([Effect::none(), Effect::message(Msg::Tick)]),
            Effect::Run(_)
        ));

        let nested = Effect::batch([
            Effect::message(Msg::Tick),
            Effect::batch([Effect::message(Msg::Quit), Effect::message(Msg::Tick)]),
        ]);
        assert_eq!(nested.count(), 3);
        assert_eq!(nested.into_jobs().len(), 3);
    }

    #[test]
    fn test_run_inline() {
        let msgs = Effect::batch([Effect::message(Msg::Tick), Effect::message(Msg::Quit)]).run_inline();
        assert!(matches!(msgs.as_slice(), [Msg::Tick, Msg::Quit]));
    }

    #[test]
    fn test_scheduler_delivers_each_result_once() {
        let (sender, receiver) = mpsc::channel();
        let scheduler = Scheduler::new(sender);

        scheduler.spawn(Effect::batch([
            Effect::message(Msg::Tick),
            Effect::message(Msg::Quit),
        ]));

        let mut received = Vec::new();
        for _ in 0..2 {
            received.push(receiver.recv_timeout(Duration::from_secs(5)).unwrap());
        }
        assert!(received.iter().any(|m| matches!(m, Msg::Tick)));
        assert!(received.iter().any(|m| matches!(m, Msg::Quit)));
        assert!(receiver.recv_timeout(Duration::from_millis(50)).is_err());
    }
}
