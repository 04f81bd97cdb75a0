//! Transient notifications
//!
//! User-facing errors and confirmations are shown as short-lived toasts and
//! in the status bar. They expire on tick.

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::error::LedgerError;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

impl NotificationLevel {
    pub fn color(self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Success => Color::Green,
            Self::Error => Color::Red,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Success => "Done",
            Self::Error => "Error",
        }
    }
}

/// A toast notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    created_at: Instant,
    ttl: Option<Duration>,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            created_at: Instant::now(),
            ttl: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error)
    }

    /// Notification for a failed operation
    pub fn from_error(error: &LedgerError) -> Self {
        Self::error(error.to_string())
    }

    /// Override the queue's default lifetime
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn is_expired(&self, now: Instant, default_ttl: Duration) -> bool {
        now.duration_since(self.created_at) >= self.ttl.unwrap_or(default_ttl)
    }
}

/// Widget for rendering a notification
pub struct NotificationWidget<'a> {
    notification: &'a Notification,
}

impl<'a> NotificationWidget<'a> {
    pub fn new(notification: &'a Notification) -> Self {
        Self { notification }
    }
}

impl Widget for NotificationWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = self.notification.level.color();

        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(format!(" {} ", self.notification.level.title()))
            .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD));

        Paragraph::new(self.notification.message.as_str())
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: true })
            .block(block)
            .render(area, buf);
    }
}

/// Pending notifications, oldest first
#[derive(Debug)]
pub struct NotificationQueue {
    notifications: Vec<Notification>,
    default_ttl: Duration,
}

impl NotificationQueue {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            notifications: Vec::new(),
            default_ttl,
        }
    }

    pub fn push(&mut self, notification: Notification) {
        if notification.level == NotificationLevel::Error {
            tracing::debug!(message = %notification.message, "error notification");
        }
        self.notifications.push(notification);
    }

    /// Drop everything older than its lifetime
    pub fn remove_expired(&mut self) {
        self.remove_expired_at(Instant::now());
    }

    fn remove_expired_at(&mut self, now: Instant) {
        let ttl = self.default_ttl;
        self.notifications.retain(|n| !n.is_expired(now, ttl));
    }

    /// The newest notification
    pub fn current(&self) -> Option<&Notification> {
        self.notifications.last()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error() {
        let n = Notification::from_error(&LedgerError::NoSelection);
        assert_eq!(n.level, NotificationLevel::Error);
        assert_eq!(n.message, LedgerError::NoSelection.to_string());
    }

    #[test]
    fn test_queue_shows_newest() {
        let mut queue = NotificationQueue::new(Duration::from_secs(4));
        assert!(queue.is_empty());

        queue.push(Notification::info("First"));
        queue.push(Notification::success("Second"));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.current().map(|n| n.message.as_str()), Some("Second"));
    }

    #[test]
    fn test_expiry() {
        let mut queue = NotificationQueue::new(Duration::from_secs(4));
        queue.push(Notification::info("default"));
        queue.push(Notification::info("long").with_ttl(Duration::from_secs(60)));

        queue.remove_expired_at(Instant::now() + Duration::from_secs(5));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current().map(|n| n.message.as_str()), Some("long"));
    }
}
