//! Operator notifications: a bounded recent-history log plus a live feed.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

pub const DEFAULT_HISTORY: usize = 100;
const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Sink for operator-facing messages.
pub trait NotificationSink: Send + Sync + 'static {
    fn emit(&self, notification: Notification);

    fn success(&self, message: &str) {
        self.emit(Notification::new(NotificationKind::Success, message));
    }

    fn error(&self, message: &str) {
        self.emit(Notification::new(NotificationKind::Error, message));
    }

    fn info(&self, message: &str) {
        self.emit(Notification::new(NotificationKind::Info, message));
    }
}

/// Keeps the last `capacity` notifications and fans them out to subscribers.
///
/// Slow subscribers lag and lose messages; the history is unaffected.
#[derive(Debug)]
pub struct NotificationCenter {
    history: Mutex<VecDeque<Notification>>,
    capacity: usize,
    feed: broadcast::Sender<Notification>,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (feed, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            history: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            feed,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.feed.subscribe()
    }

    /// Oldest first.
    pub fn recent(&self) -> Vec<Notification> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY)
    }
}

impl NotificationSink for NotificationCenter {
    fn emit(&self, notification: Notification) {
        tracing::debug!(kind = ?notification.kind, message = %notification.message, "notification");
        {
            let mut history = self.history.lock().unwrap_or_else(|e| e.into_inner());
            if history.len() == self.capacity {
                history.pop_front();
            }
            history.push_back(notification.clone());
        }
        // No subscribers is fine.
        let _ = self.feed.send(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_is_bounded() {
        let center = NotificationCenter::new(2);
        center.info("one");
        center.info("two");
        center.error("three");

        let messages: Vec<_> = center.recent().into_iter().map(|n| n.message).collect();
        assert_eq!(messages, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn subscribers_receive_live_messages() {
        let center = NotificationCenter::default();
        let mut rx = center.subscribe();

        center.success("Configuration saved successfully.");
        let received = rx.recv().await.unwrap();
        assert_eq!(received.kind, NotificationKind::Success);
        assert_eq!(received.message, "Configuration saved successfully.");
    }

    #[test]
    fn serializes_kind_lowercase() {
        let json = serde_json::to_value(Notification::new(NotificationKind::Error, "x")).unwrap();
        assert_eq!(json["kind"], "error");
    }
}
