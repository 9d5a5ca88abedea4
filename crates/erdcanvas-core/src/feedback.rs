//! Single-slot transient notifications with auto-clear.
//!
//! The channel holds at most one message. Posting a new message replaces
//! the old one and cancels its pending clear, so a stale timer can never
//! erase a newer message. Expiry is polled by the host once per frame.

use crate::config::CanvasConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Message class, which decides the auto-clear delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    /// A template was dropped that is already on the canvas.
    DuplicatePlacement,
    /// Two columns were connected.
    Connected,
    /// Something went wrong that the user should know about.
    Failure,
}

/// The message currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// A scheduled clear of one specific notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ClearTask {
    /// Sequence number of the notification this task clears.
    seq: u64,
    due: Instant,
}

/// Owner of the current notification and its clear task.
#[derive(Debug, Clone)]
pub struct FeedbackChannel {
    current: Option<Notification>,
    pending: Option<ClearTask>,
    /// Incremented for every posted notification.
    seq: u64,
    duplicate_placement_delay: Duration,
    connected_delay: Duration,
    failure_delay: Duration,
}

impl Default for FeedbackChannel {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl FeedbackChannel {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            current: None,
            pending: None,
            seq: 0,
            duplicate_placement_delay: config.duplicate_placement_delay(),
            connected_delay: config.connected_delay(),
            failure_delay: config.failure_delay(),
        }
    }

    /// Auto-clear delay for a message class.
    pub fn delay_for(&self, kind: NotificationKind) -> Duration {
        match kind {
            NotificationKind::DuplicatePlacement => self.duplicate_placement_delay,
            NotificationKind::Connected => self.connected_delay,
            NotificationKind::Failure => self.failure_delay,
        }
    }

    /// Post a message now.
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        self.notify_at(kind, message, Instant::now());
    }

    /// Post a message, replacing the current one and rescheduling the clear.
    pub fn notify_at(&mut self, kind: NotificationKind, message: impl Into<String>, now: Instant) {
        if let Some(task) = self.pending.take() {
            log::trace!("Cancelled clear task #{}", task.seq);
        }

        self.seq += 1;
        let message = message.into();
        log::debug!("Notification #{} ({:?}): {}", self.seq, kind, message);
        self.current = Some(Notification { kind, message });
        self.pending = Some(ClearTask {
            seq: self.seq,
            due: now + self.delay_for(kind),
        });
    }

    /// Run the pending clear if it is due. Returns true if a message was cleared.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(task) if now >= task.due => {
                self.pending = None;
                if task.seq == self.seq && self.current.take().is_some() {
                    log::trace!("Cleared notification #{}", task.seq);
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    /// Poll against the current time.
    pub fn tick(&mut self) -> bool {
        self.poll(Instant::now())
    }

    /// Clear the current message immediately.
    pub fn dismiss(&mut self) {
        self.pending = None;
        self.current = None;
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// When the current message will be cleared, if one is scheduled.
    pub fn expires_at(&self) -> Option<Instant> {
        self.pending.map(|task| task.due)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_by_default() {
        let channel = FeedbackChannel::default();
        assert!(channel.current().is_none());
        assert!(channel.expires_at().is_none());
    }

    #[test]
    fn test_message_clears_after_delay() {
        let mut channel = FeedbackChannel::default();
        let t0 = Instant::now();
        channel.notify_at(NotificationKind::Connected, "Connected", t0);

        assert!(!channel.poll(t0 + Duration::from_millis(1999)));
        assert!(channel.current().is_some());

        assert!(channel.poll(t0 + Duration::from_millis(2000)));
        assert!(channel.current().is_none());
    }

    #[test]
    fn test_delay_depends_on_kind() {
        let channel = FeedbackChannel::default();
        assert_eq!(channel.delay_for(NotificationKind::DuplicatePlacement), Duration::from_secs(3));
        assert_eq!(channel.delay_for(NotificationKind::Connected), Duration::from_secs(2));
    }

    #[test]
    fn test_new_message_cancels_old_timer() {
        let mut channel = FeedbackChannel::default();
        let t0 = Instant::now();
        channel.notify_at(NotificationKind::DuplicatePlacement, "Table Employees already exists", t0);

        // Replaced 2.5s in; the first timer would have fired at 3s.
        let t1 = t0 + Duration::from_millis(2500);
        channel.notify_at(NotificationKind::Connected, "Connected", t1);

        assert!(!channel.poll(t0 + Duration::from_millis(3000)));
        assert_eq!(channel.current().unwrap().message, "Connected");

        assert!(channel.poll(t1 + Duration::from_millis(2000)));
        assert!(channel.current().is_none());
    }

    #[test]
    fn test_replacement_is_not_queued() {
        let mut channel = FeedbackChannel::default();
        let t0 = Instant::now();
        channel.notify_at(NotificationKind::Failure, "first", t0);
        channel.notify_at(NotificationKind::Failure, "second", t0);

        assert_eq!(channel.current().unwrap().message, "second");
        assert!(channel.poll(t0 + Duration::from_secs(3)));
        assert!(channel.current().is_none());
        assert!(!channel.poll(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn test_dismiss() {
        let mut channel = FeedbackChannel::default();
        channel.notify(NotificationKind::Failure, "oops");
        channel.dismiss();
        assert!(channel.current().is_none());
        assert!(!channel.tick());
    }
}
