//! Presentation sink traits and implementations.

use std::sync::{Arc, Mutex};

use super::{BusyUpdate, Notification};

/// Trait for receiving busy overlay updates.
///
/// Implementations translate updates into platform-specific rendering.
/// The feedback services emit through this trait from timer callbacks.
///
/// # Design Rules
///
/// - `busy_changed()` must be fast and non-blocking (no network calls, no DB writes)
/// - Implementations should queue rendering for async processing
/// - Failure to render must not affect the coordinator (best-effort)
pub trait BusyStateSink: Send + Sync {
    /// Called when the overlay should appear, change its message, or disappear.
    fn busy_changed(&self, update: BusyUpdate);
}

/// Trait for receiving consolidated notifications.
///
/// Same contract as [`BusyStateSink`]: fast, non-blocking, best-effort.
pub trait NotificationSink: Send + Sync {
    /// Surface a single notification to the user.
    fn notify(&self, notification: Notification);
}

/// No-op implementation for tests or contexts without a busy overlay.
#[derive(Clone, Default)]
pub struct NoOpBusyStateSink;

impl BusyStateSink for NoOpBusyStateSink {
    fn busy_changed(&self, _update: BusyUpdate) {
        // Intentionally empty - updates are discarded
    }
}

/// No-op implementation for tests or contexts without notifications.
#[derive(Clone, Default)]
pub struct NoOpNotificationSink;

impl NotificationSink for NoOpNotificationSink {
    fn notify(&self, _notification: Notification) {
        // Intentionally empty - notifications are discarded
    }
}

/// Mock sink for testing - collects emitted busy updates.
#[derive(Clone, Default)]
pub struct MockBusyStateSink {
    updates: Arc<Mutex<Vec<BusyUpdate>>>,
}

impl MockBusyStateSink {
    pub fn new() -> Self {
        Self {
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected updates.
    pub fn updates(&self) -> Vec<BusyUpdate> {
        self.updates.lock().unwrap().clone()
    }

    /// Clears collected updates.
    pub fn clear(&self) {
        self.updates.lock().unwrap().clear();
    }

    /// Returns the number of collected updates.
    pub fn len(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    /// Returns true if no updates have been collected.
    pub fn is_empty(&self) -> bool {
        self.updates.lock().unwrap().is_empty()
    }
}

impl BusyStateSink for MockBusyStateSink {
    fn busy_changed(&self, update: BusyUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

/// Mock sink for testing - collects emitted notifications.
#[derive(Clone, Default)]
pub struct MockNotificationSink {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MockNotificationSink {
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all collected notifications.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    /// Clears collected notifications.
    pub fn clear(&self) {
        self.notifications.lock().unwrap().clear();
    }

    /// Returns the number of collected notifications.
    pub fn len(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    /// Returns true if no notifications have been collected.
    pub fn is_empty(&self) -> bool {
        self.notifications.lock().unwrap().is_empty()
    }
}

impl NotificationSink for MockNotificationSink {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}
