//! Payload and configuration types for UI feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    DEFAULT_BUSY_DEBOUNCE_MS, DEFAULT_BUSY_SAFETY_MS, DEFAULT_NOTIFICATION_FLUSH_WINDOW_MS,
};

/// Snapshot of the busy overlay state pushed to the presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyUpdate {
    pub visible: bool,
    pub message: Option<String>,
}

/// Severity of a surfaced notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// A consolidated notification surfaced to the user.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Creates a notification with a fresh id and timestamp.
    pub fn new(title: impl Into<String>, body: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
            severity,
            created_at: Utc::now(),
        }
    }
}

/// Timing configuration for the busy indicator, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusyConfig {
    /// Operations shorter than this never surface the overlay.
    pub debounce_ms: u64,
    /// How long the overlay may stay up without renewed activity before it
    /// force-clears.
    pub safety_ms: u64,
}

impl Default for BusyConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_BUSY_DEBOUNCE_MS,
            safety_ms: DEFAULT_BUSY_SAFETY_MS,
        }
    }
}

/// Timing configuration for notification batching, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationConfig {
    /// A batch flushes once no new status change arrives within this window.
    pub flush_window_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            flush_window_ms: DEFAULT_NOTIFICATION_FLUSH_WINDOW_MS,
        }
    }
}
