//! Consolidated status-change notifications.
//!
//! Rapid sequences of same-status bill changes (bulk mark paid/unpaid) are
//! grouped per category and surfaced as one notification once no new change
//! arrives within the flush window, instead of one popup per bill.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::debug;

use crate::bills::BillStatus;

use super::feedback_model::{Notification, NotificationConfig, Severity};
use super::sink::NotificationSink;
use super::timer::Timer;

#[derive(Default)]
struct PendingBatch {
    /// Status the batch is accumulating under; `None` while idle.
    status: Option<BillStatus>,
    /// Category label -> item labels, in insertion order.
    groups: Vec<(String, Vec<String>)>,
    flush_timer: Option<Timer>,
    arm_seq: u64,
}

struct NotifierCore {
    config: NotificationConfig,
    sink: Arc<dyn NotificationSink>,
    state: Mutex<PendingBatch>,
}

/// Aggregates bill status changes into consolidated notifications.
///
/// One instance lives for the whole application; call sites hold clones and
/// report every status change through
/// [`record_status_change`](Self::record_status_change). Recording is
/// synchronous and non-blocking; the flush happens later from a timer task,
/// so the service must be used inside a Tokio runtime.
#[derive(Clone)]
pub struct NotificationService {
    core: Arc<NotifierCore>,
}

impl NotificationService {
    pub fn new(config: NotificationConfig, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            core: Arc::new(NotifierCore {
                config,
                sink,
                state: Mutex::new(PendingBatch::default()),
            }),
        }
    }

    /// Records one bill status change.
    ///
    /// Changes recorded in quick succession under the same status are grouped
    /// by category and flushed as a single notification once no new change
    /// arrives within the flush window. Recording a change under the opposite
    /// status abandons the pending batch and starts a fresh one.
    pub fn record_status_change(&self, category: &str, label: &str, status: BillStatus) {
        self.core.record(category, label, status);
    }
}

impl NotifierCore {
    fn record(self: &Arc<Self>, category: &str, label: &str, status: BillStatus) {
        let mut state = self.state.lock().unwrap();

        if let Some(active) = state.status {
            if active != status {
                let dropped: usize = state.groups.iter().map(|(_, labels)| labels.len()).sum();
                debug!(
                    "notifications: status switched from {} to {}, discarding {} pending change(s)",
                    active, status, dropped
                );
                state.groups.clear();
                if let Some(timer) = state.flush_timer.take() {
                    timer.cancel();
                }
            }
        }
        state.status = Some(status);

        match state.groups.iter_mut().find(|(c, _)| c.as_str() == category) {
            Some((_, labels)) => labels.push(label.to_string()),
            None => state
                .groups
                .push((category.to_string(), vec![label.to_string()])),
        }

        // Trailing debounce: the window restarts on every new change.
        self.arm_flush_timer(&mut state);
    }

    fn arm_flush_timer(self: &Arc<Self>, state: &mut PendingBatch) {
        if let Some(timer) = state.flush_timer.take() {
            timer.cancel();
        }
        state.arm_seq += 1;
        let seq = state.arm_seq;
        let core = Arc::downgrade(self);
        let delay = Duration::from_millis(self.config.flush_window_ms);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(core) = core.upgrade() {
                core.flush(seq);
            }
        });
        state.flush_timer = Some(Timer { seq, task });
    }

    fn flush(&self, seq: u64) {
        let notification = {
            let mut state = self.state.lock().unwrap();
            // A canceled or superseded timer must not flush newer state.
            match state.flush_timer.as_ref() {
                Some(timer) if timer.seq == seq => {}
                _ => return,
            }
            state.flush_timer = None;

            let status = match state.status.take() {
                Some(status) => status,
                None => return,
            };
            let groups = std::mem::take(&mut state.groups);
            if groups.is_empty() {
                return;
            }

            let body = groups
                .iter()
                .map(|(category, labels)| format!("{}: {}", category, labels.join(", ")))
                .collect::<Vec<_>>()
                .join("\n");
            let title = match status {
                BillStatus::Paid => "Marked as paid",
                BillStatus::Unpaid => "Marked as unpaid",
            };
            debug!(
                "notifications: flushing {} change(s) across {} categorie(s)",
                groups.iter().map(|(_, labels)| labels.len()).sum::<usize>(),
                groups.len()
            );
            Notification::new(title, body, Severity::Success)
        };
        self.sink.notify(notification);
    }
}

impl Drop for NotifierCore {
    fn drop(&mut self) {
        if let Ok(state) = self.state.get_mut() {
            if let Some(timer) = state.flush_timer.take() {
                timer.cancel();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bills::BillKind;
    use crate::feedback::sink::MockNotificationSink;

    const FLUSH_WINDOW_MS: u64 = 1_500;

    fn make_service() -> (NotificationService, Arc<MockNotificationSink>) {
        let sink = Arc::new(MockNotificationSink::new());
        let config = NotificationConfig {
            flush_window_ms: FLUSH_WINDOW_MS,
        };
        (NotificationService::new(config, sink.clone()), sink)
    }

    async fn advance(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_consolidates_into_one_notification() {
        let (service, sink) = make_service();

        service.record_status_change("Water", "A1", BillStatus::Paid);
        advance(200).await;
        service.record_status_change("Gas", "B1", BillStatus::Paid);
        advance(200).await;
        service.record_status_change("Water", "A2", BillStatus::Paid);

        // The window restarts on every event; nothing flushes before the
        // last event's quiet period elapses.
        advance(FLUSH_WINDOW_MS - 1).await;
        assert!(sink.is_empty());

        advance(2).await;
        let notifications = sink.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Marked as paid");
        assert_eq!(notifications[0].body, "Water: A1, A2\nGas: B1");
        assert_eq!(notifications[0].severity, Severity::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_window_resets_on_each_event() {
        let (service, sink) = make_service();

        service.record_status_change("Energy", "March", BillStatus::Unpaid);
        advance(1_000).await;
        service.record_status_change("Energy", "April", BillStatus::Unpaid);

        // The first event's window would have expired by now.
        advance(1_000).await;
        assert!(sink.is_empty());

        advance(501).await;
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.notifications()[0].body, "Energy: March, April");
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_switch_discards_pending_batch() {
        let (service, sink) = make_service();

        service.record_status_change("Water", "A1", BillStatus::Paid);
        advance(200).await;
        service.record_status_change("Water", "A2", BillStatus::Paid);
        advance(200).await;
        service.record_status_change("Gas", "B1", BillStatus::Unpaid);

        advance(FLUSH_WINDOW_MS * 2).await;
        let notifications = sink.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].title, "Marked as unpaid");
        assert_eq!(notifications[0].body, "Gas: B1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unpaid_title() {
        let (service, sink) = make_service();

        service.record_status_change("Internet", "May", BillStatus::Unpaid);
        advance(FLUSH_WINDOW_MS + 1).await;

        assert_eq!(sink.notifications()[0].title, "Marked as unpaid");
        assert_eq!(sink.notifications()[0].body, "Internet: May");
    }

    #[tokio::test(start_paused = true)]
    async fn test_categories_keep_insertion_order() {
        let (service, sink) = make_service();

        service.record_status_change(BillKind::Internet.label(), "I1", BillStatus::Paid);
        service.record_status_change(BillKind::Water.label(), "W1", BillStatus::Paid);
        service.record_status_change(BillKind::Gas.label(), "G1", BillStatus::Paid);
        service.record_status_change(BillKind::Internet.label(), "I2", BillStatus::Paid);

        advance(FLUSH_WINDOW_MS + 1).await;
        assert_eq!(
            sink.notifications()[0].body,
            "Internet: I1, I2\nWater: W1\nGas: G1"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_after_flush_starts_fresh_batch() {
        let (service, sink) = make_service();

        service.record_status_change("Water", "A1", BillStatus::Paid);
        advance(FLUSH_WINDOW_MS + 1).await;
        assert_eq!(sink.len(), 1);

        service.record_status_change("Gas", "B1", BillStatus::Paid);
        advance(FLUSH_WINDOW_MS + 1).await;

        let notifications = sink.notifications();
        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[1].body, "Gas: B1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_flush() {
        let (service, sink) = make_service();

        service.record_status_change("Water", "A1", BillStatus::Paid);
        drop(service);

        advance(FLUSH_WINDOW_MS * 2).await;
        assert!(sink.is_empty());
    }
}
