//! Debounced, reference-counted busy indicator.
//!
//! Any number of overlapping asynchronous operations share one busy signal:
//! the overlay appears only when an operation outlives the debounce window,
//! and a safety timeout force-clears the signal if a caller never releases.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, warn};

use super::feedback_model::{BusyConfig, BusyUpdate};
use super::sink::BusyStateSink;
use super::timer::Timer;

#[derive(Default)]
struct BusyState {
    active_count: u64,
    visible: bool,
    message: Option<String>,
    show_timer: Option<Timer>,
    safety_timer: Option<Timer>,
    /// Monotonic arm counter shared by both timer roles.
    arm_seq: u64,
}

struct BusyCore {
    config: BusyConfig,
    sink: Arc<dyn BusyStateSink>,
    state: Mutex<BusyState>,
}

/// Reference-counted, debounced busy signal for the UI.
///
/// One instance lives for the whole application; call sites hold clones and
/// bracket their asynchronous operations with [`acquire`](Self::acquire) /
/// [`release`](Self::release). All operations are synchronous and
/// non-blocking; the visible effects happen later from timer tasks, so the
/// service must be used inside a Tokio runtime.
///
/// Unbalanced call sequences are tolerated: the count never goes negative,
/// and the safety timeout guarantees the overlay clears within
/// `safety_ms` of the last tracked activity even if a caller never releases.
#[derive(Clone)]
pub struct BusyStateService {
    core: Arc<BusyCore>,
}

impl BusyStateService {
    pub fn new(config: BusyConfig, sink: Arc<dyn BusyStateSink>) -> Self {
        Self {
            core: Arc::new(BusyCore {
                config,
                sink,
                state: Mutex::new(BusyState::default()),
            }),
        }
    }

    /// Marks one more operation as in flight.
    ///
    /// The first acquisition arms the debounced show; further acquisitions
    /// extend the safety window. A supplied message replaces the stored one
    /// (last writer wins).
    pub fn acquire(&self, message: Option<&str>) {
        if let Some(update) = self.core.acquire(message) {
            self.core.sink.busy_changed(update);
        }
    }

    /// Marks one operation as finished.
    ///
    /// Hides the overlay when the last operation releases. A release without
    /// a matching acquire is logged and otherwise ignored.
    pub fn release(&self) {
        if let Some(update) = self.core.release() {
            self.core.sink.busy_changed(update);
        }
    }

    /// Sugar for [`acquire`](Self::acquire) / [`release`](Self::release)
    /// driven by a boolean.
    pub fn set_busy(&self, active: bool, message: Option<&str>) {
        if active {
            self.acquire(message);
        } else {
            self.release();
        }
    }

    /// Force-clears all busy state and timers, regardless of current state.
    pub fn reset(&self) {
        if let Some(update) = self.core.reset() {
            self.core.sink.busy_changed(update);
        }
    }

    /// Acquires and returns a guard that releases when dropped.
    pub fn guard(&self, message: Option<&str>) -> BusyGuard {
        self.acquire(message);
        BusyGuard {
            service: self.clone(),
        }
    }

    /// Whether the busy overlay is currently surfaced.
    pub fn is_busy(&self) -> bool {
        self.core.state.lock().unwrap().visible
    }

    /// The message associated with the current busy signal, if any.
    pub fn current_message(&self) -> Option<String> {
        self.core.state.lock().unwrap().message.clone()
    }

    /// Number of operations currently tracked as in flight.
    pub fn active_count(&self) -> u64 {
        self.core.state.lock().unwrap().active_count
    }
}

impl BusyCore {
    fn acquire(self: &Arc<Self>, message: Option<&str>) -> Option<BusyUpdate> {
        let mut state = self.state.lock().unwrap();
        state.active_count += 1;

        let message_changed = match message {
            Some(message) => {
                let changed = state.message.as_deref() != Some(message);
                state.message = Some(message.to_string());
                changed
            }
            None => false,
        };

        if state.active_count == 1 {
            debug!("busy: first acquisition, arming show timer");
            self.arm_show_timer(&mut state);
            return None;
        }

        // Renewed activity while already counting extends the safety window.
        self.arm_safety_timer(&mut state);

        if state.visible && message_changed {
            Some(BusyUpdate {
                visible: true,
                message: state.message.clone(),
            })
        } else {
            None
        }
    }

    fn release(&self) -> Option<BusyUpdate> {
        let mut state = self.state.lock().unwrap();
        if state.active_count == 0 {
            warn!("busy: release without matching acquire, ignoring");
            return None;
        }
        state.active_count -= 1;
        if state.active_count > 0 {
            return None;
        }

        // Last operation released.
        if let Some(timer) = state.show_timer.take() {
            // Finished inside the debounce window; the UI never saw it.
            timer.cancel();
            if let Some(timer) = state.safety_timer.take() {
                timer.cancel();
            }
            state.message = None;
            debug!("busy: released within debounce window, nothing surfaced");
            return None;
        }

        if let Some(timer) = state.safety_timer.take() {
            timer.cancel();
        }
        if state.visible {
            state.visible = false;
            state.message = None;
            debug!("busy: last operation released, hiding overlay");
            Some(BusyUpdate {
                visible: false,
                message: None,
            })
        } else {
            None
        }
    }

    fn reset(&self) -> Option<BusyUpdate> {
        let mut state = self.state.lock().unwrap();
        Self::clear(&mut state)
    }

    /// Cancels all timers and returns to idle; the hide update to emit, if
    /// the overlay was visible.
    fn clear(state: &mut BusyState) -> Option<BusyUpdate> {
        if let Some(timer) = state.show_timer.take() {
            timer.cancel();
        }
        if let Some(timer) = state.safety_timer.take() {
            timer.cancel();
        }
        state.active_count = 0;
        state.message = None;
        if state.visible {
            state.visible = false;
            Some(BusyUpdate {
                visible: false,
                message: None,
            })
        } else {
            None
        }
    }

    fn arm_show_timer(self: &Arc<Self>, state: &mut BusyState) {
        if let Some(timer) = state.show_timer.take() {
            timer.cancel();
        }
        state.arm_seq += 1;
        let seq = state.arm_seq;
        let core = Arc::downgrade(self);
        let delay = Duration::from_millis(self.config.debounce_ms);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(core) = core.upgrade() {
                if let Some(update) = core.on_show_timer(seq) {
                    core.sink.busy_changed(update);
                }
            }
        });
        state.show_timer = Some(Timer { seq, task });
    }

    fn arm_safety_timer(self: &Arc<Self>, state: &mut BusyState) {
        if let Some(timer) = state.safety_timer.take() {
            timer.cancel();
        }
        state.arm_seq += 1;
        let seq = state.arm_seq;
        let core = Arc::downgrade(self);
        let delay = Duration::from_millis(self.config.safety_ms);
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(core) = core.upgrade() {
                if let Some(update) = core.on_safety_timer(seq) {
                    core.sink.busy_changed(update);
                }
            }
        });
        state.safety_timer = Some(Timer { seq, task });
    }

    fn on_show_timer(self: &Arc<Self>, seq: u64) -> Option<BusyUpdate> {
        let mut state = self.state.lock().unwrap();
        // A canceled or superseded timer must not act on newer state.
        match state.show_timer.as_ref() {
            Some(timer) if timer.seq == seq => {}
            _ => return None,
        }
        state.show_timer = None;
        if state.active_count == 0 {
            return None;
        }
        state.visible = true;
        debug!("busy: debounce elapsed, showing overlay");
        self.arm_safety_timer(&mut state);
        Some(BusyUpdate {
            visible: true,
            message: state.message.clone(),
        })
    }

    fn on_safety_timer(self: &Arc<Self>, seq: u64) -> Option<BusyUpdate> {
        let mut state = self.state.lock().unwrap();
        match state.safety_timer.as_ref() {
            Some(timer) if timer.seq == seq => {}
            _ => return None,
        }
        state.safety_timer = None;
        warn!(
            "busy: safety timeout reached with {} operation(s) still tracked, force-clearing",
            state.active_count
        );
        Self::clear(&mut state)
    }
}

impl Drop for BusyCore {
    fn drop(&mut self) {
        if let Ok(state) = self.state.get_mut() {
            if let Some(timer) = state.show_timer.take() {
                timer.cancel();
            }
            if let Some(timer) = state.safety_timer.take() {
                timer.cancel();
            }
        }
    }
}

/// Releases its acquisition when dropped.
///
/// Obtained from [`BusyStateService::guard`]; keeps the busy signal balanced
/// even when the owning operation unwinds early. The safety timeout remains
/// the backstop for callers that leak the guard.
pub struct BusyGuard {
    service: BusyStateService,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.service.release();
    }
}
