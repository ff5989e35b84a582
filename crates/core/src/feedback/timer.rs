//! Cancelable one-shot timer handle shared by the feedback services.

use tokio::task::JoinHandle;

/// An armed timer task tagged with the arm sequence it was created under.
///
/// Cancellation aborts the task. A woken callback additionally re-checks its
/// sequence against the currently armed timer under the state lock before
/// acting, so a canceled or superseded timer never acts on newer state.
pub(super) struct Timer {
    pub(super) seq: u64,
    pub(super) task: JoinHandle<()>,
}

impl Timer {
    pub(super) fn cancel(self) {
        self.task.abort();
    }
}
