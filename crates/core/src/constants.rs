/// Debounce before the busy overlay becomes visible, in milliseconds
pub const DEFAULT_BUSY_DEBOUNCE_MS: u64 = 250;

/// Upper bound after which a stuck busy signal force-clears, in milliseconds
pub const DEFAULT_BUSY_SAFETY_MS: u64 = 10_000;

/// Quiet window before a notification batch is consolidated, in milliseconds
pub const DEFAULT_NOTIFICATION_FLUSH_WINDOW_MS: u64 = 1_500;
