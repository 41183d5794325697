use std::time::Duration;

/// Input pin polling cadence.
pub(crate) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Settle window before re-sampling a level change.
pub(crate) const DEFAULT_SETTLE_INTERVAL: Duration = Duration::from_millis(30);
/// Held duration at or beyond which a press is Long.
pub(crate) const DEFAULT_LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);

/// Button polling and press-classification settings.
#[derive(Debug, Clone)]
pub struct ButtonConfig {
    /// How often the input level is sampled.
    pub poll_interval: Duration,
    /// How long a level change must hold before it is confirmed.
    pub settle_interval: Duration,
    /// Inclusive boundary between Short and Long presses.
    pub long_press_threshold: Duration,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            settle_interval: DEFAULT_SETTLE_INTERVAL,
            long_press_threshold: DEFAULT_LONG_PRESS_THRESHOLD,
        }
    }
}
