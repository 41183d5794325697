//! Debounced button input classifier.
//!
//! Polls a binary input on a fixed cadence, filters electrical bounce with
//! a settle-and-resample window, and classifies completed presses as short
//! or long by held duration. Confirmed events are applied directly to the
//! shared [`RecorderState`]; every confirmed release also fires a feedback
//! pulse regardless of classification.

use crate::{PressEvent, PressKind, config::ButtonConfig, recorder_state::RecorderState};

use std::sync::Arc;

use tokio::{
    sync::watch,
    time::{Instant, sleep},
};
use tracing::{debug, info, instrument};

/// Binary input level collaborator.
///
/// Pull-up convention: `true` = released, `false` = pressed.
pub trait InputPin: Send {
    /// Sample the current logic level.
    fn level(&mut self) -> bool;
}

/// Feedback collaborator: one short fixed-duration pulse per confirmed
/// release, as confirmation the input was captured.
pub trait Buzzer: Send {
    /// Emit the pulse. Must be quick; called from the polling task.
    fn pulse(&mut self);
}

/// Classify a held duration against the long-press threshold.
///
/// The boundary is inclusive: held exactly at the threshold is Long.
pub(crate) fn classify(held: std::time::Duration, threshold: std::time::Duration) -> PressKind {
    if held >= threshold {
        PressKind::Long
    } else {
        PressKind::Short
    }
}

/// Debounced input classifier task.
pub struct ButtonClassifier<P, B> {
    pin: P,
    buzzer: B,
    state: Arc<RecorderState>,
    config: ButtonConfig,
}

impl<P: InputPin, B: Buzzer> ButtonClassifier<P, B> {
    /// Create a classifier over the given pin and feedback collaborators.
    pub fn new(pin: P, buzzer: B, state: Arc<RecorderState>, config: ButtonConfig) -> Self {
        Self {
            pin,
            buzzer,
            state,
            config,
        }
    }

    /// Run the polling loop until a shutdown signal is received.
    ///
    /// This task performs no blocking I/O; capture latency never affects
    /// button responsiveness because the capture writer runs elsewhere.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        // Released is the resting level under the pull-up.
        let mut last_level = true;
        let mut press_started_at = Instant::now();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Button classifier shutting down");
                    break;
                }
                _ = sleep(self.config.poll_interval) => {
                    let observed = self.pin.level();
                    if observed == last_level {
                        continue;
                    }

                    // Settle window: trade a small fixed latency for bounce
                    // rejection. A re-sample that reverts is discarded with
                    // no event and no feedback pulse.
                    sleep(self.config.settle_interval).await;
                    let settled = self.pin.level();
                    if settled == last_level {
                        debug!("Level change reverted during settle window, discarded");
                        continue;
                    }

                    last_level = settled;
                    if !settled {
                        // Falling edge: press confirmed.
                        press_started_at = Instant::now();
                    } else {
                        // Rising edge: release confirmed, classify and apply.
                        let held = press_started_at.elapsed();
                        let kind = classify(held, self.config.long_press_threshold);
                        debug!(held_ms = held.as_millis(), ?kind, "Press classified");
                        self.state.apply(PressEvent { kind, held });
                        // Pulse on every confirmed release, regardless of
                        // classification or resulting transition.
                        self.buzzer.pulse();
                    }
                }
            }
        }
    }
}
