//! Periodic status rendering.
//!
//! Once per second, shows either the elapsed-time/Recording-or-Paused pair
//! while a session is active, or the current idle lines otherwise. Pure
//! consumer of [`RecorderState`]; holds no state of its own beyond the
//! cadence tick.

use crate::recorder_state::RecorderState;

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{Mutex, watch},
    time::sleep,
};
use tracing::{info, instrument};

/// Render cadence of the status display.
const RENDER_INTERVAL: Duration = Duration::from_secs(1);

/// Display collaborator: renders a short multi-line text block.
pub trait DisplayPanel: Send {
    /// Show the given text, replacing whatever was on screen.
    fn show(&mut self, text: &str);
}

/// The two text lines shown while not recording.
///
/// Overwritten by the arbiter after each completed session; defaults to a
/// ready-state message.
#[derive(Debug, Clone)]
pub struct IdleLines {
    /// First display line.
    pub line1: String,
    /// Second display line.
    pub line2: String,
}

impl IdleLines {
    /// Render as a display text block.
    pub fn render(&self) -> String {
        format!("{}\n{}", self.line1, self.line2)
    }
}

impl Default for IdleLines {
    fn default() -> Self {
        Self {
            line1: "Ready".to_string(),
            line2: String::new(),
        }
    }
}

/// Format elapsed time as `HH:MM:SS`.
pub(crate) fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Status presenter task.
pub struct StatusPresenter<D> {
    display: D,
    state: Arc<RecorderState>,
    idle_lines: Arc<Mutex<IdleLines>>,
}

impl<D: DisplayPanel> StatusPresenter<D> {
    /// Create a presenter over the given display collaborator.
    pub fn new(display: D, state: Arc<RecorderState>, idle_lines: Arc<Mutex<IdleLines>>) -> Self {
        Self {
            display,
            state,
            idle_lines,
        }
    }

    /// Render the status line for the current instant.
    async fn render_tick(&mut self) {
        if self.state.is_recording() {
            let line2 = if self.state.is_paused() {
                "Paused"
            } else {
                "Recording"
            };
            let text = format!("{}\n{}", format_elapsed(self.state.elapsed()), line2);
            self.display.show(&text);
        } else {
            let text = self.idle_lines.lock().await.render();
            self.display.show(&text);
        }
    }

    /// Run the render loop until a shutdown signal is received.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Status presenter shutting down");
                    break;
                }
                _ = sleep(RENDER_INTERVAL) => {
                    self.render_tick().await;
                }
            }
        }
    }
}
