//! Shared recording state machine: Idle / Recording / Paused.

use crate::{PressEvent, PressKind};

use std::{
    sync::atomic::{AtomicBool, AtomicU64, Ordering},
    time::{Duration, Instant},
};

use fieldrec_core::SessionControl;
use tracing::info;
use uuid::Uuid;

/// Process-wide recording state, driven only by classified press events.
///
/// Each field is an independent atomic written exclusively by the
/// classifier task; the presenter, capture writer, and arbiter read them
/// lock-free. No query depends on observing two fields as one snapshot,
/// so plain atomic loads are sufficient.
pub struct RecorderState {
    /// True while a session is active (recording or paused).
    recording: AtomicBool,
    /// True only while an active session is paused.
    paused: AtomicBool,
    /// Session start in milliseconds since `epoch`.
    started_at_ms: AtomicU64,
    epoch: Instant,
}

impl RecorderState {
    /// Create the state machine in Idle.
    pub fn new() -> Self {
        Self {
            recording: AtomicBool::new(false),
            paused: AtomicBool::new(false),
            started_at_ms: AtomicU64::new(0),
            epoch: Instant::now(),
        }
    }

    /// Apply a classified press event.
    ///
    /// Transitions: Idle --Long--> Recording, Recording/Paused --Long-->
    /// Idle, Recording --Short--> Paused, Paused --Short--> Recording.
    /// Anything else (a short press while idle) is a no-op. Pausing never
    /// touches the session start, so resuming keeps the original timer.
    pub fn apply(&self, event: PressEvent) {
        match event.kind {
            PressKind::Long => {
                if self.recording.load(Ordering::Acquire) {
                    self.recording.store(false, Ordering::Release);
                    self.paused.store(false, Ordering::Release);
                    info!(held_ms = event.held.as_millis(), "Recording stopped");
                } else {
                    let session_id = Uuid::new_v4();
                    self.paused.store(false, Ordering::Release);
                    self.started_at_ms
                        .store(self.epoch.elapsed().as_millis() as u64, Ordering::Release);
                    self.recording.store(true, Ordering::Release);
                    info!(session_id = %session_id, "Recording started");
                }
            }
            PressKind::Short => {
                if self.recording.load(Ordering::Acquire) {
                    let now_paused = !self.paused.load(Ordering::Acquire);
                    self.paused.store(now_paused, Ordering::Release);
                    info!(paused = now_paused, "Pause toggled");
                }
            }
        }
    }

    /// True while a session is active (recording or paused).
    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Acquire)
    }

    /// True while the active session is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Time since the current session started.
    ///
    /// Only meaningful while a session is active; pausing does not stop
    /// the clock.
    pub fn elapsed(&self) -> Duration {
        let started = Duration::from_millis(self.started_at_ms.load(Ordering::Acquire));
        self.epoch.elapsed().saturating_sub(started)
    }

    pub(crate) fn session_start_ms(&self) -> u64 {
        self.started_at_ms.load(Ordering::Acquire)
    }
}

impl Default for RecorderState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionControl for RecorderState {
    fn is_recording(&self) -> bool {
        RecorderState::is_recording(self)
    }

    fn is_paused(&self) -> bool {
        RecorderState::is_paused(self)
    }
}
