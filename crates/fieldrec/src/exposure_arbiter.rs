//! Exposure arbiter: host-exposure vs. local-capture sequencing.
//!
//! The storage medium has exactly one owner at any instant. Host exposure
//! is the resting state; each capture cycle is a strict two-phase handoff:
//! fully stop host exposure, take local ownership for one session, then
//! restore exposure regardless of the session's outcome. A failed stop
//! leaves ownership with the host and the session does not run.

use crate::{
    AppError, AppResult,
    config::{CaptureConfig, StorageConfig},
    recorder_state::RecorderState,
    status_presenter::IdleLines,
};

use std::{panic::Location, sync::Arc, time::Duration};

use error_location::ErrorLocation;
use fieldrec_core::{CaptureReport, DurationPolicy, Microphone, capture_to_path};
use tokio::{
    sync::{Mutex, watch},
    time::sleep,
};
use tracing::{error, info, instrument, warn};

/// Cadence of the wait-for-recording poll between cycles.
const CYCLE_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Back-off before retrying a failed cycle.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Which party currently owns the storage device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOwnership {
    /// The medium is exposed to the host computer.
    HostExposed,
    /// The device holds the medium for local capture.
    LocalOwned,
}

/// Mount-point selection for the storage collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountPoint {
    /// Route the medium to the host-exposure driver.
    Host,
    /// Route the medium to the local filesystem.
    Local,
}

/// Storage-mount collaborator.
///
/// Wraps the mass-storage driver lifecycle and the mount-point switch;
/// every operation is fallible and must complete before the arbiter
/// proceeds to the next phase of a handoff.
pub trait MountControl: Send {
    /// Route the medium to the given mount point.
    fn switch_mount(&mut self, target: MountPoint) -> AppResult<()>;

    /// Start exposing the medium to the host.
    fn start_host_exposure(&mut self) -> AppResult<()>;

    /// Stop exposing the medium to the host, releasing it completely.
    fn stop_host_exposure(&mut self) -> AppResult<()>;
}

/// Sequences mount ownership around each capture session.
pub struct ExposureArbiter<M: MountControl> {
    mount: M,
    microphone: Option<Box<dyn Microphone>>,
    state: Arc<RecorderState>,
    idle_lines: Arc<Mutex<IdleLines>>,
    capture: CaptureConfig,
    storage: StorageConfig,
    ownership: MountOwnership,
    file_index: u32,
}

impl<M: MountControl> ExposureArbiter<M> {
    /// Create an arbiter; ownership starts with the host once
    /// [`ExposureArbiter::run`] has established the resting state.
    pub fn new(
        mount: M,
        microphone: Box<dyn Microphone>,
        state: Arc<RecorderState>,
        idle_lines: Arc<Mutex<IdleLines>>,
        capture: CaptureConfig,
        storage: StorageConfig,
    ) -> Self {
        Self {
            mount,
            microphone: Some(microphone),
            state,
            idle_lines,
            capture,
            storage,
            ownership: MountOwnership::HostExposed,
            file_index: 1,
        }
    }

    pub(crate) fn ownership(&self) -> MountOwnership {
        self.ownership
    }

    /// Run the arbiter loop until a shutdown signal is received.
    ///
    /// Establishes host exposure as the resting state first; a failure
    /// there is fatal since the device would start with an unowned medium.
    #[instrument(skip(self, shutdown_rx))]
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        self.mount.start_host_exposure()?;
        self.mount.switch_mount(MountPoint::Host)?;
        self.ownership = MountOwnership::HostExposed;
        info!("Storage exposed to host");

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Exposure arbiter shutting down");
                    break;
                }
                _ = sleep(CYCLE_POLL_INTERVAL) => {
                    if !self.state.is_recording() {
                        continue;
                    }
                    if let Err(e) = self.run_cycle().await {
                        error!(error = ?e, "Capture cycle failed, will retry");
                        sleep(RETRY_BACKOFF).await;
                    }
                }
            }
        }

        Ok(())
    }

    /// One full capture cycle: claim the medium, run a session, restore
    /// exposure, publish the summary.
    pub(crate) async fn run_cycle(&mut self) -> AppResult<()> {
        // Phase one: the host must fully relinquish the medium before any
        // local open. On failure ownership stays with the host and the
        // session does not run.
        self.mount.stop_host_exposure()?;

        if let Err(e) = self.mount.switch_mount(MountPoint::Local) {
            self.restore_exposure();
            return Err(e);
        }
        self.ownership = MountOwnership::LocalOwned;
        info!("Storage claimed for local capture");

        let path = self
            .storage
            .mount_dir
            .join(format!("{}_{:04}.wav", self.storage.file_prefix, self.file_index));
        let policy = DurationPolicy::from_secs(self.capture.duration_secs);
        let state = Arc::clone(&self.state);

        let microphone = match self.microphone.take() {
            Some(m) => m,
            None => {
                // Lost to a previous panicked capture task.
                self.restore_exposure();
                return Err(AppError::CaptureTaskFailed {
                    message: "Microphone unavailable".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        // The writer blocks on acquisition and file I/O; it gets its own
        // thread and observes the state machine cooperatively.
        let joined = tokio::task::spawn_blocking(move || {
            let mut microphone = microphone;
            let outcome = microphone
                .open()
                .and_then(|mut source| capture_to_path(source.as_mut(), state.as_ref(), &path, policy));
            (microphone, outcome)
        })
        .await;

        let outcome = match joined {
            Ok((microphone, outcome)) => {
                self.microphone = Some(microphone);
                outcome
            }
            Err(e) => {
                self.restore_exposure();
                return Err(AppError::CaptureTaskFailed {
                    message: format!("Capture task panicked: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        // Phase two: exposure is restored regardless of the writer outcome.
        self.restore_exposure();

        match outcome {
            Ok(report) => {
                self.file_index += 1;
                self.publish_summary(&report).await;
                Ok(())
            }
            Err(e) => Err(AppError::from(e)),
        }
    }

    /// Hand the medium back to the host: mount switch first, then driver.
    fn restore_exposure(&mut self) {
        if let Err(e) = self.mount.switch_mount(MountPoint::Host) {
            warn!(error = ?e, "Failed to switch mount back to host");
        }
        if let Err(e) = self.mount.start_host_exposure() {
            warn!(error = ?e, "Failed to restart host exposure");
        }
        self.ownership = MountOwnership::HostExposed;
        info!("Storage exposed to host");
    }

    /// Forward a human-readable session summary to the idle display.
    async fn publish_summary(&self, report: &CaptureReport) {
        let filename = report
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| report.path.display().to_string());

        let mut lines = self.idle_lines.lock().await;
        lines.line1 = format!("Recorded {}s at", report.seconds);
        lines.line2 = filename;
    }
}
