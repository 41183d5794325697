//! Streaming capture writer.
//!
//! Acquires fixed-size sample chunks from an [`AudioSource`], persists them
//! chunk by chunk, and keeps the on-storage WAV header accurate at every
//! flush boundary so an interrupted session still leaves a playable file.
//! Runs in a blocking context (`tokio::task::spawn_blocking` upstream);
//! the only cooperation points are the [`SessionControl`] queries polled
//! once per chunk.

use crate::{
    CaptureError, CoreResult,
    capture::{AudioSource, DurationPolicy, SessionControl},
    storage::StorageSink,
    wav::{self, WavSpec},
};

use std::{
    fs::File,
    panic::Location,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use error_location::ErrorLocation;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Fixed capture sample rate.
pub const SAMPLE_RATE_HZ: u32 = 16_000;
/// Fixed capture bit depth.
pub const BITS_PER_SAMPLE: u16 = 32;
/// Mono capture only.
pub const CHANNELS: u16 = 1;
/// Byte width of one sample at [`BITS_PER_SAMPLE`].
pub const BYTES_PER_SAMPLE: usize = 4;
/// Samples acquired per loop iteration.
pub const SAMPLES_PER_CHUNK: usize = 512;
/// Captured audio between in-place header rewrites.
const FLUSH_INTERVAL_MS: u64 = 1_000;
/// Upper bound on a single acquisition read.
const READ_TIMEOUT: Duration = Duration::from_secs(1);
/// Cadence of the wait-for-recording poll before acquisition starts.
const START_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Outcome of a completed capture session.
#[derive(Debug)]
pub struct CaptureReport {
    /// Whole seconds of audio captured (floored).
    pub seconds: u32,
    /// Audio payload bytes written (excluding any header).
    pub bytes_written: u64,
    /// Destination the session wrote to.
    pub path: PathBuf,
    /// Session ID for log correlation.
    pub session_id: Uuid,
}

fn capture_spec() -> WavSpec {
    WavSpec {
        sample_rate: SAMPLE_RATE_HZ,
        bits_per_sample: BITS_PER_SAMPLE,
        channels: CHANNELS,
    }
}

/// Run one capture session against a destination path.
///
/// Waits until `control` reports recording active, then opens `path` and
/// streams chunks into it until the duration policy is satisfied or the
/// recording query goes false. A `.wav` destination gets a provisional
/// header that is rewritten at each flush boundary and finalized on exit;
/// any other name is written as headerless raw samples.
///
/// # Errors
///
/// Fails before the file is created if the chunk buffer cannot be
/// allocated, and before acquisition if the destination cannot be opened.
/// A mid-session acquisition or storage failure finalizes the bytes
/// captured so far into a valid file and then returns that error.
#[track_caller]
#[instrument(skip(source, control))]
pub fn capture_to_path(
    source: &mut dyn AudioSource,
    control: &dyn SessionControl,
    path: &Path,
    policy: DurationPolicy,
) -> CoreResult<CaptureReport> {
    let session_id = Uuid::new_v4();

    // Allocate before touching storage so exhaustion leaves no file behind.
    let chunk_bytes = SAMPLES_PER_CHUNK * BYTES_PER_SAMPLE;
    let mut chunk: Vec<u8> = Vec::new();
    chunk
        .try_reserve_exact(chunk_bytes)
        .map_err(|_| CaptureError::ChunkBufferAlloc {
            bytes: chunk_bytes,
            location: ErrorLocation::from(Location::caller()),
        })?;
    chunk.resize(chunk_bytes, 0);

    info!(session_id = %session_id, path = ?path, "Waiting for recording to go active");
    while !control.is_recording() {
        thread::sleep(START_POLL_INTERVAL);
    }

    let started_at = Instant::now();
    let mut file = File::create(path).map_err(|e| CaptureError::DestinationUnavailable {
        path: path.to_path_buf(),
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })?;

    let wav_mode = wav::has_wav_extension(path);
    info!(session_id = %session_id, wav_mode, ?policy, "Capture session started");

    let result = run_session(source, control, &mut file, &mut chunk, wav_mode, policy);

    // The acquisition channel and file handle are released here regardless
    // of outcome; the header was already finalized inside run_session.
    drop(file);

    let captured_samples = result?;
    let seconds = (captured_samples / u64::from(SAMPLE_RATE_HZ)) as u32;
    let bytes_written = captured_samples * BYTES_PER_SAMPLE as u64;

    info!(
        session_id = %session_id,
        seconds,
        bytes_written,
        duration_ms = started_at.elapsed().as_millis(),
        "Capture session finished"
    );

    Ok(CaptureReport {
        seconds,
        bytes_written,
        path: path.to_path_buf(),
        session_id,
    })
}

/// Core acquisition-to-storage loop, generic over the destination.
///
/// Returns the total number of samples captured. In WAV mode the header is
/// rewritten in place and made durable every [`FLUSH_INTERVAL_MS`] of
/// captured audio and once more on exit, including the exits taken when an
/// acquisition read or a storage append fails; headerless mode skips all
/// header work.
pub fn run_session<S: StorageSink>(
    source: &mut dyn AudioSource,
    control: &dyn SessionControl,
    sink: &mut S,
    chunk: &mut [u8],
    wav_mode: bool,
    policy: DurationPolicy,
) -> CoreResult<u64> {
    let spec = capture_spec();
    let target_samples = policy.target_samples(SAMPLE_RATE_HZ);

    if wav_mode {
        // Provisional header: zero bytes of audio, correct format fields.
        sink.write_all(&wav::encode_header(spec, 0))
            .map_err(storage_write)?;
    }

    let mut captured_samples: u64 = 0;
    let mut next_flush_ms = FLUSH_INTERVAL_MS;
    let mut session_failure: Option<CaptureError> = None;

    loop {
        if let Some(target) = target_samples {
            if captured_samples >= target {
                break;
            }
        } else if !control.is_recording() {
            info!("Stop requested");
            break;
        }

        // Last chunk of a fixed session may be partial.
        let samples_to_read = match target_samples {
            Some(target) => (target - captured_samples).min(SAMPLES_PER_CHUNK as u64) as usize,
            None => SAMPLES_PER_CHUNK,
        };
        let bytes_to_read = samples_to_read * BYTES_PER_SAMPLE;

        let bytes_read = match source.read(&mut chunk[..bytes_to_read], READ_TIMEOUT) {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "Acquisition read failed, finalizing partial capture");
                session_failure = Some(e);
                break;
            }
        };

        if bytes_read > 0 {
            if control.is_paused() {
                // Paused sessions keep consuming time and storage as
                // silence so the file timeline stays continuous.
                chunk[..bytes_read].fill(0);
            }
            if let Err(e) = sink.write_all(&chunk[..bytes_read]) {
                warn!(error = %e, "Chunk append failed, finalizing partial capture");
                session_failure = Some(storage_write(e));
                break;
            }
            captured_samples += (bytes_read / BYTES_PER_SAMPLE) as u64;
        }

        if wav_mode && captured_samples * 1000 / u64::from(SAMPLE_RATE_HZ) >= next_flush_ms {
            if let Err(e) = finalize_header(sink, spec, captured_samples) {
                session_failure = Some(e);
                break;
            }
            next_flush_ms += FLUSH_INTERVAL_MS;
            debug!(captured_samples, "Header flushed");
        }
    }

    if wav_mode {
        // On a failed session the rewrite is best effort; the header must
        // still describe the last fully appended chunk if the medium takes
        // the write, and the original failure is what propagates.
        match finalize_header(sink, spec, captured_samples) {
            Ok(()) => {}
            Err(e) if session_failure.is_none() => return Err(e),
            Err(e) => warn!(error = %e, "Final header rewrite failed after session error"),
        }
    }

    match session_failure {
        Some(e) => Err(e),
        None => Ok(captured_samples),
    }
}

/// Rewrite the header for the exact byte count captured so far and force
/// it durable before acquisition resumes.
fn finalize_header<S: StorageSink>(
    sink: &mut S,
    spec: WavSpec,
    captured_samples: u64,
) -> CoreResult<()> {
    let data_bytes = (captured_samples * BYTES_PER_SAMPLE as u64) as u32;
    wav::rewrite_header(sink, spec, data_bytes).map_err(storage_write)?;
    sink.sync().map_err(storage_write)
}

#[track_caller]
fn storage_write(source: std::io::Error) -> CaptureError {
    CaptureError::StorageWrite {
        source,
        location: ErrorLocation::from(Location::caller()),
    }
}
