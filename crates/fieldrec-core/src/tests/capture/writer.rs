use crate::{
    CaptureError,
    capture::{
        AudioSource, BYTES_PER_SAMPLE, DurationPolicy, SAMPLE_RATE_HZ, SAMPLES_PER_CHUNK,
        SessionControl, capture_to_path, run_session,
    },
    storage::StorageSink,
    wav::HEADER_LEN,
};

use std::{
    collections::VecDeque,
    io::{self, Cursor, Seek, SeekFrom, Write},
    panic::Location,
    sync::Mutex,
    time::Duration,
};

use error_location::ErrorLocation;

const CHUNK_BYTES: usize = SAMPLES_PER_CHUNK * BYTES_PER_SAMPLE;

/// Session-control fake fed from scripted answer queues; once a queue is
/// exhausted the fallback answer repeats forever.
struct ScriptedControl {
    recording: Mutex<VecDeque<bool>>,
    recording_fallback: bool,
    paused: Mutex<VecDeque<bool>>,
    paused_fallback: bool,
}

impl ScriptedControl {
    fn new(recording: &[bool], recording_fallback: bool, paused: &[bool]) -> Self {
        Self {
            recording: Mutex::new(recording.iter().copied().collect()),
            recording_fallback,
            paused: Mutex::new(paused.iter().copied().collect()),
            paused_fallback: false,
        }
    }

    fn always_recording() -> Self {
        Self::new(&[], true, &[])
    }
}

impl SessionControl for ScriptedControl {
    fn is_recording(&self) -> bool {
        self.recording
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(self.recording_fallback)
    }

    fn is_paused(&self) -> bool {
        self.paused
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(self.paused_fallback)
    }
}

/// Source that always delivers full reads of a fixed byte pattern and
/// records every requested read size.
struct PatternSource {
    value: u8,
    requests: Vec<usize>,
}

impl PatternSource {
    fn new(value: u8) -> Self {
        Self {
            value,
            requests: Vec::new(),
        }
    }
}

impl AudioSource for PatternSource {
    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> crate::CoreResult<usize> {
        self.requests.push(buf.len());
        buf.fill(self.value);
        Ok(buf.len())
    }
}

/// Source that fails after a fixed number of successful chunk reads.
struct FailingSource {
    remaining_ok: usize,
    value: u8,
    timeout: bool,
}

impl AudioSource for FailingSource {
    fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> crate::CoreResult<usize> {
        if self.remaining_ok == 0 {
            return Err(if self.timeout {
                CaptureError::AcquisitionTimeout {
                    location: ErrorLocation::from(Location::caller()),
                }
            } else {
                CaptureError::AcquisitionFailed {
                    reason: "dma queue fault".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            });
        }
        self.remaining_ok -= 1;
        buf.fill(self.value);
        Ok(buf.len())
    }
}

/// In-memory sink that snapshots its full contents at every durable sync,
/// modeling what would survive a power loss at that flush boundary.
struct SnapshotSink {
    inner: Cursor<Vec<u8>>,
    snapshots: Vec<Vec<u8>>,
}

impl SnapshotSink {
    fn new() -> Self {
        Self {
            inner: Cursor::new(Vec::new()),
            snapshots: Vec::new(),
        }
    }

    fn bytes(&self) -> &[u8] {
        self.inner.get_ref()
    }
}

impl Write for SnapshotSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Seek for SnapshotSink {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl StorageSink for SnapshotSink {
    fn sync(&mut self) -> io::Result<()> {
        self.snapshots.push(self.inner.get_ref().clone());
        Ok(())
    }
}

/// Sink that fails exactly one write call, counted from the first write
/// issued (the provisional header is call one), then recovers.
struct FaultyWriteSink {
    inner: SnapshotSink,
    writes_seen: usize,
    fail_on_write: usize,
}

impl FaultyWriteSink {
    fn new(fail_on_write: usize) -> Self {
        Self {
            inner: SnapshotSink::new(),
            writes_seen: 0,
            fail_on_write,
        }
    }
}

impl Write for FaultyWriteSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writes_seen += 1;
        if self.writes_seen == self.fail_on_write {
            return Err(io::Error::other("medium write fault"));
        }
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl Seek for FaultyWriteSink {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.inner.seek(pos)
    }
}

impl StorageSink for FaultyWriteSink {
    fn sync(&mut self) -> io::Result<()> {
        self.inner.sync()
    }
}

fn data_len(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[40], bytes[41], bytes[42], bytes[43]])
}

fn riff_len(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]])
}

#[allow(clippy::unwrap_used)]
fn parse_wav(bytes: &[u8]) -> (hound::WavSpec, u32) {
    let reader = hound::WavReader::new(Cursor::new(bytes.to_vec())).unwrap();
    (reader.spec(), reader.len())
}

/// WHAT: A fixed one-second session captures exactly rate samples
/// WHY: Fixed mode must hit its sample target precisely, not per-chunk
#[test]
#[allow(clippy::unwrap_used)]
fn given_fixed_one_second_when_capturing_then_exact_sample_count_persisted() {
    // Given: A full-read pattern source and an always-recording control
    let mut source = PatternSource::new(0x55);
    let control = ScriptedControl::always_recording();
    let mut sink = SnapshotSink::new();
    let mut chunk = vec![0u8; CHUNK_BYTES];

    // When: Capturing a fixed one-second WAV session
    let captured = run_session(
        &mut source,
        &control,
        &mut sink,
        &mut chunk,
        true,
        DurationPolicy::Fixed(1),
    )
    .unwrap();

    // Then: Exactly one second of samples, correctly declared in the header
    assert_eq!(captured, u64::from(SAMPLE_RATE_HZ));
    let expected_data = SAMPLE_RATE_HZ * BYTES_PER_SAMPLE as u32;
    assert_eq!(sink.bytes().len(), HEADER_LEN + expected_data as usize);
    assert_eq!(data_len(sink.bytes()), expected_data);
    assert_eq!(riff_len(sink.bytes()), 36 + expected_data);

    // 16000 is not a multiple of 512, so the final chunk must be partial
    assert_eq!(*source.requests.last().unwrap(), 128 * BYTES_PER_SAMPLE);

    let (spec, samples) = parse_wav(sink.bytes());
    assert_eq!(samples, SAMPLE_RATE_HZ);
    assert_eq!(spec.sample_rate, SAMPLE_RATE_HZ);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);
}

/// WHAT: Until-stopped capture ends on the first false recording query
/// WHY: Stop latency is bounded by one chunk; the writer never overshoots
#[test]
#[allow(clippy::unwrap_used)]
fn given_three_recording_ticks_when_until_stopped_then_three_chunks_captured() {
    // Given: A control that reports recording for exactly three chunk polls
    let mut source = PatternSource::new(0x11);
    let control = ScriptedControl::new(&[true, true, true], false, &[]);
    let mut sink = SnapshotSink::new();
    let mut chunk = vec![0u8; CHUNK_BYTES];

    // When: Capturing until stopped
    let captured = run_session(
        &mut source,
        &control,
        &mut sink,
        &mut chunk,
        true,
        DurationPolicy::UntilStopped,
    )
    .unwrap();

    // Then: Exactly three chunks landed, under one whole second of audio
    assert_eq!(captured, 3 * SAMPLES_PER_CHUNK as u64);
    assert_eq!(captured / u64::from(SAMPLE_RATE_HZ), 0);
    assert_eq!(
        data_len(sink.bytes()) as usize,
        3 * SAMPLES_PER_CHUNK * BYTES_PER_SAMPLE
    );
}

/// WHAT: Chunks acquired while paused persist as zero bytes
/// WHY: Pause produces silence, not gaps; the timeline stays continuous
#[test]
#[allow(clippy::unwrap_used)]
fn given_paused_middle_chunk_when_capturing_then_silence_persisted_in_place() {
    // Given: Nonzero source data with the second of three chunks paused
    let mut source = PatternSource::new(0x7F);
    let control = ScriptedControl::new(&[true, true, true], false, &[false, true, false]);
    let mut sink = SnapshotSink::new();
    let mut chunk = vec![0u8; CHUNK_BYTES];

    // When: Capturing until stopped
    let captured = run_session(
        &mut source,
        &control,
        &mut sink,
        &mut chunk,
        true,
        DurationPolicy::UntilStopped,
    )
    .unwrap();

    // Then: All three chunks are present; only the paused one is silent
    assert_eq!(captured, 3 * SAMPLES_PER_CHUNK as u64);
    let payload = &sink.bytes()[HEADER_LEN..];
    let (first, rest) = payload.split_at(CHUNK_BYTES);
    let (second, third) = rest.split_at(CHUNK_BYTES);
    assert!(first.iter().all(|&b| b == 0x7F));
    assert!(second.iter().all(|&b| b == 0));
    assert!(third.iter().all(|&b| b == 0x7F));
}

/// WHAT: Every durable sync snapshot is a structurally valid WAV file
/// WHY: Power loss at any flush boundary must leave a playable file
#[test]
#[allow(clippy::unwrap_used)]
fn given_multi_second_session_when_syncing_then_every_snapshot_is_playable() {
    // Given: A fixed three-second session
    let mut source = PatternSource::new(0x2A);
    let control = ScriptedControl::always_recording();
    let mut sink = SnapshotSink::new();
    let mut chunk = vec![0u8; CHUNK_BYTES];

    // When: Capturing with one flush per captured second
    run_session(
        &mut source,
        &control,
        &mut sink,
        &mut chunk,
        true,
        DurationPolicy::Fixed(3),
    )
    .unwrap();

    // Then: Three interval flushes plus the final one, each self-consistent
    assert_eq!(sink.snapshots.len(), 4);
    for snapshot in &sink.snapshots {
        let declared = data_len(snapshot) as usize;
        assert_eq!(declared, snapshot.len() - HEADER_LEN);
        assert_eq!(riff_len(snapshot) as usize, snapshot.len() - 8);
        let (_, samples) = parse_wav(snapshot);
        assert_eq!(samples as usize, declared / BYTES_PER_SAMPLE);
    }
}

/// WHAT: A mid-session acquisition failure still finalizes prior bytes
/// WHY: Captured audio must never be discarded on a transient device fault
#[test]
fn given_acquisition_failure_when_capturing_then_partial_file_finalized() {
    // Given: A source that faults after two good chunks
    let mut source = FailingSource {
        remaining_ok: 2,
        value: 0x33,
        timeout: false,
    };
    let control = ScriptedControl::always_recording();
    let mut sink = SnapshotSink::new();
    let mut chunk = vec![0u8; CHUNK_BYTES];

    // When: Capturing until stopped
    let result = run_session(
        &mut source,
        &control,
        &mut sink,
        &mut chunk,
        true,
        DurationPolicy::UntilStopped,
    );

    // Then: The error propagates but the file declares both good chunks
    assert!(matches!(result, Err(CaptureError::AcquisitionFailed { .. })));
    assert_eq!(data_len(sink.bytes()) as usize, 2 * CHUNK_BYTES);
    assert_eq!(sink.bytes().len(), HEADER_LEN + 2 * CHUNK_BYTES);
}

/// WHAT: A storage append failure still rewrites the header best effort
/// WHY: The header must declare the last fully appended chunk, not the
/// previous flush boundary, whenever the medium still takes the rewrite
#[test]
fn given_storage_append_failure_when_capturing_then_header_declares_prior_chunks() {
    // Given: A sink whose fourth write (the third audio chunk) faults
    let mut source = PatternSource::new(0x44);
    let control = ScriptedControl::always_recording();
    let mut sink = FaultyWriteSink::new(4);
    let mut chunk = vec![0u8; CHUNK_BYTES];

    // When: Capturing until stopped
    let result = run_session(
        &mut source,
        &control,
        &mut sink,
        &mut chunk,
        true,
        DurationPolicy::UntilStopped,
    );

    // Then: The write error propagates and the header covers both chunks
    // that fully landed before the fault
    assert!(matches!(result, Err(CaptureError::StorageWrite { .. })));
    assert_eq!(data_len(sink.inner.bytes()) as usize, 2 * CHUNK_BYTES);
    assert_eq!(sink.inner.bytes().len(), HEADER_LEN + 2 * CHUNK_BYTES);
    // The finalize was made durable too
    assert_eq!(sink.inner.snapshots.len(), 1);
}

/// WHAT: A timeout before any data still leaves a valid empty container
/// WHY: The zero-byte provisional header must be finalized, not abandoned
#[test]
#[allow(clippy::unwrap_used)]
fn given_immediate_timeout_when_capturing_then_empty_file_still_valid() {
    // Given: A source that times out on its first read
    let mut source = FailingSource {
        remaining_ok: 0,
        value: 0,
        timeout: true,
    };
    let control = ScriptedControl::always_recording();
    let mut sink = SnapshotSink::new();
    let mut chunk = vec![0u8; CHUNK_BYTES];

    // When: Capturing a fixed session
    let result = run_session(
        &mut source,
        &control,
        &mut sink,
        &mut chunk,
        true,
        DurationPolicy::Fixed(1),
    );

    // Then: Timeout is reported and the empty container parses cleanly
    assert!(matches!(result, Err(CaptureError::AcquisitionTimeout { .. })));
    assert_eq!(data_len(sink.bytes()), 0);
    let (_, samples) = parse_wav(sink.bytes());
    assert_eq!(samples, 0);
}

/// WHAT: Non-wav destinations receive raw samples with no header
/// WHY: Headerless mode is selected purely by naming convention
#[test]
#[allow(clippy::unwrap_used)]
fn given_headerless_mode_when_capturing_then_raw_samples_only() {
    // Given: A pattern source in headerless mode
    let mut source = PatternSource::new(0x55);
    let control = ScriptedControl::new(&[true, true], false, &[]);
    let mut sink = SnapshotSink::new();
    let mut chunk = vec![0u8; CHUNK_BYTES];

    // When: Capturing until stopped without a container
    let captured = run_session(
        &mut source,
        &control,
        &mut sink,
        &mut chunk,
        false,
        DurationPolicy::UntilStopped,
    )
    .unwrap();

    // Then: File is exactly the payload, no RIFF tag, no sync points
    assert_eq!(captured, 2 * SAMPLES_PER_CHUNK as u64);
    assert_eq!(sink.bytes().len(), 2 * CHUNK_BYTES);
    assert_ne!(&sink.bytes()[0..4], b"RIFF");
    assert!(sink.snapshots.is_empty());
}

/// WHAT: End-to-end capture to a real file produces a playable recording
/// WHY: The File sink path (create, append, seek-rewrite, sync) must work
#[test]
#[allow(clippy::unwrap_used)]
fn given_temp_destination_when_capturing_then_report_and_file_agree() {
    // Given: A temp directory destination and a one-second session
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rec_0001.wav");
    let mut source = PatternSource::new(0x5A);
    let control = ScriptedControl::always_recording();

    // When: Capturing through the public entry point
    let report = capture_to_path(&mut source, &control, &path, DurationPolicy::from_secs(1)).unwrap();

    // Then: Report matches the on-disk file, which parses as 16k/32-bit mono
    assert_eq!(report.seconds, 1);
    assert_eq!(report.bytes_written, u64::from(SAMPLE_RATE_HZ) * BYTES_PER_SAMPLE as u64);
    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.len(), SAMPLE_RATE_HZ);
    assert_eq!(reader.spec().sample_rate, SAMPLE_RATE_HZ);
}

/// WHAT: An unopenable destination fails before acquisition starts
/// WHY: DestinationUnavailable must abort with no partial artifacts
#[test]
#[allow(clippy::unwrap_used)]
fn given_missing_directory_when_capturing_then_destination_unavailable() {
    // Given: A destination inside a directory that does not exist
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("rec_0001.wav");
    let mut source = PatternSource::new(0);
    let control = ScriptedControl::always_recording();

    // When: Attempting to capture
    let result = capture_to_path(&mut source, &control, &path, DurationPolicy::from_secs(1));

    // Then: The open failure is reported and nothing was created
    assert!(matches!(
        result,
        Err(CaptureError::DestinationUnavailable { .. })
    ));
    assert!(!path.exists());
    assert!(source.requests.is_empty());
}
