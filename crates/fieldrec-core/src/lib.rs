//! Fieldrec Core Library
//!
//! Storage-facing capture pipeline for a button-driven voice recorder:
//! streaming WAV persistence with crash-safe header maintenance, plus the
//! acquisition and session-control seams the device wiring plugs into.
//!
//! # Example
//!
//! ```no_run
//! use fieldrec_core::{AudioSource, CoreResult, DurationPolicy, capture_to_path};
//! use std::{path::Path, time::Duration};
//!
//! struct Mic;
//!
//! impl AudioSource for Mic {
//!     fn read(&mut self, buf: &mut [u8], _timeout: Duration) -> CoreResult<usize> {
//!         buf.fill(0);
//!         Ok(buf.len())
//!     }
//! }
//!
//! struct AlwaysOn;
//!
//! impl fieldrec_core::SessionControl for AlwaysOn {
//!     fn is_recording(&self) -> bool {
//!         true
//!     }
//!     fn is_paused(&self) -> bool {
//!         false
//!     }
//! }
//!
//! fn main() -> CoreResult<()> {
//!     let mut mic = Mic;
//!     let report = capture_to_path(
//!         &mut mic,
//!         &AlwaysOn,
//!         Path::new("rec_0001.wav"),
//!         DurationPolicy::from_secs(3),
//!     )?;
//!     println!("Captured {} seconds", report.seconds);
//!     Ok(())
//! }
//! ```

mod capture;
mod error;
mod storage;
mod wav;

pub use {
    capture::{
        AudioSource, BITS_PER_SAMPLE, BYTES_PER_SAMPLE, CHANNELS, CaptureReport, DurationPolicy,
        Microphone, SAMPLE_RATE_HZ, SAMPLES_PER_CHUNK, SessionControl, capture_to_path,
        run_session,
    },
    error::{CaptureError, Result as CoreResult},
    storage::StorageSink,
    wav::{HEADER_LEN, WavSpec, encode_header, has_wav_extension, rewrite_header},
};

#[cfg(test)]
mod tests;
