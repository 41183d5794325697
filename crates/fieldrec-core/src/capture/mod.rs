pub(crate) mod control;
pub(crate) mod policy;
pub(crate) mod source;
pub(crate) mod writer;

pub use {
    control::SessionControl,
    policy::DurationPolicy,
    source::{AudioSource, Microphone},
    writer::{
        BITS_PER_SAMPLE, BYTES_PER_SAMPLE, CHANNELS, CaptureReport, SAMPLE_RATE_HZ,
        SAMPLES_PER_CHUNK, capture_to_path, run_session,
    },
};
