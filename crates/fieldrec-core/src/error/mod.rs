use error_location::ErrorLocation;
use thiserror::Error;

/// Capture pipeline errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Destination file could not be opened for writing.
    #[error("Destination unavailable: {path:?}: {source} {location}")]
    DestinationUnavailable {
        /// Path that failed to open.
        path: std::path::PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Chunk buffer allocation failed before the session started.
    #[error("Chunk buffer allocation of {bytes} bytes failed {location}")]
    ChunkBufferAlloc {
        /// Requested buffer size in bytes.
        bytes: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Acquisition read did not complete within the timeout.
    #[error("Acquisition timed out {location}")]
    AcquisitionTimeout {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Acquisition device reported a read failure.
    #[error("Acquisition failed: {reason} {location}")]
    AcquisitionFailed {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Writing or syncing the destination failed mid-session.
    #[error("Storage write failed: {source} {location}")]
    StorageWrite {
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
