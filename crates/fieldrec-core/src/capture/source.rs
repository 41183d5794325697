use crate::CoreResult;

use std::time::Duration;

/// Audio acquisition collaborator.
///
/// Mirrors a DMA-backed peripheral read: fills as much of `buf` as the
/// device delivers within `timeout` and returns the byte count actually
/// read. A timeout or device fault surfaces as
/// [`CaptureError::AcquisitionTimeout`](crate::CaptureError::AcquisitionTimeout)
/// / [`CaptureError::AcquisitionFailed`](crate::CaptureError::AcquisitionFailed).
pub trait AudioSource: Send {
    /// Read up to `buf.len()` bytes of sample data, blocking at most
    /// `timeout`.
    fn read(&mut self, buf: &mut [u8], timeout: Duration) -> CoreResult<usize>;
}

/// Opens a fresh acquisition channel for each capture session.
///
/// The underlying peripheral is configured, enabled, and torn down per
/// session; dropping the returned source releases it.
pub trait Microphone: Send {
    /// Configure and enable the acquisition channel.
    fn open(&mut self) -> CoreResult<Box<dyn AudioSource>>;
}
