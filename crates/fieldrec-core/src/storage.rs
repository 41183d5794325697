//! Destination stream abstraction for capture sessions.

use std::io::{self, Seek, Write};

/// A writable destination that supports in-place header rewrites and a
/// durable flush.
///
/// Append happens through [`Write`]; the periodic header rewrite needs
/// [`Seek`] plus overwrite; [`StorageSink::sync`] must push bytes all the
/// way to the medium so the file stays playable across power loss.
pub trait StorageSink: Write + Seek + Send {
    /// Flush buffered bytes and force them durable on the medium.
    fn sync(&mut self) -> io::Result<()>;
}

impl StorageSink for std::fs::File {
    fn sync(&mut self) -> io::Result<()> {
        self.flush()?;
        self.sync_data()
    }
}
