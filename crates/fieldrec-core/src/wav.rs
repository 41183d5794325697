//! Minimal streaming-friendly RIFF/WAVE container support.
//!
//! The writer keeps a partially written file playable at all times by
//! rewriting the 44-byte header in place at flush boundaries. Only
//! uncompressed PCM (format code 1) is produced.

use std::{
    io::{self, Seek, SeekFrom, Write},
    path::Path,
};

/// Size of the canonical PCM WAV header: RIFF chunk descriptor,
/// "fmt " sub-chunk (16 bytes of fields), and the "data" sub-chunk tag.
pub const HEADER_LEN: usize = 44;

/// Sample format of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Samples per second.
    pub sample_rate: u32,
    /// Bits per sample (bit depth).
    pub bits_per_sample: u16,
    /// Channel count.
    pub channels: u16,
}

impl WavSpec {
    /// Bytes per single-channel sample.
    pub const fn bytes_per_sample(&self) -> u32 {
        self.bits_per_sample as u32 / 8
    }

    /// Bytes per second of audio at this spec.
    pub const fn byte_rate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * self.bytes_per_sample()
    }

    /// Bytes per frame (all channels of one sample instant).
    pub const fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }
}

/// Encode the header describing `data_bytes` bytes of PCM audio.
///
/// The RIFF size field (bytes 4..8) is `36 + data_bytes` and must stay
/// consistent with the data sub-chunk length (bytes 40..44) at every
/// flush point.
pub fn encode_header(spec: WavSpec, data_bytes: u32) -> [u8; HEADER_LEN] {
    let mut header = [0u8; HEADER_LEN];

    header[0..4].copy_from_slice(b"RIFF");
    header[4..8].copy_from_slice(&(36 + data_bytes).to_le_bytes());
    header[8..12].copy_from_slice(b"WAVE");

    header[12..16].copy_from_slice(b"fmt ");
    header[16..20].copy_from_slice(&16u32.to_le_bytes());
    // Format code 1 = uncompressed PCM
    header[20..22].copy_from_slice(&1u16.to_le_bytes());
    header[22..24].copy_from_slice(&spec.channels.to_le_bytes());
    header[24..28].copy_from_slice(&spec.sample_rate.to_le_bytes());
    header[28..32].copy_from_slice(&spec.byte_rate().to_le_bytes());
    header[32..34].copy_from_slice(&spec.block_align().to_le_bytes());
    header[34..36].copy_from_slice(&spec.bits_per_sample.to_le_bytes());

    header[36..40].copy_from_slice(b"data");
    header[40..44].copy_from_slice(&data_bytes.to_le_bytes());

    header
}

/// Rewrite the header at byte offset 0 of a still-open sink, then return
/// the cursor to the end so appending can resume.
pub fn rewrite_header<S: Write + Seek>(
    sink: &mut S,
    spec: WavSpec,
    data_bytes: u32,
) -> io::Result<()> {
    sink.seek(SeekFrom::Start(0))?;
    sink.write_all(&encode_header(spec, data_bytes))?;
    sink.seek(SeekFrom::End(0))?;
    Ok(())
}

/// Whether `path` selects container mode by naming convention.
///
/// Case-sensitive match on the final extension; anything other than `.wav`
/// is written as a headerless raw sample stream.
pub fn has_wav_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "wav")
}
