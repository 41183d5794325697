//! Typed configuration for the fieldrec binary.
//!
//! Values are fixed at build time with constant-backed defaults; there is
//! deliberately no on-disk configuration layer.

use crate::config::{ButtonConfig, CaptureConfig, StorageConfig};

/// Main configuration struct.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Button polling and classification settings.
    pub button: ButtonConfig,
    /// Capture session settings.
    pub capture: CaptureConfig,
    /// Storage destination settings.
    pub storage: StorageConfig,
}
