/// Requested session length; zero selects until-stopped capture.
pub(crate) const DEFAULT_DURATION_SECS: i32 = 0;

/// Capture session settings.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Whole seconds per session; values `<= 0` mean "record until the
    /// state machine says stop".
    pub duration_secs: i32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}
