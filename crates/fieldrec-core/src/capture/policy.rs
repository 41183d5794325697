/// How long a capture session should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    /// Capture exactly this many whole seconds of audio.
    Fixed(u32),
    /// Capture until the session-control recording query goes false.
    UntilStopped,
}

impl DurationPolicy {
    /// Build a policy from requested seconds: values `<= 0` mean "run
    /// until told to stop", positive values below one second clamp up
    /// to one.
    pub fn from_secs(seconds: i32) -> Self {
        if seconds <= 0 {
            DurationPolicy::UntilStopped
        } else {
            DurationPolicy::Fixed(seconds.max(1) as u32)
        }
    }

    /// Target total sample count, or `None` for unbounded capture.
    pub fn target_samples(&self, sample_rate: u32) -> Option<u64> {
        match self {
            DurationPolicy::Fixed(seconds) => Some(u64::from(sample_rate) * u64::from(*seconds)),
            DurationPolicy::UntilStopped => None,
        }
    }
}
