use std::time::Duration;

/// Classification of a completed, debounced button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    /// Held shorter than the long-press threshold.
    Short,
    /// Held at or beyond the long-press threshold.
    Long,
}

/// A confirmed press, produced by the classifier and consumed immediately
/// by the recording state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PressEvent {
    /// Short or long, by held duration.
    pub kind: PressKind,
    /// How long the button was held between confirmed edges.
    pub held: Duration,
}
