/// Live recording/paused queries polled by the capture loop.
///
/// The writer never initiates or ends recording on its own; it observes
/// these predicates at chunk boundaries. Implementations must be cheap
/// single atomic loads; the loop calls them once per chunk from a
/// blocking thread while another task performs the transitions.
pub trait SessionControl: Send + Sync {
    /// True while a session is active (recording or paused).
    fn is_recording(&self) -> bool;

    /// True while the active session is paused.
    fn is_paused(&self) -> bool;
}
