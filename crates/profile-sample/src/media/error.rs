//! Error type for the media relay profile.

/// Errors raised by the media relay's lifecycle hooks and handle.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("No stream capacity configured")]
    NoCapacity,
    #[error("{0} stream(s) still active")]
    StreamsActive(u32),
    #[error("Media relay is not running")]
    NotRunning,
    #[error("All {0} stream slots are in use")]
    Saturated(u32),
}
