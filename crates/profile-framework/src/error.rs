//! # Service Errors
//!
//! This module defines the errors a host can observe at the client boundary.
//! Profile-level failures (a start that fails, a stop that is refused, a
//! denied command) are absorbed inside the service: they update controller
//! state and are logged, but are never surfaced here.

/// Errors observable by a host driving a profile service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Profile service closed")]
    ServiceClosed,
    #[error("Profile service dropped response channel")]
    ServiceDropped,
    /// Bind was requested while the adapter reference is held but the
    /// profile never produced a handle. This is a programming error in the
    /// profile implementation, not a recoverable runtime condition.
    #[error("Cannot bind to {0}: profile exposes no handle")]
    NotBindable(String),
}
