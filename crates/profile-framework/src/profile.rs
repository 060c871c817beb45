//! # Profile Contract
//!
//! The [`Profile`] trait is the contract a concrete profile implementation
//! must satisfy to be supervised by a
//! [`ProfileService`](crate::service::ProfileService). The service owns all
//! lifecycle bookkeeping (started, errored, cleaning-up) and calls these
//! hooks at well-defined points; the profile only supplies the actual
//! subsystem behavior.
//!
//! # Architecture Note
//! Lifecycle outcomes are plain `Result` values, not panics. A failed
//! `on_start` latches the service into a terminal error state; a failed
//! `on_stop` leaves the service attached so a later signal can retry. The
//! service never retries on its own, so hooks should fail fast rather than
//! block.
//!
//! # Provided Methods (Hooks)
//! `on_create`, `on_cleanup`, `dump` and `dump_structured` have default
//! no-op implementations; only implement them when the profile needs the
//! behavior.

use async_trait::async_trait;
use std::fmt::Debug;

/// Contract between a profile implementation and its supervising service.
#[async_trait]
pub trait Profile: Send + 'static {
    /// Opaque object handed to external clients while the profile is
    /// active. Clones act like stubs onto the same underlying object.
    type Handle: ProfileHandle;

    /// The error type for this profile's lifecycle hooks.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Called once during activation. Return `None` to make the service
    /// intentionally non-bindable; that is a valid configuration, not a
    /// failure.
    fn init_handle(&mut self) -> Option<Self::Handle>;

    /// Optional initialization hook, run during activation after the handle
    /// exists. Failures here are not modeled; do best-effort work only.
    async fn on_create(&mut self) {}

    /// Bring the profile into the running state. On `Err` the service
    /// records a start error and the instance becomes permanently
    /// unavailable until the host creates a fresh one.
    async fn on_start(&mut self) -> Result<(), Self::Error>;

    /// Bring the profile out of the running state. On `Err` the service
    /// stays attached and the stop is retried by a later signal.
    async fn on_stop(&mut self) -> Result<(), Self::Error>;

    /// Release all profile-owned resources. The service guarantees this is
    /// called at most once per instance, so the hook itself does not need
    /// to be idempotent.
    async fn on_cleanup(&mut self) {}

    /// Append profile-specific diagnostic lines to a dump. Use
    /// [`dump_line`] for the conventional indentation.
    fn dump(&self, _out: &mut String) {}

    /// Structured-log counterpart of [`Profile::dump`].
    fn dump_structured(&self) {}
}

/// Handle exposed to external clients while the service is active.
///
/// The service acquires the handle at activation and calls [`release`]
/// exactly once on the teardown path, even when cleanup itself misbehaves.
/// After release, clones held by clients must refuse further work.
///
/// [`release`]: ProfileHandle::release
pub trait ProfileHandle: Clone + Debug + Send + Sync + 'static {
    fn release(&self);
}

/// Append one indented line to a dump buffer.
pub fn dump_line(out: &mut String, line: &str) {
    out.push_str("  ");
    out.push_str(line);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_line_indents_and_terminates() {
        let mut out = String::new();
        dump_line(&mut out, "streams: 2/4");
        dump_line(&mut out, "relay open: true");
        assert_eq!(out, "  streams: 2/4\n  relay open: true\n");
    }
}
