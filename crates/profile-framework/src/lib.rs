//! # Profile Framework
//!
//! This crate provides the building blocks for supervising "profiles":
//! logical subsystems with their own start/stop lifecycle, driven by
//! external adapter-state signals. It separates the *lifecycle plumbing*
//! (event ordering, registration bookkeeping, permission gating, idempotent
//! cleanup) from the *subsystem behavior* a concrete profile supplies.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Contract Layer** ([`Profile`]) - the hooks a concrete profile
//!    implements: handle creation, start, stop, cleanup, diagnostics.
//! 2. **Runtime Layer** ([`ProfileService`]) - the lifecycle state machine.
//!    It runs an event loop, so every host event is handled to completion
//!    before the next one, and no locking is needed for lifecycle state.
//! 3. **Interface Layer** ([`ServiceClient`]) - the type-safe handle the
//!    host uses to deliver activation, command, bind and teardown events.
//!
//! Around those sit two collaborators, both injected at construction rather
//! than discovered through globals:
//!
//! - an [`AdapterRegistry`] (weak reference) that tracks which profile
//!   services exist and what state each last reported, and
//! - a [`PermissionGate`] that decides whether a caller may deliver
//!   lifecycle commands at all.
//!
//! ## Lifecycle Guarantees
//!
//! - The profile's handle is created once at activation and released
//!   **exactly once** at teardown, no matter how many start/stop cycles or
//!   duplicate teardown events occur in between.
//! - The cleanup hook runs **at most once** per service instance.
//! - A failed start is terminal for the instance; a failed stop leaves the
//!   service attached, to be retried by a later signal. The service never
//!   retries on its own.
//! - Every command event is answered with [`StartMode::NotSticky`]: hosts
//!   must not restart a profile service automatically.
//!
//! ## Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use profile_framework::{
//!     AdapterRegistry, AdapterState, AllowAll, Caller, CommandPayload, Profile,
//!     ProfileDirectory, ProfileHandle, ProfileService, StartMode,
//! };
//! use std::sync::Arc;
//!
//! // A minimal profile with a unit handle.
//! #[derive(Clone, Debug)]
//! struct LoopbackHandle;
//!
//! impl ProfileHandle for LoopbackHandle {
//!     fn release(&self) {}
//! }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("loopback failure")]
//! struct LoopbackError;
//!
//! struct LoopbackProfile;
//!
//! #[async_trait]
//! impl Profile for LoopbackProfile {
//!     type Handle = LoopbackHandle;
//!     type Error = LoopbackError;
//!
//!     fn init_handle(&mut self) -> Option<LoopbackHandle> {
//!         Some(LoopbackHandle)
//!     }
//!
//!     async fn on_start(&mut self) -> Result<(), LoopbackError> {
//!         Ok(())
//!     }
//!
//!     async fn on_stop(&mut self) -> Result<(), LoopbackError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let directory = Arc::new(ProfileDirectory::new());
//!     let registry: std::sync::Weak<dyn AdapterRegistry> =
//!         Arc::downgrade(&(directory.clone() as Arc<dyn AdapterRegistry>));
//!     let (service, client, _host_rx) = ProfileService::new(
//!         LoopbackProfile,
//!         registry,
//!         Arc::new(AllowAll),
//!         8,
//!     );
//!     tokio::spawn(service.run());
//!
//!     client.activate().await.unwrap();
//!     let mode = client
//!         .command(
//!             Some(CommandPayload::state_changed(AdapterState::On)),
//!             Caller::new("host"),
//!         )
//!         .await
//!         .unwrap();
//!
//!     assert_eq!(mode, StartMode::NotSticky);
//!     assert_eq!(
//!         directory.profile_state("LoopbackProfile"),
//!         Some(AdapterState::On)
//!     );
//! }
//! ```
//!
//! ## Testing
//!
//! The [`mock`] module provides a recording [`MockRegistry`](mock::MockRegistry)
//! so tests can assert the exact sequence of registrations and state
//! reports a service produced, without inspecting service internals.

pub mod client;
pub mod error;
pub mod event;
pub mod mock;
pub mod permission;
pub mod profile;
pub mod registry;
pub mod service;
pub mod tracing;

// Re-export core types for convenience
pub use client::ServiceClient;
pub use error::ServiceError;
pub use event::{
    AdapterState, CommandPayload, HostRequest, Response, ServiceRequest, StartMode,
    ACTION_STATE_CHANGED,
};
pub use permission::{AllowAll, Caller, Permission, PermissionGate};
pub use profile::{dump_line, Profile, ProfileHandle};
pub use registry::{AdapterRegistry, ProfileDirectory};
pub use service::ProfileService;
