//! # Host Events
//!
//! This module defines the message vocabulary between a host and a
//! [`ProfileService`](crate::service::ProfileService). The host is treated
//! as a black-box transport: it delivers an activation event once, any
//! number of command events, and a teardown event, and it may ask to bind
//! to the profile's handle in between. Each request carries a oneshot
//! channel for its reply, so the service processes events strictly one at
//! a time.
//!
//! The payload types ([`CommandPayload`], [`AdapterState`], [`StartMode`])
//! derive serde because they are the part of the vocabulary that crosses
//! the host transport in a real deployment.

use crate::error::ServiceError;
use crate::permission::Caller;
use crate::profile::Profile;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// Action value a command payload must carry for the service to interpret
/// its requested adapter state.
pub const ACTION_STATE_CHANGED: &str = "profile.action.STATE_CHANGED";

/// Type alias for the one-shot response channel used by the service.
pub type Response<T> = oneshot::Sender<Result<T, ServiceError>>;

/// Externally reported adapter state.
///
/// Only `On` and `Off` drive the service lifecycle; the transitional values
/// exist so hosts can forward every adapter broadcast unmodified and the
/// service ignores the ones it does not act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdapterState {
    Off,
    TurningOn,
    On,
    TurningOff,
}

/// Restart policy returned to the host after every command event.
///
/// Profile services are never restarted automatically; they must be
/// explicitly re-activated through the adapter registry. `NotSticky` is
/// therefore the only value, returned unconditionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StartMode {
    NotSticky,
}

/// Optional payload of a command event.
///
/// A command with no payload at all is a restart notification and is a
/// no-op. A payload whose `action` is [`ACTION_STATE_CHANGED`] asks the
/// service to follow `state`; any other action is ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CommandPayload {
    pub action: Option<String>,
    pub state: Option<AdapterState>,
}

impl CommandPayload {
    /// Payload announcing an adapter state change.
    pub fn state_changed(state: AdapterState) -> Self {
        Self {
            action: Some(ACTION_STATE_CHANGED.to_string()),
            state: Some(state),
        }
    }
}

/// Requests the service sends *to* the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostRequest {
    /// The service wants the host to tear it down. Sent after a successful
    /// stop, or when the adapter is gone and the service cannot run.
    StopService,
}

/// Events delivered by the host to a profile service.
#[derive(Debug)]
pub enum ServiceRequest<P: Profile> {
    /// Creation-phase event: initialize the handle and profile state.
    Activate { respond_to: Response<()> },
    /// Mid-lifetime signal carrying an optional action/state payload.
    Command {
        payload: Option<CommandPayload>,
        caller: Caller,
        respond_to: Response<StartMode>,
    },
    /// A client wants the profile's handle.
    Bind {
        respond_to: Response<Option<P::Handle>>,
    },
    /// A bound client detached. No special handling.
    Unbind { respond_to: Response<()> },
    /// Availability query for collaborators outside the event loop.
    IsAvailable { respond_to: Response<bool> },
    /// Diagnostics dump; the reply is appended to the caller's buffer.
    Dump { respond_to: Response<String> },
    /// Destruction-phase event: unregister, clean up once, release handle.
    Teardown { respond_to: Response<()> },
}
