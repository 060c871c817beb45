//! # Profile Lifecycle Service
//!
//! This module defines [`ProfileService`], the supervised component that
//! starts, stops, and tears down one profile in response to host events.
//! It implements the "server" side of the pattern: it owns the lifecycle
//! state and the receiver end of the host channel.
//!
//! **Concurrency Model**:
//! The host delivers events over an mpsc channel and the service processes
//! them *sequentially* in [`ProfileService::run`] — one event handled to
//! completion before the next is dispatched. The lifecycle flags
//! (`started`, `start_error`, `cleaning_up`) therefore need no locking.
//! The shared [`AdapterRegistry`] is the only concurrently-touched
//! collaborator, and it serializes its own access.
//!
//! ## Lifecycle
//!
//! A service instance lives through exactly one activation/teardown
//! bracket:
//!
//! 1. **Activate** — the profile supplies its handle via
//!    [`Profile::init_handle`] and runs its `on_create` hook.
//! 2. **Commands** — zero or more signals. A payload requesting adapter
//!    state `On` runs the start procedure, `Off` runs the stop procedure.
//!    Every command re-registers the service with the registry and answers
//!    [`StartMode::NotSticky`]: the host must never restart the service on
//!    its own.
//! 3. **Teardown** — unregister, run the cleanup hook at most once, release
//!    the handle exactly once, drop the adapter reference.
//!
//! A failed start is terminal: the instance latches `start_error` and every
//! later command asks the host to tear the service down. A failed stop is
//! not: the service stays attached and a later `Off` signal retries.

use crate::client::ServiceClient;
use crate::error::ServiceError;
use crate::event::{
    AdapterState, CommandPayload, HostRequest, ServiceRequest, StartMode, ACTION_STATE_CHANGED,
};
use crate::permission::{Caller, Permission, PermissionGate};
use crate::profile::{Profile, ProfileHandle};
use crate::registry::AdapterRegistry;
use std::fmt::Write as _;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The lifecycle controller for one profile.
pub struct ProfileService<P: Profile> {
    receiver: mpsc::Receiver<ServiceRequest<P>>,
    profile: P,
    name: String,
    handle: Option<P::Handle>,
    started: bool,
    start_error: bool,
    cleaning_up: bool,
    /// Injected registry lookup; upgrade failure means "unavailable".
    registry: Weak<dyn AdapterRegistry>,
    /// Live adapter back reference: acquired at activation, discarded at
    /// teardown. Its absence drives the unconditional self-stop guard.
    adapter: Option<Weak<dyn AdapterRegistry>>,
    permissions: Arc<dyn PermissionGate>,
    host_tx: mpsc::UnboundedSender<HostRequest>,
}

impl<P: Profile> ProfileService<P> {
    /// Creates a service for `profile` together with the host-side client
    /// and the channel on which the service asks the host to stop it.
    ///
    /// # Arguments
    ///
    /// * `registry` - weak reference to the shared adapter registry; pass a
    ///   dead weak when no registry exists and the service degrades as it
    ///   would during late shutdown.
    /// * `permissions` - the oracle consulted on every command event.
    /// * `buffer_size` - capacity of the host event channel.
    pub fn new(
        profile: P,
        registry: Weak<dyn AdapterRegistry>,
        permissions: Arc<dyn PermissionGate>,
        buffer_size: usize,
    ) -> (
        Self,
        ServiceClient<P>,
        mpsc::UnboundedReceiver<HostRequest>,
    ) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (host_tx, host_rx) = mpsc::unbounded_channel();
        // Pretty name: "MediaStreamProfile", not the full module path.
        let name = std::any::type_name::<P>()
            .split("::")
            .last()
            .unwrap_or("Profile")
            .to_string();
        let service = Self {
            receiver,
            profile,
            name,
            handle: None,
            started: false,
            start_error: false,
            cleaning_up: false,
            registry,
            adapter: None,
            permissions,
            host_tx,
        };
        let client = ServiceClient::new(sender);
        (service, client, host_rx)
    }

    /// Identifying name of the supervised profile, derived from its type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the profile can still be interacted with.
    pub fn is_available(&self) -> bool {
        !self.start_error && !self.cleaning_up
    }

    fn adapter(&self) -> Option<Arc<dyn AdapterRegistry>> {
        self.adapter.as_ref().and_then(Weak::upgrade)
    }

    /// Runs the service's event loop until the host drops its client.
    pub async fn run(mut self) {
        info!(profile = %self.name, "Profile service started");

        while let Some(event) = self.receiver.recv().await {
            match event {
                ServiceRequest::Activate { respond_to } => {
                    self.on_activate().await;
                    let _ = respond_to.send(Ok(()));
                }
                ServiceRequest::Command {
                    payload,
                    caller,
                    respond_to,
                } => {
                    let mode = self.on_command(payload, caller).await;
                    let _ = respond_to.send(Ok(mode));
                }
                ServiceRequest::Bind { respond_to } => {
                    let _ = respond_to.send(self.on_bind());
                }
                ServiceRequest::Unbind { respond_to } => {
                    debug!(profile = %self.name, "Unbind");
                    let _ = respond_to.send(Ok(()));
                }
                ServiceRequest::IsAvailable { respond_to } => {
                    let _ = respond_to.send(Ok(self.is_available()));
                }
                ServiceRequest::Dump { respond_to } => {
                    let _ = respond_to.send(Ok(self.on_dump()));
                }
                ServiceRequest::Teardown { respond_to } => {
                    self.on_teardown().await;
                    let _ = respond_to.send(Ok(()));
                }
            }
        }

        info!(profile = %self.name, "Profile service shut down");
    }

    async fn on_activate(&mut self) {
        debug!(profile = %self.name, "Activate");
        self.adapter = Some(self.registry.clone());
        self.handle = self.profile.init_handle();
        self.profile.on_create().await;
    }

    async fn on_command(&mut self, payload: Option<CommandPayload>, caller: Caller) -> StartMode {
        debug!(profile = %self.name, "Command");
        match self.registry.upgrade() {
            Some(registry) => registry.register(&self.name),
            None => {
                warn!(profile = %self.name, "Could not register profile: adapter registry is unavailable")
            }
        }

        if self.start_error || self.adapter().is_none() {
            warn!(profile = %self.name, "Stopping profile service: adapter is unavailable");
            self.do_stop().await;
            return StartMode::NotSticky;
        }

        if !self.permissions.allows(&caller, Permission::Admin) {
            error!(profile = %self.name, %caller, "Permission denied");
            return StartMode::NotSticky;
        }

        let Some(payload) = payload else {
            debug!(profile = %self.name, "Restarting profile service");
            return StartMode::NotSticky;
        };

        if payload.action.as_deref() == Some(ACTION_STATE_CHANGED) {
            match payload.state {
                Some(AdapterState::Off) => {
                    debug!(profile = %self.name, "Received stop request, stopping profile");
                    self.do_stop().await;
                }
                Some(AdapterState::On) => {
                    debug!(profile = %self.name, "Received start request, starting profile");
                    self.do_start().await;
                }
                _ => {}
            }
        }

        StartMode::NotSticky
    }

    fn on_bind(&self) -> Result<Option<P::Handle>, ServiceError> {
        if self.adapter.is_some() && self.handle.is_none() {
            // init_handle returned None while the profile claims
            // availability: a programming error, surfaced loudly.
            error!(profile = %self.name, "Bind requested but the profile exposes no handle");
            return Err(ServiceError::NotBindable(self.name.clone()));
        }
        Ok(self.handle.clone())
    }

    fn on_dump(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Profile: {}", self.name);
        let _ = writeln!(out);
        self.profile.dump(&mut out);
        self.profile.dump_structured();
        out
    }

    async fn on_teardown(&mut self) {
        debug!(profile = %self.name, "Teardown");
        match self.registry.upgrade() {
            Some(registry) => registry.unregister(&self.name),
            None => debug!(profile = %self.name, "Adapter registry already gone, nothing to unregister"),
        }

        if self.cleaning_up {
            debug!(profile = %self.name, "Cleanup already started, skipping");
        } else {
            self.cleaning_up = true;
            self.profile.on_cleanup().await;
            if let Some(handle) = self.handle.take() {
                handle.release();
            }
        }
        self.adapter = None;
    }

    async fn do_start(&mut self) {
        if self.adapter().is_none() {
            error!(profile = %self.name, "Error starting profile: adapter is unavailable");
            return;
        }
        debug!(profile = %self.name, already_started = self.started, "start()");
        match self.profile.on_start().await {
            Ok(()) => {
                self.started = true;
                self.start_error = false;
                self.notify_state_changed(AdapterState::On);
            }
            Err(e) => {
                self.start_error = true;
                error!(profile = %self.name, error = %e, "Error starting profile");
            }
        }
    }

    async fn do_stop(&mut self) {
        match self.profile.on_stop().await {
            Ok(()) => {
                debug!(profile = %self.name, "stop()");
                self.started = false;
                self.notify_state_changed(AdapterState::Off);
                self.request_stop();
            }
            Err(e) => error!(profile = %self.name, error = %e, "Unable to stop profile"),
        }
    }

    fn notify_state_changed(&self, state: AdapterState) {
        match self.registry.upgrade() {
            Some(registry) => registry.profile_state_changed(&self.name, state),
            None => {
                debug!(profile = %self.name, ?state, "Adapter registry unavailable, state change not reported")
            }
        }
    }

    fn request_stop(&self) {
        if self.host_tx.send(HostRequest::StopService).is_err() {
            warn!(profile = %self.name, "Host is gone, stop request dropped");
        }
    }
}
