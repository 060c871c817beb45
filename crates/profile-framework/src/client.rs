//! # Service Client
//!
//! This module defines the host-side handle for delivering lifecycle events
//! to a running [`ProfileService`](crate::service::ProfileService).

use crate::error::ServiceError;
use crate::event::{CommandPayload, ServiceRequest, StartMode};
use crate::permission::Caller;
use crate::profile::Profile;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for driving a `ProfileService`.
///
/// Holds only a sender, so cloning is inexpensive; every request travels
/// over the service's mpsc channel and returns through a oneshot reply, so
/// events reach the service strictly in delivery order and are handled one
/// at a time.
pub struct ServiceClient<P: Profile> {
    sender: mpsc::Sender<ServiceRequest<P>>,
}

// Hand-written so clones never require `P: Clone`.
impl<P: Profile> Clone for ServiceClient<P> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<P: Profile> ServiceClient<P> {
    pub fn new(sender: mpsc::Sender<ServiceRequest<P>>) -> Self {
        Self { sender }
    }

    /// Deliver the creation-phase event.
    pub async fn activate(&self) -> Result<(), ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest::Activate { respond_to })
            .await
            .map_err(|_| ServiceError::ServiceClosed)?;
        response.await.map_err(|_| ServiceError::ServiceDropped)?
    }

    /// Deliver a command event. `payload == None` is a restart
    /// notification. The returned [`StartMode`] is always
    /// [`StartMode::NotSticky`].
    pub async fn command(
        &self,
        payload: Option<CommandPayload>,
        caller: Caller,
    ) -> Result<StartMode, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest::Command {
                payload,
                caller,
                respond_to,
            })
            .await
            .map_err(|_| ServiceError::ServiceClosed)?;
        response.await.map_err(|_| ServiceError::ServiceDropped)?
    }

    /// Attach to the profile's handle. `Ok(None)` means the profile is not
    /// bindable right now (never activated, torn down, or intentionally
    /// handle-less); [`ServiceError::NotBindable`] signals a contract
    /// violation in the profile implementation.
    pub async fn bind(&self) -> Result<Option<P::Handle>, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest::Bind { respond_to })
            .await
            .map_err(|_| ServiceError::ServiceClosed)?;
        response.await.map_err(|_| ServiceError::ServiceDropped)?
    }

    /// Detach from the handle. Delegates to default behavior.
    pub async fn unbind(&self) -> Result<(), ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest::Unbind { respond_to })
            .await
            .map_err(|_| ServiceError::ServiceClosed)?;
        response.await.map_err(|_| ServiceError::ServiceDropped)?
    }

    /// Whether the profile can still be interacted with (no start error,
    /// not cleaning up).
    pub async fn is_available(&self) -> Result<bool, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest::IsAvailable { respond_to })
            .await
            .map_err(|_| ServiceError::ServiceClosed)?;
        response.await.map_err(|_| ServiceError::ServiceDropped)?
    }

    /// Append the service's diagnostics block to `out`.
    pub async fn dump(&self, out: &mut String) -> Result<(), ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest::Dump { respond_to })
            .await
            .map_err(|_| ServiceError::ServiceClosed)?;
        let block = response.await.map_err(|_| ServiceError::ServiceDropped)??;
        out.push_str(&block);
        Ok(())
    }

    /// Deliver the destruction-phase event. Safe to call more than once;
    /// the cleanup body runs only the first time.
    pub async fn teardown(&self) -> Result<(), ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(ServiceRequest::Teardown { respond_to })
            .await
            .map_err(|_| ServiceError::ServiceClosed)?;
        response.await.map_err(|_| ServiceError::ServiceDropped)?
    }
}
