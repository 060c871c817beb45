//! # Media Profile
//!
//! A concrete profile built on the framework: a stream relay whose handle
//! lets bound clients reserve slots while the relay runs.
//!
//! ## Structure
//!
//! - [`profile`] - the [`Profile`](profile_framework::Profile)
//!   implementation and its configuration
//! - [`handle`] - [`MediaHandle`], the client-facing stub
//! - [`error`] - [`MediaError`] for type-safe failure reporting
//! - [`new()`] - factory that wires profile, service and client together
//!
//! ## Usage
//!
//! ```rust
//! use profile_framework::{AdapterRegistry, AllowAll, ProfileDirectory};
//! use profile_sample::media::{self, MediaConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let directory = Arc::new(ProfileDirectory::new());
//!     let registry: std::sync::Weak<dyn AdapterRegistry> =
//!         Arc::downgrade(&(directory.clone() as Arc<dyn AdapterRegistry>));
//!     let (service, client, _host_rx) = media::new(
//!         MediaConfig { max_streams: 4 },
//!         registry,
//!         Arc::new(AllowAll),
//!     );
//!     tokio::spawn(service.run());
//!
//!     client.activate().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod handle;
pub mod profile;

pub use error::MediaError;
pub use handle::MediaHandle;
pub use profile::{MediaConfig, MediaStreamProfile};

use profile_framework::{
    AdapterRegistry, HostRequest, PermissionGate, ProfileService, ServiceClient,
};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;

/// Creates a supervised media relay service, its host-side client, and the
/// channel on which the service asks the host to stop it.
pub fn new(
    config: MediaConfig,
    registry: Weak<dyn AdapterRegistry>,
    permissions: Arc<dyn PermissionGate>,
) -> (
    ProfileService<MediaStreamProfile>,
    ServiceClient<MediaStreamProfile>,
    mpsc::UnboundedReceiver<HostRequest>,
) {
    ProfileService::new(MediaStreamProfile::new(config), registry, permissions, 32)
}
