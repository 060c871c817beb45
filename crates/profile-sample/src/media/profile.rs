//! # Media Relay Profile
//!
//! [`Profile`](profile_framework::Profile) implementation for a stream
//! relay: while the profile is running, bound clients reserve and release
//! stream slots through [`MediaHandle`]. The relay refuses to stop while
//! streams are live, so a stop signal arriving mid-session leaves the
//! service attached until the streams drain and a later signal retries.

use crate::media::error::MediaError;
use crate::media::handle::{MediaHandle, MediaShared};
use async_trait::async_trait;
use profile_framework::{dump_line, Profile};
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info};

/// Static configuration of the relay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Maximum number of concurrently relayed streams. Zero makes every
    /// start attempt fail.
    pub max_streams: u32,
}

/// The media relay subsystem supervised by a profile service.
pub struct MediaStreamProfile {
    config: MediaConfig,
    shared: Arc<MediaShared>,
}

impl MediaStreamProfile {
    pub fn new(config: MediaConfig) -> Self {
        let shared = Arc::new(MediaShared::new(config.max_streams));
        Self { config, shared }
    }
}

#[async_trait]
impl Profile for MediaStreamProfile {
    type Handle = MediaHandle;
    type Error = MediaError;

    fn init_handle(&mut self) -> Option<MediaHandle> {
        Some(MediaHandle {
            shared: self.shared.clone(),
        })
    }

    async fn on_create(&mut self) {
        debug!(max_streams = self.config.max_streams, "Media relay created");
    }

    async fn on_start(&mut self) -> Result<(), MediaError> {
        if self.config.max_streams == 0 {
            return Err(MediaError::NoCapacity);
        }
        self.shared.open.store(true, Ordering::SeqCst);
        info!(max_streams = self.config.max_streams, "Media relay open");
        Ok(())
    }

    async fn on_stop(&mut self) -> Result<(), MediaError> {
        let active = self.shared.active.load(Ordering::SeqCst);
        if active > 0 {
            return Err(MediaError::StreamsActive(active));
        }
        self.shared.open.store(false, Ordering::SeqCst);
        info!("Media relay closed");
        Ok(())
    }

    async fn on_cleanup(&mut self) {
        self.shared.open.store(false, Ordering::SeqCst);
        self.shared.active.store(0, Ordering::SeqCst);
    }

    fn dump(&self, out: &mut String) {
        dump_line(
            out,
            &format!(
                "streams: {}/{}",
                self.shared.active.load(Ordering::SeqCst),
                self.config.max_streams
            ),
        );
        dump_line(
            out,
            &format!("relay open: {}", self.shared.open.load(Ordering::SeqCst)),
        );
    }

    fn dump_structured(&self) {
        debug!(
            target: "media_diagnostics",
            active = self.shared.active.load(Ordering::SeqCst),
            open = self.shared.open.load(Ordering::SeqCst),
            "Media relay state"
        );
    }
}
