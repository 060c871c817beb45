//! # Media Handle
//!
//! The object bound clients use to reserve stream slots on the relay.
//! Clones are stubs onto the same underlying relay state: once the service
//! releases the handle, every clone refuses further work.

use crate::media::error::MediaError;
use profile_framework::ProfileHandle;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Relay state shared between the profile and every handle clone.
#[derive(Debug)]
pub(crate) struct MediaShared {
    pub(crate) open: AtomicBool,
    pub(crate) active: AtomicU32,
    pub(crate) capacity: u32,
}

impl MediaShared {
    pub(crate) fn new(capacity: u32) -> Self {
        Self {
            open: AtomicBool::new(false),
            active: AtomicU32::new(0),
            capacity,
        }
    }
}

/// Client-facing handle of the media relay.
#[derive(Clone, Debug)]
pub struct MediaHandle {
    pub(crate) shared: Arc<MediaShared>,
}

impl MediaHandle {
    /// Whether the relay currently accepts streams.
    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }

    /// Number of currently reserved stream slots.
    pub fn active_streams(&self) -> u32 {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Reserve a stream slot. Fails while the relay is not running and when
    /// every slot is taken.
    pub fn open_stream(&self) -> Result<(), MediaError> {
        if !self.is_open() {
            return Err(MediaError::NotRunning);
        }
        let mut current = self.shared.active.load(Ordering::SeqCst);
        loop {
            if current >= self.shared.capacity {
                return Err(MediaError::Saturated(self.shared.capacity));
            }
            match self.shared.active.compare_exchange(
                current,
                current + 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    /// Give a stream slot back. Releasing an already-empty relay is a no-op.
    pub fn close_stream(&self) {
        let mut current = self.shared.active.load(Ordering::SeqCst);
        loop {
            if current == 0 {
                return;
            }
            match self.shared.active.compare_exchange(
                current,
                current - 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }
}

impl ProfileHandle for MediaHandle {
    fn release(&self) {
        self.shared.open.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_handle(capacity: u32) -> MediaHandle {
        let shared = Arc::new(MediaShared::new(capacity));
        shared.open.store(true, Ordering::SeqCst);
        MediaHandle { shared }
    }

    #[test]
    fn slots_are_bounded_by_capacity() {
        let handle = open_handle(2);
        handle.open_stream().unwrap();
        handle.open_stream().unwrap();
        assert!(matches!(
            handle.open_stream(),
            Err(MediaError::Saturated(2))
        ));

        handle.close_stream();
        handle.open_stream().unwrap();
        assert_eq!(handle.active_streams(), 2);
    }

    #[test]
    fn released_handle_refuses_streams() {
        let handle = open_handle(2);
        let clone = handle.clone();
        handle.release();

        assert!(!clone.is_open());
        assert!(matches!(clone.open_stream(), Err(MediaError::NotRunning)));
    }
}
