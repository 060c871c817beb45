//! # Adapter Registry
//!
//! The registry is the process-wide directory of profile services and the
//! states they last reported. A service registers itself on every command
//! event (registration is idempotent), unregisters during teardown, and
//! reports On/Off transitions as they succeed.
//!
//! # Architecture Note
//! Services never query a global singleton; they receive a
//! `Weak<dyn AdapterRegistry>` at construction. An upgrade that fails means
//! "registry unavailable", which is a normal condition during early startup
//! and late shutdown and is never fatal to the service. The registry, not
//! the service, is responsible for serializing concurrent calls from many
//! service instances.

use crate::event::AdapterState;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Bookkeeping interface a profile service reports into.
pub trait AdapterRegistry: Send + Sync {
    /// Add a profile to the directory. Re-registering is a no-op.
    fn register(&self, profile: &str);

    /// Remove a profile from the directory.
    fn unregister(&self, profile: &str);

    /// Record a profile's reported state transition.
    fn profile_state_changed(&self, profile: &str, state: AdapterState);
}

/// In-process implementation of [`AdapterRegistry`].
///
/// Tracks registered profiles and the last state each one reported. All
/// access goes through an internal mutex with short critical sections, so
/// any number of services can call in concurrently.
#[derive(Debug, Default)]
pub struct ProfileDirectory {
    entries: Mutex<HashMap<String, Option<AdapterState>>>,
}

impl ProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_registered(&self, profile: &str) -> bool {
        self.entries.lock().unwrap().contains_key(profile)
    }

    /// Last state the profile reported, if it reported one at all.
    pub fn profile_state(&self, profile: &str) -> Option<AdapterState> {
        self.entries.lock().unwrap().get(profile).copied().flatten()
    }

    /// Names of all registered profiles.
    pub fn profiles(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }
}

impl AdapterRegistry for ProfileDirectory {
    fn register(&self, profile: &str) {
        let mut entries = self.entries.lock().unwrap();
        if !entries.contains_key(profile) {
            debug!(profile, "Profile registered");
            entries.insert(profile.to_string(), None);
        }
    }

    fn unregister(&self, profile: &str) {
        if self.entries.lock().unwrap().remove(profile).is_some() {
            debug!(profile, "Profile unregistered");
        }
    }

    fn profile_state_changed(&self, profile: &str, state: AdapterState) {
        debug!(profile, ?state, "Profile state changed");
        self.entries
            .lock()
            .unwrap()
            .insert(profile.to_string(), Some(state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent_and_keeps_state() {
        let directory = ProfileDirectory::new();
        directory.register("media");
        directory.profile_state_changed("media", AdapterState::On);
        directory.register("media");

        assert!(directory.is_registered("media"));
        assert_eq!(directory.profile_state("media"), Some(AdapterState::On));
    }

    #[test]
    fn unregister_forgets_the_profile() {
        let directory = ProfileDirectory::new();
        directory.register("media");
        directory.unregister("media");

        assert!(!directory.is_registered("media"));
        assert_eq!(directory.profile_state("media"), None);
        assert!(directory.profiles().is_empty());
    }
}
