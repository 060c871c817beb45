//! # Mock Registry & Testing Guide
//!
//! The [`MockRegistry`] type implements the same [`AdapterRegistry`] API as
//! the production directory but records every call instead of keeping
//! bookkeeping state. It lets tests assert exactly which registrations and
//! state reports a service produced, and in what order, without inspecting
//! service internals.
//!
//! ## When to use MockRegistry vs ProfileDirectory
//!
//! | Feature | MockRegistry | ProfileDirectory |
//! |---------|--------------|------------------|
//! | **Call ordering** | Full ordered log | Last state only |
//! | **Absence checks** | "no report happened" is assertable | Not observable |
//! | **Use case** | Verifying service behavior | Running systems, demos |
//!
//! ## Example
//!
//! ```rust
//! use profile_framework::mock::{MockRegistry, RegistryCall};
//! use profile_framework::registry::AdapterRegistry;
//! use profile_framework::AdapterState;
//!
//! let registry = MockRegistry::new();
//! registry.register("media");
//! registry.profile_state_changed("media", AdapterState::On);
//!
//! assert_eq!(registry.registrations(), vec!["media".to_string()]);
//! assert_eq!(registry.state_reports(), vec![AdapterState::On]);
//! assert_eq!(
//!     registry.calls()[0],
//!     RegistryCall::Register("media".to_string())
//! );
//! ```

use crate::event::AdapterState;
use crate::registry::AdapterRegistry;
use std::sync::Mutex;

/// One recorded call into the registry boundary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryCall {
    Register(String),
    Unregister(String),
    StateChanged(String, AdapterState),
}

/// Recording test double for [`AdapterRegistry`].
#[derive(Debug, Default)]
pub struct MockRegistry {
    calls: Mutex<Vec<RegistryCall>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Profile names passed to `register`, in order.
    pub fn registrations(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                RegistryCall::Register(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// States passed to `profile_state_changed`, in order.
    pub fn state_reports(&self) -> Vec<AdapterState> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|call| match call {
                RegistryCall::StateChanged(_, state) => Some(*state),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl AdapterRegistry for MockRegistry {
    fn register(&self, profile: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::Register(profile.to_string()));
    }

    fn unregister(&self, profile: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::Unregister(profile.to_string()));
    }

    fn profile_state_changed(&self, profile: &str, state: AdapterState) {
        self.calls
            .lock()
            .unwrap()
            .push(RegistryCall::StateChanged(profile.to_string(), state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_calls_in_order() {
        let registry = MockRegistry::new();
        registry.register("a");
        registry.profile_state_changed("a", AdapterState::On);
        registry.profile_state_changed("a", AdapterState::Off);
        registry.unregister("a");

        assert_eq!(
            registry.calls(),
            vec![
                RegistryCall::Register("a".to_string()),
                RegistryCall::StateChanged("a".to_string(), AdapterState::On),
                RegistryCall::StateChanged("a".to_string(), AdapterState::Off),
                RegistryCall::Unregister("a".to_string()),
            ]
        );
        assert_eq!(
            registry.state_reports(),
            vec![AdapterState::On, AdapterState::Off]
        );

        registry.clear();
        assert!(registry.calls().is_empty());
    }
}
