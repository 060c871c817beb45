//! # Permission Gate
//!
//! Command events carry a caller identity, and every command is checked
//! against a permission oracle before it can change service state. The
//! oracle is deliberately minimal: given a caller and a permission level it
//! answers yes or no. How that answer is produced (package manifests, a
//! policy daemon, a fixed allowlist) is the host's concern.

use std::fmt;

/// Identity of the party that delivered a command event.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Caller(pub String);

impl Caller {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Permission levels a profile service can require of its callers.
///
/// Plain `Access` covers read-style interactions, `Admin` is required to
/// drive the service lifecycle, and `Privileged` is reserved for
/// profile-specific operations that reach beyond the service itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    Access,
    Admin,
    Privileged,
}

/// The boolean oracle consulted on every command event.
pub trait PermissionGate: Send + Sync {
    fn allows(&self, caller: &Caller, permission: Permission) -> bool;
}

/// Any matching closure works as a gate, which keeps test setups short.
impl<F> PermissionGate for F
where
    F: Fn(&Caller, Permission) -> bool + Send + Sync,
{
    fn allows(&self, caller: &Caller, permission: Permission) -> bool {
        self(caller, permission)
    }
}

/// Gate that grants every permission to every caller.
pub struct AllowAll;

impl PermissionGate for AllowAll {
    fn allows(&self, _caller: &Caller, _permission: Permission) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_act_as_gates() {
        let gate = |caller: &Caller, permission: Permission| {
            caller.0 == "trusted" && permission == Permission::Admin
        };
        assert!(gate.allows(&Caller::new("trusted"), Permission::Admin));
        assert!(!gate.allows(&Caller::new("trusted"), Permission::Privileged));
        assert!(!gate.allows(&Caller::new("other"), Permission::Admin));
    }

    #[test]
    fn allow_all_grants_everything() {
        assert!(AllowAll.allows(&Caller::new("anyone"), Permission::Privileged));
    }
}
