//! Core authorization types

use serde::{Deserialize, Serialize};

/// Kind of access a client requests on a topic
///
/// The discriminants are the broker's ACL bitmask values: subscriptions ask
/// for `Read` (1), publishes ask for `Write` (2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    /// Subscribe / receive messages
    Read = 1,
    /// Publish messages
    Write = 2,
}

impl AccessType {
    /// Bitmask value used in grant rows and bound into ACL queries
    pub fn mask(self) -> i32 {
        self as i32
    }
}

/// A stored topic grant: a pattern plus the access kinds it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// Topic pattern, possibly containing `+` and `#` wildcards
    pub pattern: String,

    /// Access bitmask (READ = 1, WRITE = 2, combinable)
    pub access: i32,
}

impl Grant {
    /// Create a new grant
    pub fn new(pattern: impl Into<String>, access: i32) -> Self {
        Self {
            pattern: pattern.into(),
            access,
        }
    }

    /// Whether this grant covers the requested access kind
    pub fn allows(&self, access: AccessType) -> bool {
        self.access & access.mask() != 0
    }
}

/// One ACL decision input, ephemeral for the duration of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Connected username attempting access
    pub username: String,

    /// Concrete topic being accessed (never wildcard-bearing)
    pub topic: String,

    /// Desired access kind
    pub access: AccessType,
}

impl AccessRequest {
    /// Create a new access request
    pub fn new(username: impl Into<String>, topic: impl Into<String>, access: AccessType) -> Self {
        Self {
            username: username.into(),
            topic: topic.into(),
            access,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_masks() {
        assert_eq!(AccessType::Read.mask(), 1);
        assert_eq!(AccessType::Write.mask(), 2);
    }

    #[test]
    fn test_grant_allows() {
        let read_only = Grant::new("sensors/#", 1);
        assert!(read_only.allows(AccessType::Read));
        assert!(!read_only.allows(AccessType::Write));

        let read_write = Grant::new("devices/+/state", 3);
        assert!(read_write.allows(AccessType::Read));
        assert!(read_write.allows(AccessType::Write));
    }

    #[test]
    fn test_access_request_creation() {
        let request = AccessRequest::new("alice", "sensors/hall/temp", AccessType::Read);
        assert_eq!(request.username, "alice");
        assert_eq!(request.topic, "sensors/hall/temp");
        assert_eq!(request.access, AccessType::Read);
    }
}
