//! Grant storage
//!
//! The `GrantStore` trait is the only I/O boundary of the backend: three
//! read-only lookups against whatever holds users, secrets, and topic grants.
//! The PostgreSQL implementation lives in [`postgres`]; the in-memory
//! implementation backs tests and embedded deployments.

use crate::error::Result;
use crate::types::{AccessType, Grant};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::PgGrantStore;

/// Read-only lookups the backend issues against the external store
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Fetch the stored secret for a username
    ///
    /// `Ok(None)` means the user is unknown; errors mean the lookup could not
    /// be executed or the result shape was wrong.
    async fn fetch_secret(&self, username: &str) -> Result<Option<String>>;

    /// Fetch the superuser flag for a username
    ///
    /// Absence of proof is not privilege: unknown users, ambiguous results,
    /// and disabled capability all come back as `Ok(false)`.
    async fn fetch_superuser(&self, username: &str) -> Result<bool>;

    /// Fetch the topic patterns granted to a username for an access kind
    ///
    /// Never returns partial rows: either the full grant list or an error.
    async fn fetch_grants(&self, username: &str, access: AccessType) -> Result<Vec<String>>;
}

/// Per-user record held by the in-memory store
#[derive(Debug, Clone, Default)]
struct UserEntry {
    /// Stored secret (password hash)
    secret: Option<String>,

    /// Elevated privilege flag
    superuser: bool,

    /// Topic grants
    grants: Vec<Grant>,
}

/// In-memory grant store implementation
///
/// Used by the test suite and by embedders that manage users in process.
pub struct InMemoryGrantStore {
    users: Arc<RwLock<HashMap<String, UserEntry>>>,
}

impl InMemoryGrantStore {
    /// Create a new in-memory grant store
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a user's secret
    pub async fn set_secret(&self, username: impl Into<String>, secret: impl Into<String>) {
        let mut users = self.users.write().await;
        users.entry(username.into()).or_default().secret = Some(secret.into());
    }

    /// Set a user's superuser flag
    pub async fn set_superuser(&self, username: impl Into<String>, superuser: bool) {
        let mut users = self.users.write().await;
        users.entry(username.into()).or_default().superuser = superuser;
    }

    /// Add a topic grant for a user
    pub async fn add_grant(&self, username: impl Into<String>, grant: Grant) {
        let mut users = self.users.write().await;
        users.entry(username.into()).or_default().grants.push(grant);
    }

    /// Remove a user and all their grants
    pub async fn remove_user(&self, username: &str) {
        let mut users = self.users.write().await;
        users.remove(username);
    }
}

impl Default for InMemoryGrantStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GrantStore for InMemoryGrantStore {
    async fn fetch_secret(&self, username: &str) -> Result<Option<String>> {
        let users = self.users.read().await;
        Ok(users.get(username).and_then(|u| u.secret.clone()))
    }

    async fn fetch_superuser(&self, username: &str) -> Result<bool> {
        let users = self.users.read().await;
        Ok(users.get(username).map(|u| u.superuser).unwrap_or(false))
    }

    async fn fetch_grants(&self, username: &str, access: AccessType) -> Result<Vec<String>> {
        let users = self.users.read().await;
        let patterns = users
            .get(username)
            .map(|u| {
                u.grants
                    .iter()
                    .filter(|g| g.allows(access))
                    .map(|g| g.pattern.clone())
                    .collect()
            })
            .unwrap_or_default();
        Ok(patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_secret_roundtrip() {
        let store = InMemoryGrantStore::new();
        store.set_secret("alice", "PBKDF2$sha256$901$salt$hash").await;

        let secret = store.fetch_secret("alice").await.unwrap();
        assert_eq!(secret.as_deref(), Some("PBKDF2$sha256$901$salt$hash"));

        let missing = store.fetch_secret("bob").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_superuser_defaults_false() {
        let store = InMemoryGrantStore::new();
        assert!(!store.fetch_superuser("nobody").await.unwrap());

        store.set_superuser("root", true).await;
        assert!(store.fetch_superuser("root").await.unwrap());

        store.set_superuser("root", false).await;
        assert!(!store.fetch_superuser("root").await.unwrap());
    }

    #[tokio::test]
    async fn test_grants_filtered_by_access() {
        let store = InMemoryGrantStore::new();
        store.add_grant("alice", Grant::new("sensors/#", 1)).await;
        store.add_grant("alice", Grant::new("commands/alice/+", 2)).await;
        store.add_grant("alice", Grant::new("chat/general", 3)).await;

        let readable = store.fetch_grants("alice", AccessType::Read).await.unwrap();
        assert_eq!(readable, vec!["sensors/#", "chat/general"]);

        let writable = store.fetch_grants("alice", AccessType::Write).await.unwrap();
        assert_eq!(writable, vec!["commands/alice/+", "chat/general"]);
    }

    #[tokio::test]
    async fn test_unknown_user_has_no_grants() {
        let store = InMemoryGrantStore::new();
        let grants = store.fetch_grants("ghost", AccessType::Read).await.unwrap();
        assert!(grants.is_empty());
    }

    #[tokio::test]
    async fn test_remove_user_revokes_everything() {
        let store = InMemoryGrantStore::new();
        store.set_secret("eve", "hash").await;
        store.set_superuser("eve", true).await;
        store.add_grant("eve", Grant::new("#", 3)).await;

        store.remove_user("eve").await;

        assert!(store.fetch_secret("eve").await.unwrap().is_none());
        assert!(!store.fetch_superuser("eve").await.unwrap());
        assert!(store
            .fetch_grants("eve", AccessType::Write)
            .await
            .unwrap()
            .is_empty());
    }
}
