//! Authorization backend
//!
//! Orchestrates the three decision operations the broker host invokes:
//! credential resolution, superuser checks, and topic ACL checks. All store
//! and schema failures are absorbed here into fail-closed defaults; the host
//! only ever sees an answer, never an error.

use crate::store::GrantStore;
use crate::topic::topic_matches;
use crate::types::{AccessRequest, AccessType};
use std::sync::Arc;
use tracing::{debug, warn};

#[cfg(feature = "postgres")]
use crate::config::BackendConfig;
#[cfg(feature = "postgres")]
use crate::error::Result;
#[cfg(feature = "postgres")]
use crate::store::PgGrantStore;
#[cfg(feature = "postgres")]
use tracing::info;

/// Authorization backend handle
///
/// One instance owns one store connection pool plus the query templates
/// behind it. All operations take `&self` and are safe under concurrent
/// invocation; nothing is cached between calls, so a revoked privilege is
/// observed on the very next check.
pub struct AuthBackend {
    /// Grant storage backend
    store: Arc<dyn GrantStore>,

    /// Typed handle kept for pool shutdown
    #[cfg(feature = "postgres")]
    pg: Option<Arc<PgGrantStore>>,
}

impl AuthBackend {
    /// Initialize the backend against PostgreSQL
    ///
    /// Validates configuration and establishes the connection pool. Any
    /// failure here aborts initialization; no half-initialized backend is
    /// ever returned.
    #[cfg(feature = "postgres")]
    pub async fn connect(config: BackendConfig) -> Result<Self> {
        let store = Arc::new(PgGrantStore::connect(&config).await?);

        info!(
            "Authorization backend initialized: store={}:{}, superuser={}, acl={}",
            config.host,
            config.port,
            config.superquery.is_some(),
            config.aclquery.is_some()
        );

        Ok(Self {
            store: store.clone(),
            pg: Some(store),
        })
    }

    /// Build a backend over an arbitrary grant store
    ///
    /// Used by tests and by embedders that keep users in process.
    pub fn with_store(store: Arc<dyn GrantStore>) -> Self {
        Self {
            store,
            #[cfg(feature = "postgres")]
            pg: None,
        }
    }

    /// Resolve the stored secret for a username
    ///
    /// Returns `None` for blank or unknown usernames and on any store
    /// failure. A blank username never reaches the store.
    pub async fn resolve_credential(&self, username: &str) -> Option<String> {
        if username.is_empty() {
            return None;
        }

        match self.store.fetch_secret(username).await {
            Ok(secret) => secret,
            Err(e) => {
                warn!("Credential lookup for {} failed closed: {}", username, e);
                None
            }
        }
    }

    /// Check whether a username holds superuser privilege
    ///
    /// Fail-closed: blank usernames, unknown users, ambiguous store results,
    /// and lookup failures all answer `false`.
    pub async fn is_superuser(&self, username: &str) -> bool {
        if username.is_empty() {
            return false;
        }

        match self.store.fetch_superuser(username).await {
            Ok(superuser) => superuser,
            Err(e) => {
                warn!("Superuser lookup for {} failed closed: {}", username, e);
                false
            }
        }
    }

    /// Check whether a username may access a topic with the requested kind
    ///
    /// Fetches the user's grant patterns and matches the topic against each,
    /// short-circuiting on the first hit. No grants, no match, or any store
    /// failure answers deny; this operation never surfaces an error.
    pub async fn check_acl(&self, username: &str, topic: &str, access: AccessType) -> bool {
        if username.is_empty() || topic.is_empty() {
            return false;
        }

        // A concrete topic must not impersonate a pattern: standalone
        // wildcard levels in the request are denied outright.
        if topic.split('/').any(|level| level == "+" || level == "#") {
            warn!("Rejected wildcard-bearing topic {:?} from {}", topic, username);
            return false;
        }

        let patterns = match self.store.fetch_grants(username, access).await {
            Ok(patterns) => patterns,
            Err(e) => {
                warn!("Grant lookup for {} failed closed: {}", username, e);
                return false;
            }
        };

        for pattern in &patterns {
            let matched = topic_matches(topic, pattern);
            debug!(
                "acl: topic_matches({}, {}) == {} for {}",
                topic, pattern, matched, username
            );
            if matched {
                return true;
            }
        }

        debug!(
            "acl: deny {} {:?} on {} ({} patterns tried)",
            username,
            access,
            topic,
            patterns.len()
        );
        false
    }

    /// Check a bundled access request
    ///
    /// Convenience wrapper over [`check_acl`](Self::check_acl).
    pub async fn check_request(&self, request: &AccessRequest) -> bool {
        self.check_acl(&request.username, &request.topic, request.access)
            .await
    }

    /// Release the store connection
    ///
    /// Idempotent; safe to call once per successful [`AuthBackend::connect`].
    /// Dropping the backend without calling this releases the pool as well.
    #[cfg(feature = "postgres")]
    pub async fn close(&self) {
        if let Some(pg) = &self.pg {
            pg.close().await;
            info!("Authorization backend shut down");
        }
    }
}
