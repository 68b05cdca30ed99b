//! # MQTT Authorization Backend
//!
//! PostgreSQL-backed authentication and topic ACL backend for MQTT brokers.
//!
//! ## Features
//!
//! - **Credential resolution** against operator-supplied lookup queries
//! - **Superuser checks** with fail-closed defaults
//! - **Topic ACL decisions** using hierarchical `+`/`#` wildcard matching
//! - **Parameter-bound queries** - dynamic values never touch query text
//! - **Async-first design** using Tokio and sqlx connection pooling
//! - **Pluggable storage** through the [`GrantStore`] trait
//!
//! ## Example
//!
//! ```no_run
//! use mqtt_authz::{AccessType, AuthBackend, BackendConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BackendConfig::from_json(r#"{
//!         "dbname": "broker",
//!         "userquery": "SELECT pw FROM users WHERE username = $1",
//!         "superquery": "SELECT super FROM users WHERE username = $1",
//!         "aclquery": "SELECT topic FROM acls WHERE username = $1 AND (rw & $2) > 0"
//!     }"#)?;
//!
//!     let backend = AuthBackend::connect(config).await?;
//!
//!     if backend.check_acl("alice", "sensors/hall/temp", AccessType::Read).await {
//!         println!("Subscription allowed");
//!     }
//!
//!     backend.close().await;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod store;
pub mod topic;
pub mod types;

// Re-export commonly used types
pub use backend::AuthBackend;
pub use config::BackendConfig;
pub use error::{AuthzError, Result};
pub use store::{GrantStore, InMemoryGrantStore};
pub use topic::topic_matches;
pub use types::{AccessRequest, AccessType, Grant};

#[cfg(feature = "postgres")]
pub use store::PgGrantStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
