//! Backend configuration
//!
//! The host runtime hands connection parameters and the three operator-written
//! query templates across the boundary as opaque key/value configuration; this
//! module gives that a typed shape.

use crate::error::{AuthzError, Result};
use serde::Deserialize;

/// Default store host
fn default_host() -> String {
    "localhost".to_string()
}

/// Default PostgreSQL port
fn default_port() -> u16 {
    5432
}

/// Default pool size
fn default_max_connections() -> u32 {
    8
}

/// Default store round-trip timeout in seconds
fn default_acquire_timeout_secs() -> u64 {
    3
}

/// Configuration for the authorization backend
///
/// The query templates use positional placeholders, never textual
/// substitution: `$1` receives the username in all three, and the ACL
/// template may additionally use `$2` for the requested access bitmask.
///
/// `userquery` must yield exactly one row with one column (the stored
/// secret). `superquery` must yield zero or one row with one column
/// interpretable as a boolean. `aclquery` may yield any number of rows, each
/// with a single topic pattern column.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Store host
    #[serde(default = "default_host")]
    pub host: String,

    /// Store port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Store login user
    #[serde(default)]
    pub user: Option<String>,

    /// Store login password
    #[serde(default)]
    pub pass: Option<String>,

    /// Database name
    #[serde(default)]
    pub dbname: Option<String>,

    /// Credential lookup query (mandatory)
    #[serde(default)]
    pub userquery: Option<String>,

    /// Superuser flag query; absent disables the capability (always false)
    #[serde(default)]
    pub superquery: Option<String>,

    /// Topic grant query; absent disables ACL checks (always deny)
    #[serde(default)]
    pub aclquery: Option<String>,

    /// Maximum pooled store connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Timeout for acquiring a store connection, in seconds
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

impl BackendConfig {
    /// Parse configuration from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AuthzError::Config(format!("Invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate mandatory options
    ///
    /// Missing `superquery` or `aclquery` only disables the corresponding
    /// capability; a missing `userquery` is fatal.
    pub fn validate(&self) -> Result<()> {
        match &self.userquery {
            Some(q) if !q.trim().is_empty() => Ok(()),
            _ => Err(AuthzError::Config(
                "Mandatory option 'userquery' is missing".to_string(),
            )),
        }
    }
}
