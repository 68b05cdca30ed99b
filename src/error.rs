//! Error types for the authorization backend

use thiserror::Error;

/// Authorization backend errors
///
/// Only [`Config`](AuthzError::Config) ever reaches the host: it aborts
/// initialization. The store variants travel across the `GrantStore` seam and
/// are absorbed into fail-closed defaults inside the decision operations.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// Fatal configuration problem surfaced at init
    #[error("Configuration error: {0}")]
    Config(String),

    /// The store could not execute a lookup
    #[error("Store error: {0}")]
    Store(String),

    /// The store answered with a shape the backend cannot interpret
    #[error("Schema violation: {0}")]
    Schema(String),
}

/// Result type for authorization operations
pub type Result<T> = std::result::Result<T, AuthzError>;
