//! PostgreSQL grant store implementation

use crate::config::BackendConfig;
use crate::error::{AuthzError, Result};
use crate::store::GrantStore;
use crate::types::AccessType;
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;
use tracing::{debug, warn};

/// PostgreSQL grant store with connection pooling
///
/// Holds the three operator-supplied query templates. Every dynamic value is
/// bound as a typed parameter (`$1` username, `$2` access mask); query text
/// is never assembled from user input.
pub struct PgGrantStore {
    pool: PgPool,
    user_query: String,
    super_query: Option<String>,
    acl_query: Option<String>,
}

impl PgGrantStore {
    /// Connect to PostgreSQL using the backend configuration
    ///
    /// Fails with [`AuthzError::Config`] when mandatory options are missing
    /// or the store is unreachable; the backend must not come up
    /// half-initialized.
    pub async fn connect(config: &BackendConfig) -> Result<Self> {
        config.validate()?;

        let user_query = config
            .userquery
            .clone()
            .ok_or_else(|| AuthzError::Config("Mandatory option 'userquery' is missing".to_string()))?;

        let mut options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port);
        if let Some(user) = &config.user {
            options = options.username(user);
        }
        if let Some(pass) = &config.pass {
            options = options.password(pass);
        }
        if let Some(dbname) = &config.dbname {
            options = options.database(dbname);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| AuthzError::Config(format!("Failed to connect to store: {}", e)))?;

        Ok(Self {
            pool,
            user_query,
            super_query: config.superquery.clone(),
            acl_query: config.aclquery.clone(),
        })
    }

    /// Close the connection pool
    ///
    /// Idempotent; in-flight lookups fail closed once the pool is closed.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Interpret a single-column row as a privilege flag
    ///
    /// Operators store the flag as boolean, integer, or digit text depending
    /// on schema vintage; anything else reads as no privilege.
    fn decode_flag(row: &PgRow) -> bool {
        if let Ok(flag) = row.try_get::<bool, _>(0) {
            return flag;
        }
        if let Ok(flag) = row.try_get::<i64, _>(0) {
            return flag != 0;
        }
        if let Ok(flag) = row.try_get::<i32, _>(0) {
            return flag != 0;
        }
        if let Ok(flag) = row.try_get::<i16, _>(0) {
            return flag != 0;
        }
        if let Ok(flag) = row.try_get::<String, _>(0) {
            return flag.trim().parse::<i64>().map(|v| v != 0).unwrap_or(false);
        }
        false
    }
}

#[async_trait]
impl GrantStore for PgGrantStore {
    async fn fetch_secret(&self, username: &str) -> Result<Option<String>> {
        let rows = sqlx::query(&self.user_query)
            .bind(username)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuthzError::Store(format!("Credential lookup failed: {}", e)))?;

        match rows.len() {
            0 => {
                debug!("No such user {}", username);
                Ok(None)
            }
            1 => {
                let row = &rows[0];
                if row.columns().len() != 1 {
                    return Err(AuthzError::Schema(format!(
                        "userquery returned {} columns, expected 1",
                        row.columns().len()
                    )));
                }
                let secret: String = row.try_get(0).map_err(|e| {
                    AuthzError::Schema(format!("userquery column is not text: {}", e))
                })?;
                Ok(Some(secret))
            }
            n => Err(AuthzError::Schema(format!(
                "userquery returned {} rows, expected 1",
                n
            ))),
        }
    }

    async fn fetch_superuser(&self, username: &str) -> Result<bool> {
        let Some(super_query) = &self.super_query else {
            return Ok(false);
        };

        let rows = sqlx::query(super_query)
            .bind(username)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuthzError::Store(format!("Superuser lookup failed: {}", e)))?;

        // Anything other than exactly one single-column row is no privilege.
        if rows.len() != 1 {
            return Ok(false);
        }
        let row = &rows[0];
        if row.columns().len() != 1 {
            warn!("superquery returned {} columns, expected 1", row.columns().len());
            return Ok(false);
        }

        Ok(Self::decode_flag(row))
    }

    async fn fetch_grants(&self, username: &str, access: AccessType) -> Result<Vec<String>> {
        let Some(acl_query) = &self.acl_query else {
            return Ok(Vec::new());
        };

        let mut query = sqlx::query(acl_query).bind(username);
        // The template may filter by access kind server-side ($2) or return
        // all grants and leave filtering to the operator's schema.
        if acl_query.contains("$2") {
            query = query.bind(access.mask());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AuthzError::Store(format!("Grant lookup failed: {}", e)))?;

        let mut patterns = Vec::with_capacity(rows.len());
        for row in &rows {
            if row.columns().len() != 1 {
                return Err(AuthzError::Schema(format!(
                    "aclquery returned {} columns, expected 1",
                    row.columns().len()
                )));
            }
            let pattern: String = row.try_get(0).map_err(|e| {
                AuthzError::Schema(format!("aclquery column is not text: {}", e))
            })?;
            patterns.push(pattern);
        }

        debug!("Fetched {} grant patterns for {}", patterns.len(), username);
        Ok(patterns)
    }
}
