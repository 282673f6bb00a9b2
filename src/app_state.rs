//! The Axum Application State

use crate::db::Pool;
use anyhow::{anyhow, Result};

#[derive(Clone, Debug)]
/// Global application route state.
///
/// Built explicitly at startup (or per test) and handed to the router, so
/// every handler reaches storage through this handle only.
pub struct AppState {
    /// The database pool
    pub db_pool: Pool,
    /// Version of the newest embedded migration, compared against the
    /// database in the healthcheck
    pub db_version: Option<String>,
}

/// Builder for [`AppState`]
#[derive(Debug, Default)]
pub struct AppStateBuilder {
    db_pool: Option<Pool>,
    db_version: Option<String>,
}

impl AppStateBuilder {
    /// Finalize the builder and return the [`AppState`]
    pub fn finalize(self) -> Result<AppState> {
        let db_pool = self.db_pool.ok_or_else(|| anyhow!("db_pool is required"))?;

        Ok(AppState {
            db_pool,
            db_version: self.db_version,
        })
    }

    /// Set the database pool
    pub fn with_db_pool(mut self, db_pool: Pool) -> Self {
        self.db_pool = Some(db_pool);
        self
    }

    /// Set the schema version the database is expected to be at
    pub fn with_db_version(mut self, db_version: Option<String>) -> Self {
        self.db_version = db_version;
        self
    }
}
