//! Database configuration & connections

use std::time::Duration;

use anyhow::{anyhow, Result};
use bb8::PooledConnection;
use diesel::{
    result::ConnectionError, ConnectionResult, ExpressionMethods, OptionalExtension, QueryDsl,
    SqliteConnection,
};
use diesel_async::{
    pooled_connection::{AsyncDieselConnectionManager, ManagerConfig},
    sync_connection_wrapper::SyncConnectionWrapper,
    AsyncConnection, RunQueryDsl, SimpleAsyncConnection,
};
use futures::{future::BoxFuture, FutureExt};

use super::__diesel_schema_migrations;

/// How long a connection waits on a locked database before giving up, in ms
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// The async connection type every query runs against
pub type DbConnection = SyncConnectionWrapper<SqliteConnection>;

/// Type alias for the connection pool
pub type Pool = bb8::Pool<AsyncDieselConnectionManager<DbConnection>>;

/// Type alias for the connection
pub type Conn<'a> = PooledConnection<'a, AsyncDieselConnectionManager<DbConnection>>;

/// Build the database pool
pub async fn pool(url: &str, connect_timeout: u64, max_size: u32) -> Result<Pool> {
    tracing::info!(
        %url,
        %connect_timeout,
        %max_size,
        "Connecting to database via pool",
    );

    let mut config = ManagerConfig::default();
    config.custom_setup = Box::new(establish);

    let manager = AsyncDieselConnectionManager::<DbConnection>::new_with_config(url, config);

    let pool = bb8::Pool::builder()
        .max_size(max_size)
        .connection_timeout(Duration::from_secs(connect_timeout))
        .build(manager)
        .await
        .map_err(|e| anyhow!("Failed to build the database pool: {e}"))?;

    Ok(pool)
}

/// Open a connection and apply per-connection pragmas.
///
/// `SqliteConnection::establish` turns foreign-key enforcement on. It is
/// switched back off here: deleting an account must succeed and leave the
/// meters pointing at its `OAuthID` in place.
fn establish(url: &str) -> BoxFuture<'_, ConnectionResult<DbConnection>> {
    async move {
        let mut conn = DbConnection::establish(url).await?;

        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}; PRAGMA foreign_keys = OFF;"
        ))
        .await
        .map_err(ConnectionError::CouldntSetupConfiguration)?;

        Ok(conn)
    }
    .boxed()
}

/// Establish a connection.
///
/// The connection goes back to the pool when the returned guard is dropped,
/// whether the request using it succeeded or not.
pub async fn connect(pool: &Pool) -> Result<Conn<'_>> {
    tracing::debug!("Creating a db connection from connection pool");
    pool.get()
        .await
        .map_err(|e| anyhow!("Failed to connect to the database: {e}"))
}

/// Get the current schema version
pub async fn schema_version(conn: &mut Conn<'_>) -> Result<Option<String>> {
    __diesel_schema_migrations::table
        .select(__diesel_schema_migrations::version)
        .order(__diesel_schema_migrations::version.desc())
        .first(conn)
        .await
        .optional()
        .map_err(Into::into)
}
