//! Schema bootstrap.
//!
//! Every table is created with `IF NOT EXISTS` and applied migrations are
//! tracked, so running this on each start is a no-op once the schema exists.

use anyhow::{anyhow, Context, Result};
use diesel::{migration::MigrationSource, sqlite::Sqlite, Connection, SqliteConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

/// Embed migrations into binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// Run all pending migrations against the database at `url`.
pub async fn run(url: &str) -> Result<()> {
    let url = url.to_string();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let mut conn = SqliteConnection::establish(&url)
            .with_context(|| format!("Cannot connect to database {url}"))?;

        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| anyhow!(e))
            .context("Could not run migrations")?;

        tracing::info!(count = applied.len(), "Database schema is up to date");

        Ok(())
    })
    .await?
}

/// Version of the newest embedded migration.
pub fn latest_version() -> Result<Option<String>> {
    let migrations = MigrationSource::<Sqlite>::migrations(&MIGRATIONS).map_err(|e| anyhow!(e))?;

    Ok(migrations
        .iter()
        .map(|migration| migration.name().version().to_string())
        .max())
}
