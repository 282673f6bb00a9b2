//! Helpers for running isolated webserver instances
use crate::{
    app_state::{AppState, AppStateBuilder},
    db::{self, migrations, Conn},
    router::setup_app_router,
};
use anyhow::Result;
use axum::Router;
use std::path::PathBuf;
use uuid::Uuid;

/// A router wired to its own throwaway SQLite database file
#[derive(Debug)]
pub(crate) struct TestContext {
    app: Router,
    app_state: AppState,
    db_path: PathBuf,
}

impl TestContext {
    /// Create a new test context
    pub(crate) async fn new() -> Result<Self> {
        let db_path = std::env::temp_dir().join(format!(
            "meter_server_test_{}.db",
            Uuid::new_v4().simple()
        ));
        let db_url = db_path.display().to_string();

        migrations::run(&db_url).await?;

        let db_pool = db::pool(&db_url, 5, 4).await?;

        let app_state = AppStateBuilder::default()
            .with_db_pool(db_pool)
            .with_db_version(migrations::latest_version()?)
            .finalize()?;

        let app = setup_app_router(app_state.clone());

        Ok(Self {
            app,
            app_state,
            db_path,
        })
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) async fn get_db_conn(&self) -> Result<Conn<'_>> {
        db::connect(&self.app_state.db_pool).await
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.db_path) {
            tracing::warn!(%err, path = ?self.db_path, "Could not remove test database");
        }
    }
}
