//! Healthcheck routes.

use crate::{
    app_state::AppState,
    common::StatusResponse,
    db,
    error::AppResult,
};
use axum::{self, extract::State, http::StatusCode, Json};
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A healthcheck response containing diagnostic information for the service
#[derive(ToSchema, Eq, PartialEq, Debug, Deserialize, Serialize)]
pub struct HealthcheckResponse {
    database_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    database_up_to_date: Option<bool>,
}

impl HealthcheckResponse {
    /// Whether the service is healthy
    pub fn is_healthy(&self) -> bool {
        self.database_connected && self.database_up_to_date.unwrap_or_default()
    }

    /// The status code for the healthcheck response
    pub fn status_code(&self) -> StatusCode {
        if self.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET handler for liveness. Never touches the database.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "meter-server is running", body = StatusResponse),
    )
)]
pub async fn health() -> AppResult<(StatusCode, Json<StatusResponse>)> {
    Ok((
        StatusCode::OK,
        Json(StatusResponse {
            status: "ok".to_string(),
        }),
    ))
}

/// GET handler for checking service health, including the database.
#[utoipa::path(
    get,
    path = "/healthcheck",
    responses(
        (status = 200, description = "meter-server healthy", body=HealthcheckResponse),
        (status = 503, description = "meter-server not healthy", body=HealthcheckResponse)
    )
)]
pub async fn healthcheck(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<HealthcheckResponse>)> {
    let (database_connected, database_up_to_date) =
        if let Ok(mut conn) = db::connect(&state.db_pool).await {
            let database_connected = diesel::sql_query("SELECT 1")
                .execute(&mut conn)
                .await
                .is_ok();
            let database_up_to_date = db::schema_version(&mut conn)
                .await
                .map(|version| version == state.db_version)
                .ok();

            (database_connected, database_up_to_date)
        } else {
            (false, None)
        };

    let response = HealthcheckResponse {
        database_connected,
        database_up_to_date,
    };

    Ok((response.status_code(), Json(response)))
}
