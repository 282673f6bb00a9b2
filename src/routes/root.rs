//! Root greeting route.

use crate::{common::MessageResponse, error::AppResult};
use axum::{self, http::StatusCode, Json};

/// Greeting served at `/`
pub const GREETING: &str = "Hello world This is a test for the FastAPI application.";

/// GET handler confirming the API is reachable
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Greeting", body = MessageResponse),
    )
)]
pub async fn get() -> AppResult<(StatusCode, Json<MessageResponse>)> {
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: GREETING.to_string(),
        }),
    ))
}
