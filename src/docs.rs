//! OpenAPI doc generation.

use crate::{
    common::{
        AccountCreated, AccountCreationRequest, DetailResponse, MessageResponse, StatusResponse,
    },
    error::AppError,
    models::account::AccountProfile,
    routes::{account, health, root},
};
use utoipa::OpenApi;

/// API documentation generator.
#[derive(OpenApi)]
#[openapi(
    paths(
        root::get,
        health::health,
        health::healthcheck,
        account::create_account,
        account::list_accounts,
        account::get_account,
        account::delete_account,
    ),
    components(
        schemas(
            AppError,
            AccountCreationRequest,
            AccountCreated,
            AccountProfile,
            DetailResponse,
            MessageResponse,
            StatusResponse,
            health::HealthcheckResponse
        )
    )
)]

/// Tied to OpenAPI documentation.
#[derive(Debug)]
pub struct ApiDoc;
