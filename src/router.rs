//! Main [axum::Router] interface for webserver.

use crate::{
    app_state::AppState,
    docs::ApiDoc,
    middleware::{
        logging::{log_request_response, DebugOnlyLogger, DefaultLogger},
        request_ulid::MakeRequestUlid,
        runtime,
    },
    routes::{account, fallback::notfound_404, health, root},
};
use axum::{http::HeaderName, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer, ServiceBuilderExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Request identifier field.
pub const REQUEST_ID: &str = "x-request-id";

/// Setup main router for application.
pub fn setup_app_router(app_state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(root::get))
        .route("/health", get(health::health))
        .route(
            "/accounts/",
            get(account::list_accounts).post(account::create_account),
        )
        .route(
            "/accounts",
            get(account::list_accounts).post(account::create_account),
        )
        .route(
            "/accounts/:account_id",
            get(account::get_account).delete(account::delete_account),
        )
        .fallback(notfound_404)
        .with_state(app_state.clone());

    // Logging layer
    router = router.layer(axum::middleware::from_fn(
        log_request_response::<DefaultLogger>,
    ));

    // Healthcheck layer
    let mut healthcheck_router = Router::new()
        .route("/healthcheck", get(health::healthcheck))
        .with_state(app_state);

    healthcheck_router = healthcheck_router.layer(axum::middleware::from_fn(
        log_request_response::<DebugOnlyLogger>,
    ));

    let req_id = HeaderName::from_static(REQUEST_ID);

    Router::merge(router, healthcheck_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Per-request tracing spans.
        .layer(TraceLayer::new_for_http())
        // Set and propagate "x-request-id" (as a ulid) per request.
        .layer(
            ServiceBuilder::new()
                .set_request_id(req_id.clone(), MakeRequestUlid)
                .propagate_request_id(req_id),
        )
        // Catches runtime panics and converts them into
        // `500 Internal Server` responses.
        .layer(CatchPanicLayer::custom(runtime::catch_panic))
}
