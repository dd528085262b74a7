pub mod health;

use axum::{
    http::{HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    timeout::TimeoutLayer,
};

use crate::errors::AppError;
use crate::proposal::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.frontend_origin.clone());
    let request_timeout = state.config.request_timeout;

    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/proposals/diagram-types",
            get(handlers::handle_diagram_types),
        )
        .route(
            "/api/v1/proposals/prompts",
            post(handlers::handle_preview_prompts),
        )
        .route("/api/v1/proposals/generate", post(handlers::handle_generate))
        // Timeout drops the handler future, cancelling in-flight generation calls.
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(timeout_error_body))
        .layer(cors)
        .with_state(state)
}

/// CORS restricted to the configured frontend origin.
/// Any method and header is allowed from it; credentials are allowed, so
/// methods and headers are mirrored rather than wildcarded.
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// The timeout layer answers with a bare 408; give it the usual error body.
async fn timeout_error_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!("Request timed out; in-flight generation calls were cancelled");
        return AppError::Timeout.into_response();
    }
    response
}
