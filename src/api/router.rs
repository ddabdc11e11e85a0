//! HTTP router.
//!
//! Every route is public. Layers (outermost first): CORS, access log.

use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::analysis::SOURCE_HEADER;
use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Permissive CORS: any origin and header, the source header exposed.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(SOURCE_HEADER)])
}

/// Build the API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/analyze", post(endpoints::analyze::analyze))
        .route(
            "/feedback",
            get(endpoints::feedback::list).post(endpoints::feedback::create),
        )
        .route("/feedback/likes", get(endpoints::feedback::liked))
        .route("/feedback/:id/like", post(endpoints::feedback::toggle_like))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::access_log::log_access))
        .layer(cors_layer())
}
