use crate::{AppState, health, stats, stream};

use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

/// Build the application router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/appstatus", get(health::app_status))
        .route("/api/stats", get(stats::stats))
        // Everything else is a channel subscription
        .route("/{*channel}", get(stream::subscribe))
        .with_state(state)
        // Browsers subscribe from other origins
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
