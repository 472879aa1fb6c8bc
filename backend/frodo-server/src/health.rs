use crate::AppState;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::warn;

/// GET / - static identifier
pub async fn index() -> &'static str {
    "Frodo"
}

/// GET /appstatus - dependency health as `status:<bool>,cache:<bool>,broker:<bool>`
pub async fn app_status(State(state): State<AppState>) -> Response {
    let (cache_ok, broker_ok) = tokio::join!(state.cache.ping(), state.broker.ping());
    let status_ok = cache_ok && broker_ok;

    let body = format!("status:{status_ok},cache:{cache_ok},broker:{broker_ok}");

    if status_ok {
        (StatusCode::OK, body).into_response()
    } else {
        warn!("Unhealthy: {body}");
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
