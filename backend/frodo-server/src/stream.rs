use crate::AppState;

use frodo_hub::{ChannelName, HubError};

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use log::{debug, warn};

/// GET /{channel} - stream every payload published to the channel as SSE
pub async fn subscribe(State(state): State<AppState>, Path(channel): Path<String>) -> Response {
    let channel = match ChannelName::parse(&channel) {
        Ok(channel) => channel,
        Err(e) => {
            debug!("Rejected subscription: {e}");
            return (StatusCode::BAD_REQUEST, "invalid channel name").into_response();
        }
    };

    let subscription = match state.hub.subscribe(channel).await {
        Ok(subscription) => subscription,
        Err(e @ HubError::HubClosed { .. }) => {
            debug!("Rejected subscription: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "shutting down").into_response();
        }
        Err(e) => {
            warn!("Subscription failed: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let mut shutdown_guard = state.shutdown.subscribe_guard();
    let events = subscription
        .into_stream()
        .take_until(async move { shutdown_guard.wait().await })
        .map(|payload| Ok::<_, Infallible>(payload_event(&payload)));

    Sse::new(events)
        .keep_alive(KeepAlive::new().interval(state.keep_alive))
        .into_response()
}

/// One `data:` event per payload; line breaks become separate data lines
fn payload_event(payload: &Arc<str>) -> Event {
    if payload.contains('\r') {
        Event::default().data(payload.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Event::default().data(&**payload)
    }
}
