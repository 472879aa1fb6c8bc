use crate::AppState;

use frodo_hub::HubStats;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

/// Body of GET /api/stats
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Connections held by the store's pool
    pub pool_count: usize,
    #[serde(flatten)]
    pub hub: HubStats,
}

/// GET /api/stats - connection counts, total and per channel
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        pool_count: state.cache.connection_count(),
        hub: state.hub.stats(),
    })
}
