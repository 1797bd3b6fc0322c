use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use na_core::NewsRequest;

use crate::AppState;

/// `GET /news`. Always answers with a best-effort page; upstream trouble only
/// shows up in the logs.
pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Query(request): Query<NewsRequest>,
) -> impl IntoResponse {
    tracing::debug!(
        "GET /news page={} page_size={} category={:?} query={:?}",
        request.page,
        request.page_size,
        request.category,
        request.query
    );
    Json(state.aggregator.get_news(&request).await)
}
