use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Json},
};
use serde_json::json;
use std::sync::Arc;

use super::AppState;
use crate::api::errors::ApiError;
use crate::services::processing::StatsRefreshService;

/// Starts a statistics refresh in the background and answers right away
pub async fn admin_refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    authorize(&state, &headers)?;

    let service = StatsRefreshService::new(state.config.clone(), state.pool.clone());
    tokio::task::spawn_blocking(move || {
        log::info!("Admin triggered refresh started");
        match service.run() {
            Ok(summary) => log::info!(
                "Admin triggered refresh completed: {} matches in {:.2?}",
                summary.matches_processed,
                summary.elapsed
            ),
            Err(e) => log::error!("Admin triggered refresh failed: {:?}", e),
        }
    });

    Ok((StatusCode::ACCEPTED, Json(json!({ "detail": "Refresh triggered" }))))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let expected = state
        .config
        .server
        .admin_token
        .as_deref()
        .ok_or(ApiError::Unauthorized)?;
    let provided = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if provided == Some(expected) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}
