use axum::{extract::State, http::StatusCode, response::IntoResponse};

use super::AppState;
use crate::{error::AppError, metrics};

/// Handle the metrics endpoint
pub async fn render_metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::Internal("metrics recorder not installed".to_string()))?;

    metrics::update_store_gauges(&state.store.stats());
    Ok((StatusCode::OK, handle.render()))
}
