use axum::{
    extract::{Query, State},
    response::Html,
};
use std::sync::Arc;

use super::AppState;
use crate::{error::AppError, render, store::RequestRecord};

const VIEW_ID_PARAM: &str = "view_id";

#[derive(Debug, Default)]
pub struct ViewParams {
    pub view_id: Option<String>,
}

impl ViewParams {
    /// Collect panel parameters from decoded query pairs. A repeated
    /// `view_id` keeps its first value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let view_id = pairs
            .into_iter()
            .find(|(name, _)| name == VIEW_ID_PARAM)
            .map(|(_, value)| value);
        Self { view_id }
    }

    /// The requested identity; anything that is not a non-negative integer
    /// counts as no request at all
    pub fn requested_id(&self) -> Option<u64> {
        self.view_id
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| raw.parse().ok())
    }
}

/// Render the inspection panel
pub async fn show_panel(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Html<String>, AppError> {
    let params = ViewParams::from_pairs(pairs);
    let requested = params
        .requested_id()
        .and_then(|id| state.store.get_by_id(id));
    let requests = state.store.list_newest_first();

    let selected = select_record(&requests, requested);

    tracing::debug!(
        requested = ?params.view_id,
        selected = ?selected.as_ref().map(|r| r.id),
        listed = requests.len(),
        "Rendering panel"
    );

    let page = render::render_panel(&requests, selected.as_deref())?;
    Ok(Html(page))
}

/// Pick the record to show: the looked-up one if it resolved, otherwise the
/// newest entry of the snapshot
pub fn select_record(
    snapshot: &[Arc<RequestRecord>],
    requested: Option<Arc<RequestRecord>>,
) -> Option<Arc<RequestRecord>> {
    requested.or_else(|| snapshot.first().cloned())
}
