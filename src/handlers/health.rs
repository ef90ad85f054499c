use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

use super::AppState;
use crate::store::StoreStats;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    #[serde(flatten)]
    pub store: StoreStats,
}

/// Health check endpoint
/// Returns 200 OK with the store occupancy
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            service: "blackhole",
            version: env!("CARGO_PKG_VERSION"),
            store: state.store.stats(),
        }),
    )
}

/// Browsers ask for this on every page load; answer without capturing it
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CapturedRequest, HeaderList, RequestStore};
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    fn create_test_state() -> AppState {
        AppState {
            store: Arc::new(RequestStore::new(NonZeroUsize::new(4).unwrap())),
            console: false,
            public_addr: "127.0.0.1:8080".to_string(),
            max_body_bytes: 1024,
            metrics: None,
        }
    }

    #[tokio::test]
    async fn test_health_check_reports_store() {
        let state = create_test_state();
        state.store.capture(CapturedRequest {
            method: "GET".to_string(),
            path: "/ping".to_string(),
            query: None,
            protocol_version: "HTTP/1.1".to_string(),
            headers: HeaderList::new(),
            body: Vec::new(),
            remote_address: "127.0.0.1:1".to_string(),
        });

        let response = health_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["retained"], 1);
        assert_eq!(json["capacity"], 4);
    }

    #[tokio::test]
    async fn test_favicon_is_no_content() {
        assert_eq!(favicon().await, StatusCode::NO_CONTENT);
    }
}
