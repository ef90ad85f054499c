use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request, State},
    http::{header::HOST, request::Parts, StatusCode},
    response::IntoResponse,
};
use std::net::SocketAddr;

use super::AppState;
use crate::{
    console, metrics,
    store::{CapturedRequest, HeaderList},
};

/// Capture any request that is not one of the reserved routes
///
/// The request is normalized, stored, and acknowledged with the identity
/// it was stored under.
pub async fn capture_request(
    State(state): State<AppState>,
    ConnectInfo(remote): ConnectInfo<SocketAddr>,
    request: Request,
) -> impl IntoResponse {
    let (parts, body) = request.into_parts();

    let body = read_body(body, state.max_body_bytes).await;
    let host = host_of(&parts).unwrap_or_else(|| state.public_addr.clone());
    let captured = normalize(&parts, body, remote);

    let result = state.store.capture(captured);
    let record = result.record;

    tracing::debug!(
        id = record.id,
        method = %record.method,
        path = %record.path,
        remote = %record.remote_address,
        "Captured request"
    );
    metrics::record_capture(&record.method);

    if let Some(evicted) = result.evicted {
        tracing::debug!(evicted, "Evicted oldest request");
        metrics::record_eviction();
    }

    if state.console {
        console::print_request(&record);
    }

    (
        StatusCode::OK,
        format!(
            "Request captured successfully. View at http://{}/?view_id={}",
            host, record.id
        ),
    )
}

/// Read the whole body. An unreadable or oversized body is stored as empty.
async fn read_body(body: Body, limit: usize) -> Vec<u8> {
    match to_bytes(body, limit).await {
        Ok(bytes) => bytes.to_vec(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not read request body, storing it as empty");
            Vec::new()
        }
    }
}

fn host_of(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .filter(|host| !host.is_empty())
        .map(str::to_string)
}

/// Turn the wire-level request into a store-ready record draft
fn normalize(parts: &Parts, body: Vec<u8>, remote: SocketAddr) -> CapturedRequest {
    let headers: HeaderList = parts
        .headers
        .iter()
        .map(|(name, value)| {
            let value = match value.to_str() {
                Ok(text) => text.to_string(),
                Err(_) => String::from_utf8_lossy(value.as_bytes()).into_owned(),
            };
            (name.as_str(), value)
        })
        .collect();

    CapturedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(str::to_string),
        protocol_version: format!("{:?}", parts.version),
        headers,
        body,
        remote_address: remote.to_string(),
    }
}
