pub mod capture;
pub mod health;
pub mod metrics_handler;
pub mod view;

use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

use crate::{config::Config, store::RequestStore};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RequestStore>,
    /// Mirror captured requests to stdout
    pub console: bool,
    /// `host:port` used in acknowledgments when the client sent no Host header
    pub public_addr: String,
    pub max_body_bytes: usize,
    pub metrics: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<RequestStore>,
        metrics: Option<Arc<PrometheusHandle>>,
    ) -> Self {
        Self {
            store,
            console: config.console.enabled,
            public_addr: format!("{}:{}", config.server.host, config.server.port),
            max_body_bytes: config.server.max_body_bytes,
            metrics,
        }
    }
}
