use anyhow::Result;
use axum::{
    routing::{any, get},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Config,
    handlers::{self, AppState},
    metrics,
    signals::setup_signal_handlers,
    store::RequestStore,
};

/// Start the request inspector
///
/// This function:
/// 1. Builds the request store from the configured capacity
/// 2. Initializes metrics (when enabled)
/// 3. Sets up signal handlers for graceful shutdown
/// 4. Binds to the configured address and serves until shutdown
pub async fn start_server(config: Config) -> Result<()> {
    let capacity = config.store.capacity()?;
    let store = Arc::new(RequestStore::new(capacity));

    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics()?))
    } else {
        None
    };

    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    let state = AppState::new(&config, store, metrics_handle);
    let app = create_router(&config, state);

    let addr = SocketAddr::from((config.server.ip()?, config.server.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    info!("Black hole listening on {}", local_addr);
    info!("Maximum requests to store: {}", capacity);
    info!("Send any HTTP request to http://{}/some/path", local_addr);
    info!("View captured requests at http://{}/", local_addr);
    if config.console.enabled {
        info!("Console mirror enabled");
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = shutdown_rx.recv().await;
        info!("Shutdown signal received, draining connections...");
    })
    .await?;

    signal_handle.abort();
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router
///
/// `/` renders the panel and `/favicon.ico` is ignored. Health and (when
/// enabled) metrics get reserved paths. Everything else is captured.
pub fn create_router(config: &Config, state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", any(handlers::view::show_panel))
        .route("/favicon.ico", any(handlers::health::favicon))
        .route("/_health", get(handlers::health::health_check));

    if config.metrics.enabled {
        router = router.route(
            &config.metrics.endpoint,
            get(handlers::metrics_handler::render_metrics),
        );
    }

    router
        .fallback(handlers::capture::capture_request)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
