use anyhow::Result;
use blackhole::{config::{self, ConfigOverrides}, init_tracing, server};
use std::path::Path;
use tracing::info;

/// Execute the start command
///
/// This will:
/// 1. Load and validate configuration (a bad capacity stops here)
/// 2. Initialize logging
/// 3. Start the server
pub async fn execute(config_path: &Path, overrides: &ConfigOverrides) -> Result<()> {
    let cfg = config::load_config(config_path, overrides)?;

    init_tracing(&cfg.server.log_level, &cfg.server.log_format);
    info!(
        config = %config_path.display(),
        capacity = cfg.store.capacity,
        "Starting black hole"
    );

    // Blocks until shutdown
    server::start_server(cfg).await?;

    Ok(())
}
