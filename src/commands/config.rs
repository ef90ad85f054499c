use anyhow::Result;
use blackhole::config::{self, Config, ConfigOverrides};
use colored::Colorize;
use std::path::Path;

/// Execute the config show command
///
/// Displays the effective configuration after all layers are applied
pub fn show(config_path: &Path, overrides: &ConfigOverrides) -> Result<()> {
    println!("{}", "Loading configuration...".yellow());

    let cfg = config::load_config(config_path, overrides)?;

    println!("{}", "Current Configuration:".green().bold());
    println!();
    println!("{}", toml::to_string_pretty(&cfg)?);

    Ok(())
}

/// Execute the config validate command
pub fn validate(config_path: &Path, overrides: &ConfigOverrides) -> Result<()> {
    println!("{}", "Validating configuration...".yellow());

    let cfg = config::load_config(config_path, overrides)?;

    println!("{}", "✓ Configuration is valid".green());
    println!();
    println!("{}", "Summary:".bold());
    for line in summary(&cfg) {
        println!("  {}", line);
    }

    Ok(())
}

fn summary(cfg: &Config) -> Vec<String> {
    vec![
        format!("Listen: {}:{}", cfg.server.host, cfg.server.port),
        format!("Capacity: {}", cfg.store.capacity),
        format!(
            "Console mirror: {}",
            if cfg.console.enabled { "enabled" } else { "disabled" }
        ),
        if cfg.metrics.enabled {
            format!("Metrics: {}", cfg.metrics.endpoint)
        } else {
            "Metrics: disabled".to_string()
        },
    ]
}
