use blackhole::config::{ConfigOverrides, DEFAULT_CONFIG_FILE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "blackhole",
    version,
    about = "HTTP black hole: captures every request and shows it in a browser panel"
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Port for the server to listen on
    #[arg(short, long, global = true)]
    pub port: Option<u16>,

    /// Address to listen on
    #[arg(short, long, global = true)]
    pub listen: Option<String>,

    /// Maximum number of requests to store
    #[arg(short, long, global = true, allow_negative_numbers = true)]
    pub max: Option<i64>,

    /// Print captured requests to the command line
    #[arg(long, global = true)]
    pub cli: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the server (default)
    Start,

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Display the effective configuration
    Show,

    /// Validate configuration file
    Validate,
}

impl Cli {
    /// Get the command to execute, defaulting to Start if none provided
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Start)
    }

    /// Flag values that override file and environment configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.listen.clone(),
            port: self.port,
            capacity: self.max,
            console: self.cli,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_start() {
        let cli = Cli::try_parse_from(["blackhole"]).unwrap();

        assert!(matches!(cli.get_command(), Commands::Start));
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        let overrides = cli.overrides();
        assert!(overrides.port.is_none());
        assert!(overrides.capacity.is_none());
        assert!(!overrides.console);
    }

    #[test]
    fn test_cli_parsing_flags_without_subcommand() {
        let cli = Cli::try_parse_from([
            "blackhole", "--port", "9090", "--listen", "0.0.0.0", "--max", "25", "--cli",
        ])
        .unwrap();

        assert!(matches!(cli.get_command(), Commands::Start));
        let overrides = cli.overrides();
        assert_eq!(overrides.port, Some(9090));
        assert_eq!(overrides.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(overrides.capacity, Some(25));
        assert!(overrides.console);
    }

    #[test]
    fn test_cli_parsing_start_with_flags() {
        let cli = Cli::try_parse_from(["blackhole", "start", "-p", "7000", "-m", "3"]).unwrap();

        assert!(matches!(cli.get_command(), Commands::Start));
        assert_eq!(cli.port, Some(7000));
        assert_eq!(cli.max, Some(3));
    }

    #[test]
    fn test_cli_accepts_negative_max_for_validation() {
        let cli = Cli::try_parse_from(["blackhole", "--max", "-1"]).unwrap();
        assert_eq!(cli.max, Some(-1));
    }

    #[test]
    fn test_cli_parsing_config_show() {
        let cli = Cli::try_parse_from(["blackhole", "config", "show"]).unwrap();

        match cli.get_command() {
            Commands::Config { action } => {
                assert!(matches!(action, ConfigCommands::Show));
            }
            _ => panic!("Expected Config command"),
        }
    }
}
