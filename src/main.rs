use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let overrides = args.overrides();

    match args.get_command() {
        cli::Commands::Start => {
            commands::start::execute(&args.config, &overrides).await?;
        }
        cli::Commands::Config { action } => match action {
            cli::ConfigCommands::Show => commands::config::show(&args.config, &overrides)?,
            cli::ConfigCommands::Validate => {
                commands::config::validate(&args.config, &overrides)?
            }
        },
        cli::Commands::Version => {
            println!("blackhole v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
