use anyhow::{Context, Result};
use clap::Parser;
use textcomplete::{
    cli::{Cli, Commands, handle_complete, handle_config},
    config::AutocompleteConfig,
    console::{console, init_console},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `config` subcommands may target a file that does not exist yet
    let creating = matches!(cli.command, Commands::Config { .. });
    let config = match &cli.config {
        Some(path) if creating && !path.exists() => AutocompleteConfig::default(),
        Some(path) => AutocompleteConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AutocompleteConfig::load().unwrap_or_default(),
    };

    // CLI flags take precedence over the configured verbosity
    let effective_verbosity = cli.get_effective_verbosity(config.get_verbosity());
    init_console(effective_verbosity);
    console().debug(&format!("Trigger pattern: {}", config.trigger));

    match cli.command {
        Commands::Complete(args) => {
            handle_complete(args, &config).await?;
        }
        Commands::Config { action } => {
            handle_config(action, &config, cli.config.as_deref())?;
        }
    }

    Ok(())
}
