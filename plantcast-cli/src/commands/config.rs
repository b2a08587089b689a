//! Config command - manage configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use plantcast_store::{Config, StoreError};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Write a default config file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Init { force } => init_config(cli, *force).await,
        ConfigAction::Reset => reset_config(cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let config = Config::load_from(&cli.config_path()).await?;

    match cli.format {
        OutputFormat::Text => {
            println!("Plantcast Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("API base URL:   {}", config.api.base_url);
            println!("Timeout:        {}s", config.api.timeout_secs);
            println!("Batch size:     {}", config.fetch.batch_size);
            println!("Cooldown (429): {}s", config.fetch.rate_limit_cooldown_secs);
            match config.fetch.max_rate_limit_restarts {
                Some(max) => println!("Max restarts:   {max}"),
                None => println!("Max restarts:   unbounded"),
            }
            println!("Log level:      {}", config.log_level.as_str());
            println!();
            println!("Plants ({}):", config.plants.len());
            for plant in &config.plants {
                println!("  • {plant}");
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config)?);
        }
    }

    Ok(())
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_path = cli.config_path();
    let config_dir = config_path
        .parent()
        .map(|p| p.display().to_string())
        .unwrap_or_default();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {config_dir}");
            println!("Config file: {}", config_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir,
                "config_file": config_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(cli: &Cli, force: bool) -> Result<()> {
    let path = cli.config_path();

    match Config::init_at(&path, force).await {
        Ok(_) => {
            info!(path = %path.display(), "Config initialized");
            println!("Wrote default configuration to {}", path.display());
            Ok(())
        }
        Err(StoreError::AlreadyExists(_)) => {
            anyhow::bail!("{} already exists; use --force to overwrite", path.display())
        }
        Err(e) => Err(e.into()),
    }
}

async fn reset_config(cli: &Cli) -> Result<()> {
    let path = cli.config_path();

    if tokio::fs::try_exists(&path).await? {
        tokio::fs::remove_file(&path).await?;
        info!(path = %path.display(), "Config reset");
        println!("Configuration reset to defaults");
    } else {
        println!("No configuration file to reset");
    }

    Ok(())
}
