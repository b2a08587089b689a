// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Plantcast CLI - per-plant generation forecasts from the ONS Integra API.
//!
//! # Examples
//!
//! ```bash
//! # Today's forecast for every catalog plant
//! plantcast
//!
//! # Today and tomorrow for two plants, table only
//! plantcast forecast --day both --plants VLAB2,VLFIG --no-chart
//!
//! # JSON output
//! plantcast --format json --pretty
//!
//! # List plants
//! plantcast plants
//!
//! # Watch mode
//! plantcast watch --interval 300
//! ```

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use plantcast_core::Credentials;
use plantcast_fetch::{AuthError, FetchError};
use plantcast_store::{Config, LogLevel};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, forecast, plants, watch};

// ============================================================================
// CLI Definition
// ============================================================================

/// Plantcast CLI - ONS generation forecasts.
#[derive(Parser)]
#[command(name = "plantcast")]
#[command(about = "Per-plant generation forecasts from the ONS Integra API")]
#[command(long_about = r#"
Plantcast logs in to the ONS Integra API and shows the proposed
half-hourly generation for a set of plants, for today and/or tomorrow.

Credentials are read from --user/--password or from the
PLANTCAST_USER and PLANTCAST_PASSWORD environment variables.

Examples:
  plantcast                              # Today, all catalog plants
  plantcast forecast --day both          # Today and tomorrow
  plantcast forecast --plants VLAB2      # Single plant
  plantcast --format json                # JSON output
  plantcast watch --interval 300         # Refresh every 5 minutes
"#)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'forecast' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// API login.
    #[arg(long, short, global = true, env = "PLANTCAST_USER")]
    pub user: Option<String>,

    /// API password.
    #[arg(long, global = true, env = "PLANTCAST_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Returns the config file path in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns the credentials given on the command line or environment.
    pub fn credentials(&self) -> Result<Credentials> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Ok(Credentials::new(user.clone(), password.clone())),
            _ => anyhow::bail!(
                "Missing credentials: pass --user and --password or set PLANTCAST_USER and PLANTCAST_PASSWORD"
            ),
        }
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch and show the forecast (default if no command specified).
    #[command(visible_alias = "f")]
    Forecast(forecast::ForecastArgs),

    /// Re-fetch the forecast periodically.
    #[command(visible_alias = "w")]
    Watch(watch::WatchArgs),

    /// List the plant catalog.
    #[command(visible_alias = "p")]
    Plants,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable table and chart.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
    /// Login rejected or session could not be renewed.
    AuthFailure = 2,
}

impl ExitCode {
    /// Picks the exit code for a failed run.
    pub fn for_error(err: &anyhow::Error) -> Self {
        if let Some(e) = err.downcast_ref::<FetchError>() {
            if e.requires_login() {
                return Self::AuthFailure;
            }
        }
        if let Some(AuthError::Rejected { .. } | AuthError::RenewalRejected { .. }) =
            err.downcast_ref::<AuthError>()
        {
            return Self::AuthFailure;
        }
        Self::Error
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = if verbose {
        EnvFilter::new("plantcast=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("plantcast={}", level.as_str())))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = Config::load_from(&cli.config_path()).await;
    let level = loaded.as_ref().map_or(LogLevel::default(), |c| c.log_level);
    setup_logging(cli.verbose, cli.quiet, level);

    // Config management must work even when the file is broken
    let result = match (&cli.command, loaded) {
        (Some(Commands::Config(args)), _) => config::run(args, &cli).await,
        (_, Ok(config)) => run_command(&cli, &config).await,
        (_, Err(e)) => Err(e.into()),
    };

    if let Err(e) = result {
        if !cli.quiet {
            let formatter = output::TextFormatter::new(!cli.no_color);
            eprintln!("{}", formatter.format_error("Error", &format!("{e:#}")));
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

/// Dispatches commands that need a valid configuration.
async fn run_command(cli: &Cli, config: &Config) -> Result<()> {
    match &cli.command {
        Some(Commands::Forecast(args)) => forecast::run(args, cli, config).await,
        Some(Commands::Watch(args)) => watch::run(args, cli, config).await,
        Some(Commands::Plants) => plants::run(cli, config),
        Some(Commands::Config(args)) => config::run(args, cli).await,
        None => forecast::run(&forecast::ForecastArgs::default(), cli, config).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["plantcast"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "plantcast", "forecast", "--format", "json", "--pretty", "--user", "me",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.pretty);
        assert_eq!(cli.user.as_deref(), Some("me"));
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let cli = Cli::try_parse_from(["plantcast", "--user", "me", "--password", "pw"]).unwrap();
        let creds = cli.credentials().unwrap();
        assert_eq!(creds.login, "me");
        assert_eq!(creds.password, "pw");

        let mut cli = cli;
        cli.password = None;
        assert!(cli.credentials().is_err());
    }

    #[test]
    fn test_empty_credentials_are_left_to_the_server() {
        let cli = Cli::try_parse_from(["plantcast", "--user", "", "--password", ""]).unwrap();
        let creds = cli.credentials().unwrap();
        assert_eq!(creds.login, "");
        assert_eq!(creds.password, "");
    }

    #[test]
    fn test_exit_code_for_auth_failures() {
        let err = anyhow::Error::from(FetchError::AuthRequired { status: 401 });
        assert_eq!(ExitCode::for_error(&err), ExitCode::AuthFailure);

        let err = anyhow::Error::from(AuthError::Rejected { status: 403 });
        assert_eq!(ExitCode::for_error(&err), ExitCode::AuthFailure);

        let err = anyhow::Error::from(FetchError::AuthRequired { status: 401 }).context("today");
        assert_eq!(ExitCode::for_error(&err), ExitCode::AuthFailure);

        let unusable = AuthError::InvalidResponse("empty token".into());
        let err = anyhow::Error::from(FetchError::Auth(unusable)).context("tomorrow");
        assert_eq!(ExitCode::for_error(&err), ExitCode::AuthFailure);
    }

    #[test]
    fn test_exit_code_for_other_failures() {
        let err = anyhow::Error::from(FetchError::UnexpectedStatus { batch: 1, status: 500 });
        assert_eq!(ExitCode::for_error(&err), ExitCode::Error);

        let err = anyhow::anyhow!("something else");
        assert_eq!(ExitCode::for_error(&err), ExitCode::Error);
        assert_eq!(ExitCode::Success as i32, 0);
    }
}
