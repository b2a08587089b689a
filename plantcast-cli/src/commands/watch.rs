//! Watch command - periodic forecast refresh.

use std::io::{Write, stdout};

use anyhow::Result;
use chrono::Local;
use clap::Args;
use plantcast_fetch::{FetchContext, Session};
use plantcast_store::Config;
use tokio::time::{Duration, interval};
use tracing::{info, warn};

use super::forecast::{DaySelection, fetch_days, login, print_forecast, select_plants};
use crate::Cli;
use crate::output::TextFormatter;

/// Shortest allowed refresh interval, in seconds.
pub const MIN_INTERVAL_SECS: u64 = 60;

/// Arguments for watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Refresh interval in seconds (minimum 60).
    #[arg(long, short, default_value = "300")]
    pub interval: u64,

    /// Day(s) to fetch.
    #[arg(long, short, value_enum, default_value_t = DaySelection::Today)]
    pub day: DaySelection,

    /// Plants to fetch, comma-separated. Defaults to the whole catalog.
    #[arg(long, short, value_delimiter = ',')]
    pub plants: Vec<String>,

    /// Show the table only.
    #[arg(long)]
    pub no_chart: bool,
}

/// Returns the interval actually used.
pub fn effective_interval(requested: u64) -> u64 {
    requested.max(MIN_INTERVAL_SECS)
}

/// Runs the watch command.
pub async fn run(args: &WatchArgs, cli: &Cli, config: &Config) -> Result<()> {
    let refresh_interval = effective_interval(args.interval);
    let plants = select_plants(&args.plants, config.plant_codes())?;
    let credentials = cli.credentials()?;
    let ctx = FetchContext::new(config.fetch_settings())?;
    let formatter = TextFormatter::new(!cli.no_color);

    info!(interval = refresh_interval, "Starting watch mode");

    let mut session: Option<Session> = Some(login(&ctx, &credentials).await?);
    let mut ticker = interval(Duration::from_secs(refresh_interval));

    loop {
        ticker.tick().await;

        // Clear screen
        print!("\x1b[2J\x1b[H");
        stdout().flush()?;
        println!(
            "{}",
            formatter.format_watch_header(&Local::now().format("%H:%M:%S").to_string(), refresh_interval)
        );
        println!();

        if session.is_none() {
            match login(&ctx, &credentials).await {
                Ok(s) => session = Some(s),
                Err(e) => {
                    println!("{}", formatter.format_error("Login", &format!("{e:#}")));
                    continue;
                }
            }
        }

        if let Some(active) = session.as_mut() {
            let today = Local::now().date_naive();
            match fetch_days(&ctx, active, &plants, args.day.days(), today).await {
                Ok(days) => print_forecast(&days, &plants, !args.no_chart, cli)?,
                Err(e) => {
                    if crate::ExitCode::for_error(&e) == crate::ExitCode::AuthFailure {
                        warn!("Session lost, logging in again on next refresh");
                        session = None;
                    }
                    println!("{}", formatter.format_error("Fetch", &format!("{e:#}")));
                }
            }
        }

        println!();
        println!("Press Ctrl+C to exit");
    }
}
