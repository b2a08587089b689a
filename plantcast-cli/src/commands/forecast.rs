//! Forecast command - log in, fetch the selected days and render them.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, ValueEnum};
use plantcast_core::{Credentials, ForecastDay, ForecastTable, MergedForecast, PlantCode};
use plantcast_fetch::{FetchContext, Session};
use plantcast_store::Config;
use tracing::{debug, info};

use crate::output::{ChartRenderer, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Which days to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DaySelection {
    /// Today only.
    #[default]
    Today,
    /// Tomorrow only.
    Tomorrow,
    /// Today, then tomorrow.
    Both,
}

impl DaySelection {
    /// Returns the days to fetch, in order.
    pub fn days(self) -> &'static [ForecastDay] {
        match self {
            Self::Today => &[ForecastDay::Today],
            Self::Tomorrow => &[ForecastDay::Tomorrow],
            Self::Both => &[ForecastDay::Today, ForecastDay::Tomorrow],
        }
    }
}

/// Arguments for the forecast command.
#[derive(Args, Default)]
pub struct ForecastArgs {
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

/// Forecasts for each requested day, in request order.
pub type DayForecasts = Vec<(ForecastDay, MergedForecast)>;

/// Runs the forecast command.
pub async fn run(args: &ForecastArgs, cli: &Cli, config: &Config) -> Result<()> {
    let plants = select_plants(&args.plants, config.plant_codes())?;
    let credentials = cli.credentials()?;
    let ctx = FetchContext::new(config.fetch_settings())?;

    info!(plants = plants.len(), day = ?args.day, "Fetching forecast");

    let mut session = login(&ctx, &credentials).await?;
    let today = Local::now().date_naive();
    let days = fetch_days(&ctx, &mut session, &plants, args.day.days(), today).await?;

    print_forecast(&days, &plants, !args.no_chart, cli)
}

/// Parses the `--plants` selection against the catalog.
///
/// An empty selection means the whole catalog.
pub fn select_plants(requested: &[String], catalog: &[PlantCode]) -> Result<Vec<PlantCode>> {
    if requested.is_empty() {
        return Ok(catalog.to_vec());
    }

    let mut plants = Vec::new();
    for raw in requested {
        let code: PlantCode = raw.parse()?;
        if !catalog.contains(&code) {
            anyhow::bail!("Unknown plant: {code} (see `plantcast plants`)");
        }
        if !plants.contains(&code) {
            plants.push(code);
        }
    }
    Ok(plants)
}

/// Logs in and opens a session.
pub async fn login(ctx: &FetchContext, credentials: &Credentials) -> Result<Session> {
    let tokens = ctx.token_manager().authenticate(credentials).await?;
    Ok(Session::new(tokens))
}

/// Fetches each day in order, sharing `session` so a renewal carries over.
pub async fn fetch_days(
    ctx: &FetchContext,
    session: &mut Session,
    plants: &[PlantCode],
    days: &[ForecastDay],
    today: NaiveDate,
) -> Result<DayForecasts> {
    let fetcher = ctx.fetcher();
    let mut results = Vec::with_capacity(days.len());

    for day in days {
        let date = day.date_from(today);
        let forecast = fetcher
            .fetch(session, date, plants)
            .await
            .with_context(|| format!("Fetching {} ({date})", day.label()))?;
        debug!(day = %day, records = forecast.len(), "Day fetched");
        results.push((*day, forecast));
    }

    Ok(results)
}

/// Renders fetched days in the selected output format.
pub fn print_forecast(
    days: &DayForecasts,
    plants: &[PlantCode],
    show_chart: bool,
    cli: &Cli,
) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            println!("{}", render_text(days, plants, show_chart, !cli.no_color));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format_forecast(days, plants)?);
        }
    }
    Ok(())
}

/// Renders the table and, optionally, the chart.
pub fn render_text(
    days: &DayForecasts,
    plants: &[PlantCode],
    show_chart: bool,
    use_colors: bool,
) -> String {
    let borrowed: Vec<(ForecastDay, &MergedForecast)> =
        days.iter().map(|(day, forecast)| (*day, forecast)).collect();
    let table = ForecastTable::build(plants, &borrowed);

    let formatter = TextFormatter::new(use_colors);
    if table.is_empty() {
        return formatter.format_no_data();
    }

    let mut out = formatter.format_table(&table);
    if show_chart {
        out.push_str("\n\n");
        out.push_str(&ChartRenderer::new(use_colors).render(&table));
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
