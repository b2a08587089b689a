//! Plants command - list the configured plant catalog.

use anyhow::Result;
use plantcast_store::Config;
use tracing::info;

use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the plants command.
pub fn run(cli: &Cli, config: &Config) -> Result<()> {
    let plants = config.plant_codes();
    info!(count = plants.len(), "Listing plants");

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_plants(plants));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&plants)?);
        }
    }

    Ok(())
}
