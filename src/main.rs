//! MVPForge binary entry point

use anyhow::Result;
use clap::Parser;

use mvpforge::cli::{Cli, Command};
use mvpforge::config::Config;
use mvpforge::handlers::{self, OutputFormat};
use mvpforge::telemetry;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_or_create()?,
    };

    telemetry::init_telemetry_with_level(&config.core.log_level);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command {
        Command::Run {
            date,
            max_per_category,
        } => handlers::handle_run(&config, date, max_per_category, format).await,
        Command::Latest => handlers::handle_latest(&config, format).await,
        Command::Show { date } => handlers::handle_show(&config, &date, format).await,
    }
}
