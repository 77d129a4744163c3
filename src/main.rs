mod cities;
mod cli;
mod collector;
mod config;
mod data;
mod schedule;
mod store;

use anyhow::{bail, Context, Result};
use chrono::Timelike;
use clap::Parser;
use tracing::{error, info};

use cli::{Cli, Commands};
use collector::Collector;
use config::Config;
use data::forecast::ForecastClient;
use data::kalshi::KalshiClient;
use data::types::TargetDay;
use store::ObservationLog;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    cities::validate()?;

    info!("🌡️ Temperature market logger starting...");
    info!("Reference clock: {}", schedule::REFERENCE_ZONE);

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(config.http.timeout_secs))
        .build()
        .context("Failed to build HTTP client")?;

    let collector = Collector::new(
        ForecastClient::new(
            http.clone(),
            config.endpoints.forecast.clone(),
            config.endpoints.ensemble.clone(),
        ),
        KalshiClient::new(http, config.endpoints.market.clone()),
    );
    let log = ObservationLog::new(&config.system.log_path);
    info!("Log file: {}", log.path().display());

    match cli.command {
        None | Some(Commands::Schedule) => run_scheduled_hour(&collector, &log).await,
        Some(Commands::Collect { city, tomorrow, dry_run }) => {
            let Some(city) = cities::lookup(&city) else {
                bail!("unknown city code: {city}");
            };
            let day = if tomorrow { TargetDay::Tomorrow } else { TargetDay::Today };
            collector.run_task(&log, city, day, dry_run).await?;
            Ok(())
        }
    }
}

async fn run_scheduled_hour(collector: &Collector, log: &ObservationLog) -> Result<()> {
    let now = schedule::reference_now();
    let hour = now.hour();
    let tasks = schedule::tasks_for_hour(hour);

    if tasks.is_empty() {
        info!(hour, "No data points scheduled for this hour");
        return Ok(());
    }

    info!(hour, count = tasks.len(), "Running scheduled collections");

    let mut failures = 0usize;
    for task in tasks {
        let Some(city) = cities::lookup(task.city) else {
            error!(city = task.city, "Scheduled city missing from the static table");
            failures += 1;
            continue;
        };
        // One city's failure must not starve the rest of the hour's batch;
        // its record is simply never appended.
        if let Err(err) = collector.run_task(log, city, task.day, false).await {
            error!(city = city.code, "Collection failed: {err:#}");
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} scheduled collections failed", tasks.len());
    }
    Ok(())
}
