use anyhow::{Context, Result};
use tracing::info;

use crate::cities::City;
use crate::data::forecast::ForecastClient;
use crate::data::kalshi::KalshiClient;
use crate::data::types::{Direction, ObservationRecord, TargetDay};
use crate::schedule;
use crate::store::ObservationLog;

/// Ties the two clients together: one record per (city, target day).
pub struct Collector {
    forecast: ForecastClient,
    kalshi: KalshiClient,
}

impl Collector {
    pub fn new(forecast: ForecastClient, kalshi: KalshiClient) -> Self {
        Self { forecast, kalshi }
    }

    /// One full observation for a city. Every call runs strictly in sequence;
    /// the timestamp is captured once, after the last fetch.
    pub async fn build_record(&self, city: &City, day: TargetDay) -> Result<ObservationRecord> {
        let high_single = self
            .forecast
            .point_forecast(city, Direction::High)
            .await
            .with_context(|| format!("high point forecast for {}", city.code))?;
        let high_ensemble = self
            .forecast
            .ensemble_forecast(city, Direction::High)
            .await
            .with_context(|| format!("high ensemble forecast for {}", city.code))?;

        let low_single = self
            .forecast
            .point_forecast(city, Direction::Low)
            .await
            .with_context(|| format!("low point forecast for {}", city.code))?;
        let low_ensemble = self
            .forecast
            .ensemble_forecast(city, Direction::Low)
            .await
            .with_context(|| format!("low ensemble forecast for {}", city.code))?;

        let token = schedule::date_token(schedule::reference_now().date_naive(), day);
        let high_prices = self
            .kalshi
            .series_prices(city.series(Direction::High), &token)
            .await
            .with_context(|| format!("high contract prices for {}", city.code))?;
        let low_prices = self
            .kalshi
            .series_prices(city.series(Direction::Low), &token)
            .await
            .with_context(|| format!("low contract prices for {}", city.code))?;

        let timestamp = schedule::reference_now().fixed_offset();

        Ok(ObservationRecord {
            city: city.code.to_string(),
            timestamp,
            high_single: high_single.select(day),
            high_ensemble: high_ensemble.into_day(day),
            high_prices,
            low_single: low_single.select(day),
            low_ensemble: low_ensemble.into_day(day),
            low_prices,
        })
    }

    /// Build one record and append it, or on a dry run print it instead of
    /// touching the log.
    pub async fn run_task(
        &self,
        log: &ObservationLog,
        city: &City,
        day: TargetDay,
        dry_run: bool,
    ) -> Result<ObservationRecord> {
        let record = self.build_record(city, day).await?;

        if dry_run {
            println!("{}", serde_json::to_string_pretty(&record)?);
        } else {
            log.append(&record)?;
        }

        info!(city = city.code, day = ?day, dry_run, "Logged data point");
        Ok(record)
    }
}
