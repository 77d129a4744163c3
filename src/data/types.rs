use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    High,
    Low,
}

impl Direction {
    /// Name of the daily aggregate series this direction maps to upstream.
    pub fn daily_field(self) -> &'static str {
        match self {
            Direction::High => "temperature_2m_max",
            Direction::Low => "temperature_2m_min",
        }
    }
}

/// Which settlement day a collection targets, relative to the reference clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetDay {
    Today,
    Tomorrow,
}

/// Point forecast for the next two days, in Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastPair {
    pub today: f64,
    pub tomorrow: f64,
}

impl ForecastPair {
    pub fn select(&self, day: TargetDay) -> f64 {
        match day {
            TargetDay::Today => self.today,
            TargetDay::Tomorrow => self.tomorrow,
        }
    }
}

/// Raw per-member ensemble values, in response order. Members are never
/// reduced to an aggregate at collection time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnsembleForecast {
    pub today: Vec<f64>,
    pub tomorrow: Vec<f64>,
}

impl EnsembleForecast {
    pub fn into_day(self, day: TargetDay) -> Vec<f64> {
        match day {
            TargetDay::Today => self.today,
            TargetDay::Tomorrow => self.tomorrow,
        }
    }
}

/// Implied "yes" price of a contract, derived from the best "no" ask.
///
/// `Missing` keeps "no derivable price" distinct from a real price in code,
/// while serializing to the historical wire sentinel `-1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Implied(f64),
    Missing,
}

impl Price {
    pub fn as_points(self) -> f64 {
        match self {
            Price::Implied(points) => points,
            Price::Missing => -1.0,
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_points())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f64::deserialize(deserializer)?;
        if raw < 0.0 {
            Ok(Price::Missing)
        } else {
            Ok(Price::Implied(raw))
        }
    }
}

/// One line of the append-only log: both forecasts and both price maps for a
/// single (city, target day) collection. Never mutated after being written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub city: String,
    pub timestamp: DateTime<FixedOffset>,
    pub high_single: f64,
    pub high_ensemble: Vec<f64>,
    pub high_prices: BTreeMap<String, Price>,
    pub low_single: f64,
    pub low_ensemble: Vec<f64>,
    pub low_prices: BTreeMap<String, Price>,
}
