use anyhow::{bail, Result};

use crate::data::types::Direction;

/// One temperature-market city. The set is closed: codes, coordinates,
/// ensemble suites, and series tickers are fixed at compile time.
#[derive(Debug, Clone, Copy)]
pub struct City {
    pub code: &'static str,
    pub latitude: f64,
    pub longitude: f64,
    /// Ensemble suite requested from the ensemble forecast endpoint.
    pub ensemble_model: &'static str,
    pub high_series: &'static str,
    pub low_series: &'static str,
}

impl City {
    pub fn series(&self, direction: Direction) -> &'static str {
        match direction {
            Direction::High => self.high_series,
            Direction::Low => self.low_series,
        }
    }
}

// Coordinates are the exchange's settlement stations, not city centers.
pub static CITIES: [City; 7] = [
    City {
        code: "la",
        latitude: 33.93816,
        longitude: -118.38660,
        ensemble_model: "ecmwf_ifs025",
        high_series: "KXHIGHLAX",
        low_series: "KXLOWTLAX",
    },
    City {
        code: "den",
        latitude: 39.76746,
        longitude: -104.86948,
        ensemble_model: "gfs_seamless",
        high_series: "KXHIGHDEN",
        low_series: "KXLOWTDEN",
    },
    City {
        code: "ny",
        latitude: 40.77898,
        longitude: -73.96925,
        ensemble_model: "ecmwf_ifs025",
        high_series: "KXHIGHNY",
        low_series: "KXLOWTNY",
    },
    City {
        code: "chi",
        latitude: 41.78412,
        longitude: -87.75514,
        ensemble_model: "ecmwf_ifs025",
        high_series: "KXHIGHCHI",
        low_series: "KXLOWTCHI",
    },
    City {
        code: "mia",
        latitude: 25.78805,
        longitude: -80.31694,
        ensemble_model: "ecmwf_ifs025",
        high_series: "KXHIGHMIA",
        low_series: "KXLOWTMIA",
    },
    City {
        code: "aus",
        latitude: 30.18304,
        longitude: -97.67987,
        ensemble_model: "gfs_seamless",
        high_series: "KXHIGHAUS",
        low_series: "KXLOWTAUS",
    },
    City {
        code: "phil",
        latitude: 39.87326,
        longitude: -75.22681,
        ensemble_model: "ecmwf_ifs025",
        high_series: "KXHIGHPHIL",
        low_series: "KXLOWTPHIL",
    },
];

pub fn lookup(code: &str) -> Option<&'static City> {
    CITIES.iter().find(|city| city.code == code)
}

/// Startup sanity check on the static table; fails fast before any network
/// call if an entry is incomplete.
pub fn validate() -> Result<()> {
    for city in &CITIES {
        if !(-90.0..=90.0).contains(&city.latitude)
            || !(-180.0..=180.0).contains(&city.longitude)
        {
            bail!("city {}: coordinates out of range", city.code);
        }
        if city.ensemble_model.is_empty() {
            bail!("city {}: no ensemble model configured", city.code);
        }
        for series in [city.high_series, city.low_series] {
            if series.is_empty() || series != series.to_uppercase() {
                bail!("city {}: malformed series ticker {:?}", city.code, series);
            }
        }
    }

    let mut codes: Vec<_> = CITIES.iter().map(|city| city.code).collect();
    codes.sort_unstable();
    codes.dedup();
    if codes.len() != CITIES.len() {
        bail!("duplicate city codes in static table");
    }

    Ok(())
}
