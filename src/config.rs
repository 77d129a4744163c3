use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_log_path")]
    pub log_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    #[serde(default = "default_forecast_url")]
    pub forecast: String,
    #[serde(default = "default_ensemble_url")]
    pub ensemble: String,
    #[serde(default = "default_market_url")]
    pub market: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_log_path() -> String {
    "data_log.json".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_ensemble_url() -> String {
    "https://ensemble-api.open-meteo.com/v1/ensemble".to_string()
}

fn default_market_url() -> String {
    "https://api.elections.kalshi.com/trade-api/v2".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self { log_path: default_log_path() }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            forecast: default_forecast_url(),
            ensemble: default_ensemble_url(),
            market: default_market_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs() }
    }
}

impl Config {
    /// An absent file means defaults; a present but malformed file is fatal.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn absent_file_loads_defaults() {
        let config = Config::load("definitely/not/here.toml").unwrap();
        assert_eq!(config.system.log_path, "data_log.json");
        assert_eq!(config.http.timeout_secs, 10);
        assert!(config.endpoints.market.contains("kalshi"));
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[system]\nlog_path = \"elsewhere.json\"").unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.system.log_path, "elsewhere.json");
        assert_eq!(config.http.timeout_secs, 10);
    }

    #[test]
    fn malformed_file_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not = [valid").unwrap();

        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }
}
