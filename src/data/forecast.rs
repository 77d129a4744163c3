use indexmap::IndexMap;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::cities::City;
use crate::data::types::{Direction, EnsembleForecast, ForecastPair};
use crate::data::{check_status, FetchError};

/// Client for the forecast API's point and ensemble endpoints.
pub struct ForecastClient {
    client: Client,
    forecast_url: String,
    ensemble_url: String,
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    daily: PointDaily,
}

#[derive(Debug, Default, Deserialize)]
struct PointDaily {
    #[serde(default)]
    temperature_2m_max: Vec<f64>,
    #[serde(default)]
    temperature_2m_min: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct EnsembleResponse {
    // IndexMap keeps the response's key order, which is the only member
    // identity the ensemble carries.
    daily: IndexMap<String, Value>,
}

impl ForecastClient {
    pub fn new(client: Client, forecast_url: String, ensemble_url: String) -> Self {
        Self {
            client,
            forecast_url,
            ensemble_url,
        }
    }

    /// Single-model daily high or low for today and tomorrow.
    pub async fn point_forecast(
        &self,
        city: &City,
        direction: Direction,
    ) -> Result<ForecastPair, FetchError> {
        let response = self
            .client
            .get(&self.forecast_url)
            .query(&base_query(city, direction))
            .send()
            .await?;
        let response = check_status(response).await?;

        let parsed: PointResponse = response.json().await?;
        let series = match direction {
            Direction::High => &parsed.daily.temperature_2m_max,
            Direction::Low => &parsed.daily.temperature_2m_min,
        };
        pair_from_series(series, direction)
    }

    /// Per-member daily highs or lows from the city's configured ensemble
    /// suite, today and tomorrow, member order preserved.
    pub async fn ensemble_forecast(
        &self,
        city: &City,
        direction: Direction,
    ) -> Result<EnsembleForecast, FetchError> {
        let mut query = base_query(city, direction);
        query.push(("models", city.ensemble_model.to_string()));

        let response = self
            .client
            .get(&self.ensemble_url)
            .query(&query)
            .send()
            .await?;
        let response = check_status(response).await?;

        let parsed: EnsembleResponse = response.json().await?;
        extract_members(&parsed.daily)
    }
}

fn base_query(city: &City, direction: Direction) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", city.latitude.to_string()),
        ("longitude", city.longitude.to_string()),
        ("daily", direction.daily_field().to_string()),
        ("timezone", "auto".to_string()),
        ("forecast_days", "2".to_string()),
        ("temperature_unit", "fahrenheit".to_string()),
    ]
}

fn pair_from_series(series: &[f64], direction: Direction) -> Result<ForecastPair, FetchError> {
    match series {
        [today, tomorrow, ..] => Ok(ForecastPair {
            today: *today,
            tomorrow: *tomorrow,
        }),
        _ => Err(FetchError::Schema(format!(
            "daily {} has fewer than 2 entries",
            direction.daily_field()
        ))),
    }
}

/// Every `daily` key naming a temperature series is one ensemble member; keys
/// like `time` are skipped.
fn extract_members(daily: &IndexMap<String, Value>) -> Result<EnsembleForecast, FetchError> {
    let mut members = EnsembleForecast::default();

    for (key, value) in daily {
        if !key.contains("temperature") {
            continue;
        }
        let series = value
            .as_array()
            .ok_or_else(|| FetchError::Schema(format!("member {key} is not an array")))?;
        let (today, tomorrow) = match series.as_slice() {
            [today, tomorrow, ..] => (today, tomorrow),
            _ => {
                return Err(FetchError::Schema(format!(
                    "member {key} has fewer than 2 entries"
                )))
            }
        };
        members.today.push(numeric(key, today)?);
        members.tomorrow.push(numeric(key, tomorrow)?);
    }

    Ok(members)
}

fn numeric(key: &str, value: &Value) -> Result<f64, FetchError> {
    value
        .as_f64()
        .ok_or_else(|| FetchError::Schema(format!("member {key} has a non-numeric entry")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ForecastClient {
        ForecastClient::new(
            Client::new(),
            format!("{}/v1/forecast", server.uri()),
            format!("{}/v1/ensemble", server.uri()),
        )
    }

    #[test]
    fn three_member_response_yields_three_values_per_day_in_order() {
        // Keys deliberately out of alphabetical order so insertion order is
        // what must survive.
        let raw = r#"{
            "daily": {
                "time": ["2024-03-05", "2024-03-06"],
                "temperature_2m_max_member03": [73.0, 70.1],
                "temperature_2m_max_member01": [71.2, 68.4],
                "temperature_2m_max_member02": [72.6, 69.9]
            }
        }"#;
        let parsed: EnsembleResponse = serde_json::from_str(raw).unwrap();
        let members = extract_members(&parsed.daily).unwrap();

        assert_eq!(members.today, vec![73.0, 71.2, 72.6]);
        assert_eq!(members.tomorrow, vec![70.1, 68.4, 69.9]);
    }

    #[test]
    fn null_member_value_is_a_schema_error() {
        let raw = r#"{
            "daily": {
                "time": ["2024-03-05", "2024-03-06"],
                "temperature_2m_max_member01": [71.2, null]
            }
        }"#;
        let parsed: EnsembleResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(
            extract_members(&parsed.daily),
            Err(FetchError::Schema(_))
        ));
    }

    #[test]
    fn short_daily_series_is_a_schema_error() {
        assert!(matches!(
            pair_from_series(&[70.0], Direction::High),
            Err(FetchError::Schema(_))
        ));
        assert!(matches!(
            pair_from_series(&[], Direction::Low),
            Err(FetchError::Schema(_))
        ));
    }

    #[tokio::test]
    async fn point_forecast_requests_two_fahrenheit_days() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("daily", "temperature_2m_max"))
            .and(query_param("forecast_days", "2"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"daily": {"time": ["2024-03-05", "2024-03-06"], "temperature_2m_max": [70.5, 67.9]}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let city = cities::lookup("ny").unwrap();
        let pair = client_for(&server)
            .point_forecast(city, Direction::High)
            .await
            .unwrap();

        assert_eq!(pair, ForecastPair { today: 70.5, tomorrow: 67.9 });
    }

    #[tokio::test]
    async fn point_forecast_missing_series_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"daily": {"time": ["2024-03-05", "2024-03-06"], "temperature_2m_min": [48.0, 50.2]}}"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let city = cities::lookup("ny").unwrap();
        let result = client_for(&server)
            .point_forecast(city, Direction::High)
            .await;

        assert!(matches!(result, Err(FetchError::Schema(_))));
    }

    #[tokio::test]
    async fn ensemble_forecast_passes_city_model_and_splits_members() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/ensemble"))
            .and(query_param("models", "gfs_seamless"))
            .and(query_param("daily", "temperature_2m_min"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{
                    "daily": {
                        "time": ["2024-03-05", "2024-03-06"],
                        "temperature_2m_min_member01": [41.0, 43.5],
                        "temperature_2m_min_member02": [39.8, 44.1]
                    }
                }"#,
                "application/json",
            ))
            .mount(&server)
            .await;

        let city = cities::lookup("den").unwrap();
        let members = client_for(&server)
            .ensemble_forecast(city, Direction::Low)
            .await
            .unwrap();

        assert_eq!(members.today, vec![41.0, 39.8]);
        assert_eq!(members.tomorrow, vec![43.5, 44.1]);
    }

    #[tokio::test]
    async fn upstream_error_status_surfaces_as_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let city = cities::lookup("la").unwrap();
        let result = client_for(&server)
            .point_forecast(city, Direction::Low)
            .await;

        assert!(matches!(result, Err(FetchError::Api { status: 429, .. })));
    }
}
