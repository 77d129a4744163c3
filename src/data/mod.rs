pub mod forecast;
pub mod kalshi;
pub mod types;

use thiserror::Error;

/// Failure taxonomy shared by both upstream clients. An empty eligible
/// contract set and a priceless order book are not errors; those surface as
/// ordinary values (`Ok(vec![])`, `Price::Missing`).
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Unexpected response shape: {0}")]
    Schema(String),
}

/// Non-2xx responses become `FetchError::Api` before any body parsing.
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, FetchError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown API error".to_string());
    Err(FetchError::Api { status, body })
}
