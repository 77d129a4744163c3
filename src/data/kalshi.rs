use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::data::types::Price;
use crate::data::{check_status, FetchError};

/// Client for the exchange's trade API: series listings and per-contract
/// order books.
pub struct KalshiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct MarketsResponse {
    // Older API revisions named this key "market".
    #[serde(default, alias = "market")]
    markets: Vec<MarketRow>,
}

#[derive(Debug, Deserialize)]
struct MarketRow {
    ticker: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct OrderbookResponse {
    orderbook: Orderbook,
}

/// [price, size]; the exchange sends null for either on crossed or stale rows.
type NoLevel = (Option<f64>, Option<f64>);

#[derive(Debug, Default, Deserialize)]
struct Orderbook {
    #[serde(default)]
    no: Option<Vec<Option<NoLevel>>>,
}

impl KalshiClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Tickers in a series that are tradable for the target settlement day.
    ///
    /// The listing endpoint's `status=open` filter is looser than per-market
    /// `active`, so both filters apply, then the settlement-date token match.
    /// An empty result is a normal outcome, not an error.
    pub async fn eligible_contracts(
        &self,
        series_ticker: &str,
        date_token: &str,
    ) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/markets", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("series_ticker", series_ticker), ("status", "open")])
            .send()
            .await?;
        let response = check_status(response).await?;

        let listing: MarketsResponse = response.json().await?;
        let tickers = filter_eligible(listing.markets, date_token);
        debug!(
            series_ticker,
            date_token,
            count = tickers.len(),
            "eligible contracts"
        );
        Ok(tickers)
    }

    /// Implied "yes" price for one contract, from its "no" order book.
    pub async fn contract_price(&self, ticker: &str) -> Result<Price, FetchError> {
        let url = format!("{}/markets/{}/orderbook", self.base_url, ticker);
        let response = self.client.get(&url).send().await?;
        let response = check_status(response).await?;

        let book: OrderbookResponse = response.json().await?;
        Ok(implied_yes_price(&book.orderbook))
    }

    /// Price for every eligible contract in a series, keyed by ticker.
    pub async fn series_prices(
        &self,
        series_ticker: &str,
        date_token: &str,
    ) -> Result<BTreeMap<String, Price>, FetchError> {
        let mut prices = BTreeMap::new();
        for ticker in self.eligible_contracts(series_ticker, date_token).await? {
            let price = self.contract_price(&ticker).await?;
            prices.insert(ticker, price);
        }
        Ok(prices)
    }
}

fn filter_eligible(markets: Vec<MarketRow>, date_token: &str) -> Vec<String> {
    markets
        .into_iter()
        .filter(|market| market.status == "active")
        .map(|market| market.ticker)
        .filter(|ticker| ticker.contains(date_token))
        .collect()
}

/// `100 - max(no price level)`, or `Missing` when the book gives nothing to
/// price against: no "no" side, an empty one, or any null row or price.
fn implied_yes_price(book: &Orderbook) -> Price {
    let Some(levels) = book.no.as_deref() else {
        return Price::Missing;
    };
    if levels.is_empty() {
        return Price::Missing;
    }

    let mut best_no = f64::NEG_INFINITY;
    for level in levels {
        match level {
            Some((Some(price), _)) => best_no = best_no.max(*price),
            _ => return Price::Missing,
        }
    }
    Price::Implied(100.0 - best_no)
}
