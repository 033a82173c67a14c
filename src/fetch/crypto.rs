//! CoinGecko price-history fetcher.
//!
//! Pulls the `market_chart` series for one coin and flattens it into
//! one record per price sample. This source's snapshot is therefore a
//! multi-row time series, unlike the other two.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};
use log::info;
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::config::CryptoSettings;
use crate::model::Record;

const API_BASE: &str = "https://api.coingecko.com/api/v3/coins";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "vigil-report";

#[derive(Debug, Deserialize)]
struct MarketChart {
    /// `[timestamp_ms, price]` pairs.
    #[serde(default)]
    prices: Vec<[f64; 2]>,
}

/// Fetches the last `days` of prices, one record per sample.
pub fn fetch_prices(settings: &CryptoSettings) -> Result<Vec<Record>> {
    let client = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let url = format!("{API_BASE}/{}/market_chart", settings.coin);
    let response = client
        .get(&url)
        .query(&[
            ("vs_currency", settings.currency.as_str()),
            ("days", &settings.days.to_string()),
        ])
        .header("Accept", "application/json")
        .header("User-Agent", USER_AGENT)
        .send()
        .context("CoinGecko request failed")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        let short: String = body.chars().take(300).collect();
        bail!("[{}] CoinGecko error: {}", status.as_u16(), short);
    }

    let chart: MarketChart = response.json().context("Invalid CoinGecko response body")?;
    if chart.prices.is_empty() {
        bail!("No 'prices' in CoinGecko response for '{}'", settings.coin);
    }

    let price_field = format!("price_{}", settings.currency);
    let records = chart
        .prices
        .iter()
        .map(|[ts_ms, price]| {
            let ts = (*ts_ms as i64) / 1000;
            Record::from_pairs([
                ("timestamp", ts.to_string()),
                ("iso_time", iso_local(ts)),
                (price_field.as_str(), price.to_string()),
            ])
        })
        .collect::<Vec<_>>();

    info!(
        "Fetched {} price samples for {}/{} over {} day(s)",
        records.len(),
        settings.coin,
        settings.currency,
        settings.days
    );
    Ok(records)
}

/// Local-time ISO label for a unix timestamp; empty when out of range.
fn iso_local(ts: i64) -> String {
    Local
        .timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chart_rows_flatten_with_currency_column() {
        let chart: MarketChart =
            serde_json::from_str(r#"{"prices":[[1700000000000.0, 42000.5],[1700003600000.0, 42100.0]]}"#)
                .unwrap();

        assert_eq!(chart.prices.len(), 2);
        let ts = (chart.prices[0][0] as i64) / 1000;
        assert_eq!(ts, 1_700_000_000);
        assert!(!iso_local(ts).is_empty());
    }
}
