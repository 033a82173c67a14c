use serde::Serialize;

use super::trend::TrendPoint;

/// Placeholder shown for display fields whose source data is absent.
pub const PLACEHOLDER: &str = "-";

/// One ranked repository entry in the report.
#[derive(Debug, Clone, Serialize)]
pub struct RepoEntry {
    pub name: String,
    pub url: String,
    pub language: String,
    pub stars: u64,
}

/// Repository section: top-N by stars plus full-set totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RepoSection {
    /// Highest-starred repositories, descending; ties keep snapshot
    /// row order.
    pub top: Vec<RepoEntry>,
    /// Row count over the full snapshot, not just the top list.
    pub total_count: usize,
    /// Star sum over the full snapshot.
    pub star_sum: u64,
}

/// Weather section: scalar display fields from the latest snapshot.
///
/// Each field falls back to [`PLACEHOLDER`] independently, so a
/// partially populated snapshot still renders.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherSection {
    pub city: String,
    pub country: String,
    pub description: String,
    pub temp: String,
    pub humidity_pct: String,
    pub wind_speed: String,
}

impl Default for WeatherSection {
    fn default() -> Self {
        Self {
            city: PLACEHOLDER.to_string(),
            country: PLACEHOLDER.to_string(),
            description: PLACEHOLDER.to_string(),
            temp: PLACEHOLDER.to_string(),
            humidity_pct: PLACEHOLDER.to_string(),
            wind_speed: PLACEHOLDER.to_string(),
        }
    }
}

/// Crypto section: statistics over the full price series stored in
/// the crypto `latest` snapshot.
///
/// Unlike the other two sources, the crypto `latest` file holds a
/// multi-row time series; the stats here cover all of its rows.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CryptoSection {
    /// Price of the last row in file order.
    pub latest: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Total row count of the series.
    pub count: usize,
    /// Timestamp label of the last row.
    pub last_label: Option<String>,
}

/// The unified report handed to the external renderer/mailer.
///
/// Always producible: any subset of sources may be absent and the
/// corresponding sections degrade without affecting the others. The
/// renderer owns all markup, MIME packaging and transport.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    /// Local time the payload was assembled, `YYYY-MM-DD HH:MM`.
    pub generated_at: String,
    pub repos: RepoSection,
    pub weather: WeatherSection,
    pub crypto: CryptoSection,
    /// Weather trend points for the external chart renderer; empty
    /// when the window selector failed or never ran.
    pub weather_trend: Vec<TrendPoint>,
    /// Paths of pre-rendered chart images found on disk.
    pub chart_paths: Vec<String>,
}
