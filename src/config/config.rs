use config::{Config, ConfigError, File};
use serde::Deserialize;

use crate::model::SnapshotSource;

/// Filesystem layout for snapshot and chart artifacts.
///
/// Dated snapshots and the rolling `*_latest.csv` aliases live under
/// `data_dir`. Pre-rendered chart images (produced by an external
/// renderer) are looked up under `charts_dir`.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_charts_dir")]
    pub charts_dir: String,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_charts_dir() -> String {
    "charts".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            charts_dir: default_charts_dir(),
        }
    }
}

/// GitHub repository listing configuration.
///
/// The token is optional; providing one raises the API rate limit.
#[derive(Debug, Deserialize, Clone)]
pub struct GithubSettings {
    pub username: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl GithubSettings {
    /// Snapshot identity for this user's repository listing,
    /// e.g. `github_repos_octocat_20260829.csv`.
    pub fn source(&self) -> SnapshotSource {
        SnapshotSource::new("github_repos", &self.username)
    }
}

/// OpenWeatherMap current-weather configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct WeatherSettings {
    pub api_key: String,
    pub city: String,
    pub country: String,
    /// "metric" for Celsius, "imperial" for Fahrenheit.
    #[serde(default = "default_units")]
    pub units: String,
}

fn default_units() -> String {
    "metric".to_string()
}

impl WeatherSettings {
    /// Snapshot identity for this city's weather,
    /// e.g. `weather_Noida_IN_20260829.csv`.
    pub fn source(&self) -> SnapshotSource {
        SnapshotSource::new("weather", format!("{}_{}", self.city, self.country))
    }
}

/// CoinGecko market-chart configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct CryptoSettings {
    #[serde(default = "default_coin")]
    pub coin: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_days")]
    pub days: u32,
}

fn default_coin() -> String {
    "bitcoin".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_days() -> u32 {
    7
}

impl CryptoSettings {
    /// Snapshot identity for this coin's price series,
    /// e.g. `crypto_bitcoin_usd_20260829.csv`.
    pub fn source(&self) -> SnapshotSource {
        SnapshotSource::new("crypto", format!("{}_{}", self.coin, self.currency))
    }
}

/// Report assembly configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    /// How many repositories to rank by stars in the report.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Trailing window length for the weather trend, in snapshots.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    /// Candidate row fields probed (in order) for the trend value.
    #[serde(default = "default_trend_fields")]
    pub trend_fields: Vec<String>,
    /// Candidate row fields probed (in order) for the trend label.
    #[serde(default = "default_label_fields")]
    pub label_fields: Vec<String>,
    /// Payload file written for the external renderer/mailer,
    /// relative to `data_dir`.
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

fn default_top_n() -> usize {
    5
}

fn default_window_size() -> usize {
    7
}

fn default_trend_fields() -> Vec<String> {
    vec![
        "temp".to_string(),
        "temp_max".to_string(),
        "temp_min".to_string(),
    ]
}

fn default_label_fields() -> Vec<String> {
    vec!["snapshot_date".to_string(), "iso_time".to_string()]
}

fn default_output_file() -> String {
    "report_latest.json".to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            window_size: default_window_size(),
            trend_fields: default_trend_fields(),
            label_fields: default_label_fields(),
            output_file: default_output_file(),
        }
    }
}

/// Root application configuration.
///
/// Loaded from `config.yaml` at startup. Each source section is
/// optional; a missing section means that source is not refreshed and
/// its report section degrades to placeholders.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub github: Option<GithubSettings>,
    #[serde(default)]
    pub weather: Option<WeatherSettings>,
    #[serde(default)]
    pub crypto: Option<CryptoSettings>,
    #[serde(default)]
    pub report: ReportSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config"))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}
