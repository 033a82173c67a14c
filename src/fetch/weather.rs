//! OpenWeatherMap current-weather fetcher.
//!
//! Produces exactly one record per call. Fields missing from the
//! response become empty values, never fetch failures — the report
//! side substitutes placeholders per field.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Local;
use log::info;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::WeatherSettings;
use crate::model::Record;

const API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: Option<String>,
    sys: Option<Sys>,
    #[serde(default)]
    weather: Vec<Condition>,
    main: Option<MainReadings>,
    wind: Option<Wind>,
    clouds: Option<Clouds>,
    visibility: Option<i64>,
    /// Observation time, unix epoch seconds.
    dt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: Option<f64>,
    feels_like: Option<f64>,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    pressure: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: Option<f64>,
    deg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Clouds {
    all: Option<f64>,
}

/// Fetches the current weather observation as a single record.
pub fn fetch_current_weather(settings: &WeatherSettings) -> Result<Vec<Record>> {
    let client = Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(API_URL)
        .query(&[
            ("q", format!("{},{}", settings.city, settings.country)),
            ("appid", settings.api_key.clone()),
            ("units", settings.units.clone()),
        ])
        .send()
        .context("Weather request failed")?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        bail!("[401] Invalid weather API key; re-check the configured api_key");
    }
    if status == StatusCode::NOT_FOUND {
        bail!(
            "[404] City not found: {},{}",
            settings.city,
            settings.country
        );
    }
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        bail!("[{}] Unexpected weather error: {}", status.as_u16(), body);
    }

    let data: WeatherResponse = response.json().context("Invalid weather response body")?;
    let record = flatten(&data);

    info!(
        "Fetched current weather for {},{}",
        settings.city, settings.country
    );
    Ok(vec![record])
}

fn flatten(data: &WeatherResponse) -> Record {
    let condition = data.weather.first();
    let main = data.main.as_ref();
    let wind = data.wind.as_ref();

    Record::from_pairs([
        (
            "snapshot_date",
            Local::now().format("%Y-%m-%d").to_string(),
        ),
        ("city", data.name.clone().unwrap_or_default()),
        (
            "country",
            data.sys
                .as_ref()
                .and_then(|s| s.country.clone())
                .unwrap_or_default(),
        ),
        (
            "weather",
            condition
                .and_then(|c| c.main.clone())
                .unwrap_or_default(),
        ),
        (
            "weather_desc",
            condition
                .and_then(|c| c.description.clone())
                .unwrap_or_default(),
        ),
        ("temp", num_field(main.and_then(|m| m.temp))),
        ("feels_like", num_field(main.and_then(|m| m.feels_like))),
        ("temp_min", num_field(main.and_then(|m| m.temp_min))),
        ("temp_max", num_field(main.and_then(|m| m.temp_max))),
        ("pressure_hpa", num_field(main.and_then(|m| m.pressure))),
        ("humidity_pct", num_field(main.and_then(|m| m.humidity))),
        ("wind_speed", num_field(wind.and_then(|w| w.speed))),
        ("wind_deg", num_field(wind.and_then(|w| w.deg))),
        (
            "clouds_pct",
            num_field(data.clouds.as_ref().and_then(|c| c.all)),
        ),
        (
            "visibility_m",
            data.visibility.map(|v| v.to_string()).unwrap_or_default(),
        ),
        (
            "timestamp",
            data.dt.map(|v| v.to_string()).unwrap_or_default(),
        ),
    ])
}

fn num_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatten_tolerates_missing_fields() {
        let data: WeatherResponse = serde_json::from_str(
            r#"{"name":"Noida","main":{"temp":31.4,"humidity":58},"weather":[{"main":"Haze"}]}"#,
        )
        .unwrap();

        let record = flatten(&data);

        assert_eq!(record.get("city"), Some("Noida"));
        assert_eq!(record.get("temp"), Some("31.4"));
        assert_eq!(record.get("humidity_pct"), Some("58"));
        assert_eq!(record.get("weather"), Some("Haze"));
        assert_eq!(record.get("weather_desc"), Some(""));
        assert_eq!(record.get("wind_speed"), Some(""));
        assert_eq!(record.get("country"), Some(""));
    }
}
