//! Builds the unified report payload from the `latest` snapshots.
//!
//! Every section degrades independently: an absent or unreadable
//! source yields an empty/placeholder section and a log line, never
//! an error. The payload is always produced.

use chrono::Local;
use log::{info, warn};

use crate::model::report::PLACEHOLDER;
use crate::model::{
    CryptoSection, Record, RepoEntry, RepoSection, ReportPayload, SnapshotSource, WeatherSection,
};
use crate::store::SnapshotStore;

/// The three source identities a report draws from.
///
/// Any of them may be `None` (source not configured) or point at a
/// snapshot that does not exist yet; both degrade the same way.
#[derive(Debug, Clone, Default)]
pub struct ReportSources {
    pub repos: Option<SnapshotSource>,
    pub weather: Option<SnapshotSource>,
    pub crypto: Option<SnapshotSource>,
}

/// Assembles the report payload from whatever `latest` snapshots are
/// on disk. Infallible by design.
pub fn build_report_payload(
    store: &SnapshotStore,
    sources: &ReportSources,
    top_n: usize,
) -> ReportPayload {
    let repos = sources
        .repos
        .as_ref()
        .map(|s| repo_section(store, s, top_n))
        .unwrap_or_default();

    let weather = sources
        .weather
        .as_ref()
        .map(|s| weather_section(store, s))
        .unwrap_or_default();

    let crypto = sources
        .crypto
        .as_ref()
        .map(|s| crypto_section(store, s))
        .unwrap_or_default();

    info!(
        "Assembled report payload (repos={}, crypto rows={})",
        repos.total_count, crypto.count
    );

    ReportPayload {
        generated_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
        repos,
        weather,
        crypto,
        weather_trend: Vec::new(),
        chart_paths: Vec::new(),
    }
}

/// Reads a `latest` snapshot, degrading to no rows when the file is
/// absent or unreadable.
fn latest_rows(store: &SnapshotStore, source: &SnapshotSource) -> Vec<Record> {
    let path = store.latest_path(source);
    if !path.exists() {
        info!("No latest snapshot for '{source}' yet; section degrades");
        return Vec::new();
    }

    match SnapshotStore::read_records(&path) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Failed to read {}: {e}; section degrades", path.display());
            Vec::new()
        },
    }
}

fn repo_section(store: &SnapshotStore, source: &SnapshotSource, top_n: usize) -> RepoSection {
    let mut rows = latest_rows(store, source);

    let total_count = rows.len();
    let star_sum: u64 = rows.iter().map(stars_of).sum();

    // Stable sort: equal star counts keep their snapshot row order.
    rows.sort_by_key(|row| std::cmp::Reverse(stars_of(row)));
    rows.truncate(top_n);

    let top = rows
        .iter()
        .map(|row| RepoEntry {
            name: field_or_placeholder(row, "name"),
            url: field_or_placeholder(row, "html_url"),
            language: field_or_placeholder(row, "language"),
            stars: stars_of(row),
        })
        .collect();

    RepoSection {
        top,
        total_count,
        star_sum,
    }
}

fn stars_of(row: &Record) -> u64 {
    row.get("stargazers_count")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

fn weather_section(store: &SnapshotStore, source: &SnapshotSource) -> WeatherSection {
    let rows = latest_rows(store, source);
    let Some(row) = rows.first() else {
        return WeatherSection::default();
    };

    // The description prefers the long form over the one-word kind.
    let description = row
        .get("weather_desc")
        .filter(|v| !v.is_empty())
        .or_else(|| row.get("weather").filter(|v| !v.is_empty()))
        .unwrap_or(PLACEHOLDER)
        .to_string();

    WeatherSection {
        city: field_or_placeholder(row, "city"),
        country: field_or_placeholder(row, "country"),
        description,
        temp: field_or_placeholder(row, "temp"),
        humidity_pct: field_or_placeholder(row, "humidity_pct"),
        wind_speed: field_or_placeholder(row, "wind_speed"),
    }
}

/// The crypto `latest` file holds a multi-row time series (unlike the
/// other sources); the section covers all of its rows.
fn crypto_section(store: &SnapshotStore, source: &SnapshotSource) -> CryptoSection {
    let rows = latest_rows(store, source);
    if rows.is_empty() {
        return CryptoSection::default();
    }

    let prices: Vec<f64> = rows.iter().filter_map(price_of).collect();

    // The latest value and its label must come from the same row, so
    // trailing rows with a malformed price are skipped for both.
    let last_row = rows.iter().rev().find(|row| price_of(row).is_some());

    CryptoSection {
        latest: last_row.and_then(price_of),
        min: prices.iter().copied().reduce(f64::min),
        max: prices.iter().copied().reduce(f64::max),
        count: rows.len(),
        last_label: last_row.and_then(label_of),
    }
}

fn label_of(row: &Record) -> Option<String> {
    row.get("iso_time")
        .or_else(|| row.get("timestamp"))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Price column is currency-suffixed (`price_usd`, `price_inr`, ...),
/// so match on the prefix.
fn price_of(row: &Record) -> Option<f64> {
    row.get_prefixed("price").and_then(|v| v.parse().ok())
}

fn field_or_placeholder(row: &Record, name: &str) -> String {
    match row.get(name) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn setup() -> (tempfile::TempDir, SnapshotStore, ReportSources) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let sources = ReportSources {
            repos: Some(SnapshotSource::new("github_repos", "octocat")),
            weather: Some(SnapshotSource::new("weather", "Noida_IN")),
            crypto: Some(SnapshotSource::new("crypto", "bitcoin_usd")),
        };
        (dir, store, sources)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
    }

    fn repo_row(name: &str, stars: u64) -> Record {
        Record::from_pairs([
            ("name", name.to_string()),
            ("html_url", format!("https://github.com/octocat/{name}")),
            ("language", "Rust".to_string()),
            ("stargazers_count", stars.to_string()),
        ])
    }

    #[test]
    fn empty_store_still_produces_a_full_payload() {
        let (_dir, store, sources) = setup();

        let payload = build_report_payload(&store, &sources, 5);

        assert_eq!(payload.repos.total_count, 0);
        assert_eq!(payload.repos.star_sum, 0);
        assert!(payload.repos.top.is_empty());
        assert_eq!(payload.weather.city, PLACEHOLDER);
        assert_eq!(payload.weather.temp, PLACEHOLDER);
        assert_eq!(payload.crypto.count, 0);
        assert_eq!(payload.crypto.latest, None);
    }

    #[test]
    fn repo_section_ranks_by_stars_with_stable_ties() {
        let (_dir, store, sources) = setup();
        let stars = [5, 100, 3, 100, 7, 1, 50, 2];
        let rows: Vec<Record> = stars
            .iter()
            .enumerate()
            .map(|(i, s)| repo_row(&format!("repo{i}"), *s))
            .collect();
        store
            .write_snapshot(sources.repos.as_ref().unwrap(), &rows, today())
            .unwrap();

        let payload = build_report_payload(&store, &sources, 5);

        let top: Vec<(String, u64)> = payload
            .repos
            .top
            .iter()
            .map(|e| (e.name.clone(), e.stars))
            .collect();
        // The two 100s keep their original relative order (repo1 then
        // repo3); totals cover all eight rows.
        assert_eq!(
            top,
            vec![
                ("repo1".to_string(), 100),
                ("repo3".to_string(), 100),
                ("repo6".to_string(), 50),
                ("repo4".to_string(), 7),
                ("repo0".to_string(), 5),
            ]
        );
        assert_eq!(payload.repos.total_count, 8);
        assert_eq!(payload.repos.star_sum, 268);
    }

    #[test]
    fn weather_fields_fall_back_independently() {
        let (_dir, store, sources) = setup();
        let row = Record::from_pairs([
            ("snapshot_date", "2026-08-29"),
            ("city", "Noida"),
            ("country", ""),
            ("weather", "Haze"),
            ("weather_desc", ""),
            ("temp", "31.4"),
            ("humidity_pct", "58"),
            ("wind_speed", ""),
        ]);
        store
            .write_snapshot(sources.weather.as_ref().unwrap(), &[row], today())
            .unwrap();

        let payload = build_report_payload(&store, &sources, 5);

        assert_eq!(payload.weather.city, "Noida");
        assert_eq!(payload.weather.country, PLACEHOLDER);
        assert_eq!(payload.weather.description, "Haze");
        assert_eq!(payload.weather.temp, "31.4");
        assert_eq!(payload.weather.wind_speed, PLACEHOLDER);
    }

    #[test]
    fn crypto_section_covers_the_whole_series() {
        let (_dir, store, sources) = setup();
        let prices = [100.0, 105.0, 98.0, 110.0];
        let rows: Vec<Record> = prices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                Record::from_pairs([
                    ("timestamp", format!("{}", 1_700_000_000 + i * 3600)),
                    ("iso_time", format!("2026-08-29T0{i}:00:00")),
                    ("price_usd", p.to_string()),
                ])
            })
            .collect();
        store
            .write_snapshot(sources.crypto.as_ref().unwrap(), &rows, today())
            .unwrap();

        let payload = build_report_payload(&store, &sources, 5);

        assert_eq!(payload.crypto.latest, Some(110.0));
        assert_eq!(payload.crypto.min, Some(98.0));
        assert_eq!(payload.crypto.max, Some(110.0));
        assert_eq!(payload.crypto.count, 4);
        assert_eq!(
            payload.crypto.last_label.as_deref(),
            Some("2026-08-29T03:00:00")
        );
    }

    #[test]
    fn crypto_latest_and_label_come_from_the_same_row() {
        let (_dir, store, sources) = setup();
        // The trailing row's price is malformed; both the latest
        // value and its label must fall back to the prior row.
        let rows = vec![
            Record::from_pairs([("iso_time", "2026-08-29T01:00:00"), ("price_usd", "100")]),
            Record::from_pairs([("iso_time", "2026-08-29T02:00:00"), ("price_usd", "oops")]),
        ];
        store
            .write_snapshot(sources.crypto.as_ref().unwrap(), &rows, today())
            .unwrap();

        let payload = build_report_payload(&store, &sources, 5);

        assert_eq!(payload.crypto.latest, Some(100.0));
        assert_eq!(
            payload.crypto.last_label.as_deref(),
            Some("2026-08-29T01:00:00")
        );
        assert_eq!(payload.crypto.min, Some(100.0));
        assert_eq!(payload.crypto.max, Some(100.0));
        assert_eq!(payload.crypto.count, 2);
    }

    #[test]
    fn one_present_source_never_needs_the_others() {
        let (_dir, store, sources) = setup();
        let row = Record::from_pairs([("city", "Noida"), ("temp", "30.0")]);
        store
            .write_snapshot(sources.weather.as_ref().unwrap(), &[row], today())
            .unwrap();

        let payload = build_report_payload(&store, &sources, 5);

        assert_eq!(payload.weather.city, "Noida");
        assert_eq!(payload.repos.total_count, 0);
        assert_eq!(payload.crypto.count, 0);
    }
}
