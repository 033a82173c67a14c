//! Job to assemble the report payload and hand it off.
//!
//! The payload is always produced, whatever subset of sources has
//! data. The weather trend window is best-effort: its failure is
//! fatal to the chart step only and never to the report. The finished
//! payload is written as JSON for the external renderer/mailer, which
//! owns all markup and transport.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::Settings;
use crate::history::select_trailing_window;
use crate::model::ReportPayload;
use crate::report::{build_report_payload, ReportSources};
use crate::store::SnapshotStore;

/// Chart images the external renderer may have pre-rendered; only
/// existing files are referenced in the payload.
const CHART_FILES: [&str; 2] = ["weather_trend_latest.png", "crypto_latest.png"];

pub fn run(store: &SnapshotStore, settings: &Settings) -> Result<ReportPayload> {
    info!("Starting build_report job...");

    let start = std::time::Instant::now();

    let sources = ReportSources {
        repos: settings.github.as_ref().map(|s| s.source()),
        weather: settings.weather.as_ref().map(|s| s.source()),
        crypto: settings.crypto.as_ref().map(|s| s.source()),
    };

    let mut payload = build_report_payload(store, &sources, settings.report.top_n);

    if let Some(weather) = &sources.weather {
        match select_trailing_window(
            store,
            weather,
            settings.report.window_size,
            &settings.report.trend_fields,
            &settings.report.label_fields,
        ) {
            Ok(points) => payload.weather_trend = points,
            Err(e) => warn!("Weather trend unavailable, chart step skipped: {e}"),
        }
    }

    payload.chart_paths = existing_chart_paths(Path::new(&settings.storage.charts_dir));

    let output = store.data_dir().join(&settings.report.output_file);
    fs::create_dir_all(store.data_dir())?;
    let json = serde_json::to_string_pretty(&payload).context("Failed to serialize payload")?;
    fs::write(&output, json)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        "Completed build_report job in {:?} ({})",
        start.elapsed(),
        output.display()
    );
    Ok(payload)
}

fn existing_chart_paths(charts_dir: &Path) -> Vec<String> {
    CHART_FILES
        .iter()
        .map(|name| charts_dir.join(name))
        .filter(|path| path.exists())
        .map(|path: PathBuf| path.to_string_lossy().into_owned())
        .collect()
}
