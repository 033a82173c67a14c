//! Job to refresh the current-weather snapshot.

use anyhow::Result;
use chrono::Local;
use log::info;

use crate::config::WeatherSettings;
use crate::fetch;
use crate::store::SnapshotStore;

/// Fetches the current observation and writes the single-row dated +
/// latest snapshot files.
pub fn run(store: &SnapshotStore, settings: &WeatherSettings) -> Result<()> {
    info!("Starting refresh_weather job...");

    let start = std::time::Instant::now();

    let records = fetch::fetch_current_weather(settings)?;
    let source = settings.source();

    store.write_snapshot(&source, &records, Local::now().date_naive())?;

    info!(
        "Completed refresh_weather job in {:?} ({},{})",
        start.elapsed(),
        settings.city,
        settings.country
    );
    Ok(())
}
