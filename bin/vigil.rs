use anyhow::Context;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use vigil::{jobs, Settings, SnapshotStore};

fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    // Load configuration
    let settings =
        Settings::new().context("Failed to load config.yaml. Please ensure it exists and is valid")?;

    let store = SnapshotStore::new(&settings.storage.data_dir);

    info!("Starting daily report run");

    // Refresh each source in sequence. A failed source is logged and
    // skipped; its prior snapshot stays on disk and the report still
    // covers everything else.
    match &settings.github {
        Some(github) => {
            if let Err(e) = jobs::refresh_repos::run(&store, github) {
                error!("Repos refresh failed: {:#}", e);
            }
        },
        None => info!("GitHub source not configured, skipping"),
    }

    match &settings.weather {
        Some(weather) => {
            if let Err(e) = jobs::refresh_weather::run(&store, weather) {
                error!("Weather refresh failed: {:#}", e);
            }
        },
        None => info!("Weather source not configured, skipping"),
    }

    match &settings.crypto {
        Some(crypto) => {
            if let Err(e) = jobs::refresh_crypto::run(&store, crypto) {
                error!("Crypto refresh failed: {:#}", e);
            }
        },
        None => info!("Crypto source not configured, skipping"),
    }

    // The report is always produced, whatever the refreshes managed.
    let payload =
        jobs::build_report::run(&store, &settings).context("Failed to build the report payload")?;

    info!(
        "Run complete (repos={}, crypto rows={}, trend points={})",
        payload.repos.total_count,
        payload.crypto.count,
        payload.weather_trend.len()
    );
    Ok(())
}
