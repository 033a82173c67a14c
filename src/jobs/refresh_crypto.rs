//! Job to refresh the crypto price-series snapshot.

use anyhow::Result;
use chrono::Local;
use log::info;

use crate::config::CryptoSettings;
use crate::fetch;
use crate::store::SnapshotStore;

/// Fetches the price series and writes the multi-row dated + latest
/// snapshot files.
pub fn run(store: &SnapshotStore, settings: &CryptoSettings) -> Result<()> {
    info!("Starting refresh_crypto job...");

    let start = std::time::Instant::now();

    let records = fetch::fetch_prices(settings)?;
    let source = settings.source();

    let count = records.len();
    store.write_snapshot(&source, &records, Local::now().date_naive())?;

    info!(
        "Completed refresh_crypto job in {:?} ({} samples for {}/{})",
        start.elapsed(),
        count,
        settings.coin,
        settings.currency
    );
    Ok(())
}
