//! Job to refresh the GitHub repository snapshot.

use anyhow::Result;
use chrono::Local;
use log::info;

use crate::config::GithubSettings;
use crate::fetch;
use crate::store::{SnapshotStore, WriteOutcome};

/// Fetches the user's repositories and writes the dated + latest
/// snapshot files.
pub fn run(store: &SnapshotStore, settings: &GithubSettings) -> Result<()> {
    info!("Starting refresh_repos job...");

    let start = std::time::Instant::now();

    let records = fetch::fetch_repos(settings)?;
    let source = settings.source();

    let public = records
        .iter()
        .filter(|r| r.get("visibility") == Some("public"))
        .count();
    let stars: u64 = records
        .iter()
        .filter_map(|r| r.get("stargazers_count"))
        .filter_map(|v| v.parse::<u64>().ok())
        .sum();

    let outcome = store.write_snapshot(&source, &records, Local::now().date_naive())?;
    match outcome {
        WriteOutcome::Written { .. } => info!(
            "Completed refresh_repos job in {:?} (repos={}, public={}, stars={})",
            start.elapsed(),
            records.len(),
            public,
            stars
        ),
        WriteOutcome::SkippedEmpty => info!("No repositories found; snapshot left untouched"),
    }
    Ok(())
}
