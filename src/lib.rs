//! vigil — daily multi-source snapshot and report tool.
//!
//! Pulls a GitHub user's repositories, a city's current weather and a
//! coin's price history, persists each pull as a dated CSV snapshot
//! plus a rolling `latest` alias, derives a bounded trailing trend
//! window from snapshot history, and assembles one always-producible
//! report payload for an external renderer/mailer.

pub mod config;
pub mod error;
pub mod fetch;
pub mod history;
pub mod jobs;
pub mod model;
pub mod report;
pub mod store;

pub use config::Settings;
pub use error::{HistoryError, StoreError};
pub use history::select_trailing_window;
pub use model::{Record, ReportPayload, SnapshotSource, TrendPoint};
pub use report::{build_report_payload, ReportSources};
pub use store::{SnapshotStore, WriteOutcome};
