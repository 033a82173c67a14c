//! Snapshot persistence: dated CSV files plus a rolling `latest`
//! alias per source.

mod snapshot;

pub use snapshot::{DatedSnapshot, SnapshotStore, WriteOutcome};
