//! Report assembly: merges all sources' latest snapshots into one
//! always-producible payload for the external renderer.

mod aggregator;

pub use aggregator::{build_report_payload, ReportSources};
