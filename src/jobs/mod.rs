//! Per-run jobs, executed sequentially by the binary:
//!
//! - Refreshing each source's snapshot (repos, weather, crypto)
//! - Assembling the report payload and writing it for the renderer
//!
//! A refresh job's failure is logged and absorbed by the caller so
//! the remaining sources and the report still complete.

pub mod build_report;
pub mod refresh_crypto;
pub mod refresh_repos;
pub mod refresh_weather;
