//! Thin HTTP adapters for the three upstream sources.
//!
//! Each fetcher turns one upstream API response into ordered flat
//! [`Record`](crate::model::Record) rows; the snapshot store neither
//! knows nor cares how the rows were obtained.

pub mod crypto;
pub mod github;
pub mod weather;

pub use crypto::fetch_prices;
pub use github::fetch_repos;
pub use weather::fetch_current_weather;
