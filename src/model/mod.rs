pub mod record;
pub mod report;
pub mod source;
pub mod trend;

pub use record::Record;
pub use report::{CryptoSection, RepoEntry, ReportPayload, RepoSection, WeatherSection};
pub use source::SnapshotSource;
pub use trend::TrendPoint;
