use chrono::NaiveDate;

/// Compact date format embedded in dated snapshot filenames.
pub const FILE_DATE_FORMAT: &str = "%Y%m%d";

/// Identity of one upstream data source in the snapshot store.
///
/// Files follow `<prefix>_<descriptor>_<YYYYMMDD>.csv` for dated
/// snapshots and `<prefix>_latest.csv` for the rolling alias. The
/// descriptor carries source parameters (username, city/country,
/// coin/currency) so different configurations never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSource {
    prefix: String,
    descriptor: String,
}

impl SnapshotSource {
    pub fn new(prefix: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Filename of the dated snapshot for `date`.
    pub fn dated_file_name(&self, date: NaiveDate) -> String {
        format!(
            "{}_{}_{}.csv",
            self.prefix,
            self.descriptor,
            date.format(FILE_DATE_FORMAT)
        )
    }

    /// Filename of the rolling `latest` alias.
    pub fn latest_file_name(&self) -> String {
        format!("{}_latest.csv", self.prefix)
    }
}

impl std::fmt::Display for SnapshotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.prefix, self.descriptor)
    }
}
