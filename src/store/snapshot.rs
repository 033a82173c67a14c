//! Dated + latest snapshot writes and dated-file enumeration.
//!
//! Every snapshot is recorded twice with an identical header/row
//! encoding: once under a date-stamped name and once under the
//! stable `<prefix>_latest.csv` alias. Writes are whole-file
//! replacements; nothing is ever patched in place.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::{info, warn};

use crate::error::StoreError;
use crate::model::source::FILE_DATE_FORMAT;
use crate::model::{Record, SnapshotSource};

/// Result of a snapshot write attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Both the dated file and the `latest` alias were written.
    Written { dated: PathBuf, latest: PathBuf },
    /// Zero records were supplied; nothing on disk was touched.
    SkippedEmpty,
}

/// A dated snapshot file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedSnapshot {
    pub date: NaiveDate,
    pub path: PathBuf,
}

/// File-backed snapshot store rooted at one data directory.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    data_dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the `latest` alias for a source. The file may not exist.
    pub fn latest_path(&self, source: &SnapshotSource) -> PathBuf {
        self.data_dir.join(source.latest_file_name())
    }

    /// Writes `records` as the dated snapshot for `as_of` and
    /// overwrites the `latest` alias with the same content.
    ///
    /// Empty input is a logged no-op so a failed fetch can never
    /// clobber a prior valid snapshot. The two writes are not
    /// transactional: a crash in between leaves the dated file
    /// correct and `latest` stale, which self-heals on the next run.
    pub fn write_snapshot(
        &self,
        source: &SnapshotSource,
        records: &[Record],
        as_of: NaiveDate,
    ) -> Result<WriteOutcome, StoreError> {
        if records.is_empty() {
            warn!("No records for source '{source}'; snapshot write skipped");
            return Ok(WriteOutcome::SkippedEmpty);
        }

        fs::create_dir_all(&self.data_dir)?;

        let header: Vec<String> = records[0].field_names().map(str::to_string).collect();

        // Dated file first: it is the durable record. "latest" is
        // best-effort and may lag by one crash.
        let dated = self.data_dir.join(source.dated_file_name(as_of));
        write_csv(&dated, &header, records)?;

        let latest = self.latest_path(source);
        write_csv(&latest, &header, records)?;

        info!(
            "Saved {} snapshot rows for '{source}' to {} and {}",
            records.len(),
            dated.display(),
            latest.display()
        );

        Ok(WriteOutcome::Written { dated, latest })
    }

    /// Dated snapshot files for a source, ascending by embedded date.
    ///
    /// The `latest` alias and files without a parseable trailing
    /// `YYYYMMDD` are excluded. Reads the directory fresh on every
    /// call since it is mutated between runs.
    pub fn list_dated_snapshots(
        &self,
        source: &SnapshotSource,
    ) -> Result<Vec<DatedSnapshot>, StoreError> {
        let mut found = Vec::new();

        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            // A source with no writes yet has no directory either.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(found),
            Err(e) => return Err(e.into()),
        };

        let name_prefix = format!("{}_", source.prefix());

        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if !name.starts_with(&name_prefix) || !name.ends_with(".csv") {
                continue;
            }

            let stem = name.trim_end_matches(".csv");
            if stem.ends_with("_latest") {
                continue;
            }

            let Some(date) = embedded_date(stem) else {
                continue;
            };

            found.push(DatedSnapshot {
                date,
                path: entry.path(),
            });
        }

        found.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.path.cmp(&b.path)));
        Ok(found)
    }

    /// Reads all rows of a snapshot file into records, pairing each
    /// row's values with the header in order. Short rows yield short
    /// records rather than errors.
    pub fn read_records(path: &Path) -> Result<Vec<Record>, StoreError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let header = reader.headers()?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let mut record = Record::new();
            for (name, value) in header.iter().zip(row.iter()) {
                record.push(name, value);
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Reads only the first data row of a snapshot file.
    pub fn read_first_record(path: &Path) -> Result<Option<Record>, StoreError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let header = reader.headers()?.clone();

        match reader.records().next() {
            Some(row) => {
                let row = row?;
                let mut record = Record::new();
                for (name, value) in header.iter().zip(row.iter()) {
                    record.push(name, value);
                }
                Ok(Some(record))
            },
            None => Ok(None),
        }
    }
}

/// Trailing `YYYYMMDD` segment of a dated snapshot filename stem.
fn embedded_date(stem: &str) -> Option<NaiveDate> {
    let segment = stem.rsplit('_').next()?;
    NaiveDate::parse_from_str(segment, FILE_DATE_FORMAT).ok()
}

fn write_csv(path: &Path, header: &[String], records: &[Record]) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(header)?;

    for record in records {
        // Values are emitted in header order so every row of both
        // destinations shares one schema.
        let row: Vec<&str> = header
            .iter()
            .map(|name| record.get(name).unwrap_or(""))
            .collect();
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
