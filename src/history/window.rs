//! Builds the bounded trailing window of numeric points used for
//! trend charts.
//!
//! Each candidate snapshot contributes at most one point, read from
//! its first data row (single-row-per-file schema for windowed
//! sources). Snapshots without a usable numeric value are dropped,
//! so the window may come back shorter than requested.

use std::path::Path;

use chrono::NaiveDate;
use log::warn;

use crate::error::HistoryError;
use crate::model::source::FILE_DATE_FORMAT;
use crate::model::{Record, SnapshotSource, TrendPoint};
use crate::store::SnapshotStore;

/// One file considered for the window, with the date parsed from its
/// name when it had one.
struct Candidate {
    path: std::path::PathBuf,
    file_date: Option<NaiveDate>,
}

/// Selects up to `window_size` most-recent points for a source, in
/// chronological (oldest→newest) order.
///
/// Candidates are the dated snapshot files; when none exist yet the
/// `latest` alias is used as a one-element fallback. The value of
/// each point is resolved by probing `field_priority` in order; the
/// first present, non-empty, float-parseable field wins.
///
/// Fails with [`HistoryError::NoDataAvailable`] when there is no file
/// to read at all, and [`HistoryError::NoNumericData`] when files
/// exist but every row was dropped — a chart with zero points is
/// meaningless, so neither case is a silently-empty result.
pub fn select_trailing_window(
    store: &SnapshotStore,
    source: &SnapshotSource,
    window_size: usize,
    field_priority: &[String],
    label_priority: &[String],
) -> Result<Vec<TrendPoint>, HistoryError> {
    let dated = store.list_dated_snapshots(source)?;

    let candidates: Vec<Candidate> = if dated.is_empty() {
        let latest = store.latest_path(source);
        if !latest.exists() {
            return Err(HistoryError::NoDataAvailable {
                source_id: source.to_string(),
            });
        }
        vec![Candidate {
            path: latest,
            file_date: None,
        }]
    } else {
        dated
            .into_iter()
            .map(|s| Candidate {
                path: s.path,
                file_date: Some(s.date),
            })
            .collect()
    };

    // Most recent `window_size` files, keeping ascending date order.
    let skip = candidates.len().saturating_sub(window_size);
    let recent = &candidates[skip..];

    let mut points = Vec::with_capacity(recent.len());
    for candidate in recent {
        let row = match SnapshotStore::read_first_record(&candidate.path) {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable snapshot {}: {e}", candidate.path.display());
                None
            },
        };

        let Some(row) = row else { continue };

        let Some(value) = resolve_value(&row, field_priority) else {
            continue;
        };

        let label = resolve_label(&row, label_priority, candidate.file_date, &candidate.path);
        points.push(TrendPoint::new(label, value));
    }

    if points.is_empty() {
        return Err(HistoryError::NoNumericData {
            source_id: source.to_string(),
        });
    }

    Ok(points)
}

/// First present, non-empty, parseable field per the priority order.
fn resolve_value(row: &Record, field_priority: &[String]) -> Option<f64> {
    for field in field_priority {
        if let Some(raw) = row.get(field) {
            if raw.is_empty() {
                continue;
            }
            if let Ok(value) = raw.parse::<f64>() {
                return Some(value);
            }
        }
    }
    None
}

/// Label for a point: an explicit date/time field from the row, else
/// the filename-embedded date, else the raw filename stem.
fn resolve_label(
    row: &Record,
    label_priority: &[String],
    file_date: Option<NaiveDate>,
    path: &Path,
) -> String {
    for field in label_priority {
        if let Some(value) = row.get(field) {
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }

    if let Some(date) = file_date {
        return date.format("%Y-%m-%d").to_string();
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    // A compact trailing date still reads better hyphenated.
    if let Some(segment) = stem.rsplit('_').next() {
        if let Ok(date) = NaiveDate::parse_from_str(segment, FILE_DATE_FORMAT) {
            return date.format("%Y-%m-%d").to_string();
        }
    }

    stem.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_days(values: &[(u32, &str)]) -> (tempfile::TempDir, SnapshotStore, SnapshotSource)
    {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let source = SnapshotSource::new("weather", "Noida_IN");

        for (day, temp) in values {
            let date = NaiveDate::from_ymd_opt(2026, 8, *day).unwrap();
            let record = Record::from_pairs([
                ("snapshot_date", date.format("%Y-%m-%d").to_string()),
                ("temp", temp.to_string()),
            ]);
            store.write_snapshot(&source, &[record], date).unwrap();
        }

        (dir, store, source)
    }

    fn priorities() -> (Vec<String>, Vec<String>) {
        (
            vec!["temp".to_string(), "temp_max".to_string()],
            vec!["snapshot_date".to_string(), "iso_time".to_string()],
        )
    }

    #[test]
    fn takes_the_chronologically_latest_files() {
        // Ten dated files; only the last seven should survive.
        let days: Vec<(u32, String)> = (1..=10).map(|d| (d, format!("{}.0", 20 + d))).collect();
        let borrowed: Vec<(u32, &str)> = days.iter().map(|(d, v)| (*d, v.as_str())).collect();
        let (_dir, store, source) = store_with_days(&borrowed);
        let (fields, labels) = priorities();

        let points = select_trailing_window(&store, &source, 7, &fields, &labels).unwrap();

        assert_eq!(points.len(), 7);
        assert_eq!(points[0].label, "2026-08-04");
        assert_eq!(points[6].label, "2026-08-10");
        assert!(points.windows(2).all(|w| w[0].label <= w[1].label));
    }

    #[test]
    fn drops_non_numeric_entries_preserving_order() {
        let (_dir, store, source) = store_with_days(&[
            (1, "21.0"),
            (2, "n/a"),
            (3, "23.5"),
            (4, ""),
            (5, "25.0"),
            (6, "26.0"),
            (7, "27.0"),
        ]);
        let (fields, labels) = priorities();

        let points = select_trailing_window(&store, &source, 7, &fields, &labels).unwrap();

        assert_eq!(points.len(), 5);
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![21.0, 23.5, 25.0, 26.0, 27.0]);
    }

    #[test]
    fn probes_value_fields_in_priority_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let source = SnapshotSource::new("weather", "Noida_IN");
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

        // "temp" is empty, so "temp_max" should win.
        let record = Record::from_pairs([
            ("snapshot_date", "2026-08-29"),
            ("temp", ""),
            ("temp_max", "31.2"),
        ]);
        store.write_snapshot(&source, &[record], date).unwrap();
        let (fields, labels) = priorities();

        let points = select_trailing_window(&store, &source, 7, &fields, &labels).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 31.2);
    }

    #[test]
    fn falls_back_to_latest_alias_when_no_dated_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let source = SnapshotSource::new("weather", "Noida_IN");
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

        let record = Record::from_pairs([("snapshot_date", "2026-08-29"), ("temp", "24.0")]);
        store.write_snapshot(&source, &[record], date).unwrap();

        // Remove the dated file; only the alias remains.
        std::fs::remove_file(dir.path().join("weather_Noida_IN_20260829.csv")).unwrap();
        let (fields, labels) = priorities();

        let points = select_trailing_window(&store, &source, 7, &fields, &labels).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].label, "2026-08-29");
    }

    #[test]
    fn no_files_at_all_is_no_data_available() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let source = SnapshotSource::new("weather", "Noida_IN");
        let (fields, labels) = priorities();

        let err = select_trailing_window(&store, &source, 7, &fields, &labels).unwrap_err();
        assert!(matches!(err, HistoryError::NoDataAvailable { .. }));
        assert!(err.to_string().contains("weather_Noida_IN"));
    }

    #[test]
    fn files_without_numbers_are_no_numeric_data() {
        let (_dir, store, source) = store_with_days(&[(1, "hot"), (2, "warm")]);
        let (fields, labels) = priorities();

        let err = select_trailing_window(&store, &source, 7, &fields, &labels).unwrap_err();
        assert!(matches!(err, HistoryError::NoNumericData { .. }));
        assert!(err.to_string().contains("weather_Noida_IN"));
    }
}
