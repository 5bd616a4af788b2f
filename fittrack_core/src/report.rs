//! Writing summaries to disk.
//!
//! Reports are replaced atomically so a dashboard reading the file never
//! sees a half-written document.

use crate::{Error, Result};
use fs2::FileExt;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `report` as pretty JSON to `path`
///
/// Atomically writes the report by:
/// 1. Writing to a temp file in the same directory
/// 2. Syncing to disk
/// 3. Renaming over the destination
pub fn write_report<T: Serialize>(report: &T, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;

    // Serialize concurrent writers targeting the same directory
    temp.as_file().lock_exclusive()?;

    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        serde_json::to_writer_pretty(&mut writer, report)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    temp.as_file().sync_all()?;
    temp.as_file().unlock()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    tracing::debug!("Wrote report to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::build_dashboard;
    use crate::snapshot::Snapshot;
    use crate::Config;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_write_report_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("reports").join("dashboard.json");

        let now = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        let summary = build_dashboard(&Snapshot::default(), now, &Config::default());
        write_report(&summary, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["weeklyStats"]["workouts"], 0);
        assert_eq!(value["upcomingWorkouts"][0]["id"], "rest-day");
    }

    #[test]
    fn test_write_report_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("report.json");

        write_report(&vec![1, 2, 3], &path).unwrap();
        write_report(&vec![4], &path).unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "report.json")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only report.json, found extras: {:?}",
            extras
        );

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), "[\n  4\n]");
    }
}
