//! CSV export of the session history.
//!
//! One row per session, newest first, with the derived minutes, calorie
//! estimate and training volume alongside the raw timestamps.

use crate::dashboard::estimate_calories;
use crate::percent::round_half_up;
use crate::{Result, WorkoutSession};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    id: String,
    workout: String,
    started_at: String,
    ended_at: Option<String>,
    minutes: i64,
    calories: i64,
    exercises: usize,
    volume: i64,
    completed: bool,
}

impl CsvRow {
    fn from_session(session: &WorkoutSession, calories_per_minute: f64) -> Self {
        let minutes = session.duration_minutes();
        CsvRow {
            id: session.id.clone(),
            workout: session.workout.name.clone(),
            started_at: session.start_time.to_rfc3339(),
            ended_at: session.end_time.map(|t| t.to_rfc3339()),
            minutes: round_half_up(minutes),
            calories: estimate_calories(minutes, calories_per_minute),
            exercises: session.exercise_logs.len(),
            volume: round_half_up(session.exercise_logs.iter().map(|l| l.volume()).sum()),
            completed: session.completed,
        }
    }
}

/// Write sessions to `csv_path`, replacing any previous export
///
/// The file is synced to disk before returning. Returns the number of rows
/// written (a header is always written, even for an empty history).
pub fn export_sessions_csv(
    sessions: &[WorkoutSession],
    csv_path: &Path,
    calories_per_minute: f64,
) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record([
        "id",
        "workout",
        "started_at",
        "ended_at",
        "minutes",
        "calories",
        "exercises",
        "volume",
        "completed",
    ])?;
    for session in sessions {
        writer.serialize(CsvRow::from_session(session, calories_per_minute))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} sessions to {:?}", sessions.len(), csv_path);
    Ok(sessions.len())
}
