//! Input boundary: raw datastore records and their normalization.
//!
//! Records arrive with optional nested relations (a session without its
//! workout, a log without its exercise, missing rep/weight arrays). They are
//! normalized here, once, so the calculators never deal with `Option`
//! relations. Sessions are read from a JSON Lines file, goals from a JSON
//! array file.

use crate::{
    Error, ExerciseInfo, ExerciseLog, Goal, GoalStatus, GoalType, Result, WorkoutInfo,
    WorkoutSession,
};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const UNNAMED_WORKOUT: &str = "Workout";
const UNNAMED_EXERCISE: &str = "Exercise";
const UNKNOWN_CATEGORY: &str = "Other";

/// Workout relation as stored
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWorkout {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Exercise relation as stored
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExercise {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
}

/// Exercise log row with its optional exercise relation
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExerciseLog {
    pub id: String,
    pub exercise_id: Option<String>,
    pub exercise: Option<RawExercise>,
    pub sets: Option<u32>,
    pub reps: Option<Vec<u32>>,
    pub weight: Option<Vec<f64>>,
    pub notes: Option<String>,
}

/// Workout session row with its optional relations
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSession {
    pub id: String,
    pub user_id: String,
    pub workout_id: Option<String>,
    pub workout: Option<RawWorkout>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub exercise_logs: Option<Vec<RawExerciseLog>>,
}

/// Goal row
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGoal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub target_value: f64,
    pub current_value: Option<f64>,
    pub status: GoalStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub start_date: Option<DateTime<Utc>>,
    pub completed_date: Option<DateTime<Utc>>,
}

impl From<RawExerciseLog> for ExerciseLog {
    fn from(raw: RawExerciseLog) -> Self {
        let exercise = raw.exercise.unwrap_or_default();
        let id = raw
            .exercise_id
            .or(exercise.id)
            .unwrap_or_else(|| format!("unknown-{}", raw.id));
        let reps = raw.reps.unwrap_or_default();
        let weight = raw.weight.unwrap_or_default();
        let sets = raw.sets.unwrap_or_else(|| reps.len().max(weight.len()) as u32);

        ExerciseLog {
            id: raw.id,
            exercise: ExerciseInfo {
                id,
                name: exercise.name.unwrap_or_else(|| UNNAMED_EXERCISE.to_string()),
                category: exercise
                    .category
                    .unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
            },
            sets,
            reps,
            weight,
            notes: raw.notes,
        }
    }
}

impl From<RawSession> for WorkoutSession {
    fn from(raw: RawSession) -> Self {
        let workout = raw.workout.unwrap_or_default();

        if let Some(end) = raw.end_time {
            if end < raw.start_time {
                tracing::warn!(
                    "Session {} ends before it starts; treating duration as 0",
                    raw.id
                );
            }
        }

        WorkoutSession {
            id: raw.id,
            user_id: raw.user_id,
            workout: WorkoutInfo {
                id: raw.workout_id.or(workout.id).unwrap_or_default(),
                name: workout.name.unwrap_or_else(|| UNNAMED_WORKOUT.to_string()),
                description: workout.description.unwrap_or_default(),
            },
            start_time: raw.start_time,
            end_time: raw.end_time,
            completed: raw.completed.unwrap_or(false),
            exercise_logs: raw
                .exercise_logs
                .unwrap_or_default()
                .into_iter()
                .map(ExerciseLog::from)
                .collect(),
        }
    }
}

impl From<RawGoal> for Goal {
    fn from(raw: RawGoal) -> Self {
        if raw.target_value.is_nan() || raw.target_value <= 0.0 {
            tracing::warn!(
                "Goal {} has non-positive target {}; progress will read as 0",
                raw.id,
                raw.target_value
            );
        }

        Goal {
            id: raw.id,
            user_id: raw.user_id,
            name: raw.name,
            kind: GoalType::from(raw.kind),
            target_value: raw.target_value,
            current_value: raw.current_value.unwrap_or(0.0).max(0.0),
            status: raw.status,
            deadline: raw.deadline,
            start_date: raw.start_date.unwrap_or_default(),
            completed_date: raw.completed_date,
        }
    }
}

/// Read-only view of one fetch of a user's history
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// Newest first
    pub sessions: Vec<WorkoutSession>,
    /// In datastore order (newest first)
    pub goals: Vec<Goal>,
}

impl Snapshot {
    /// Normalize raw rows and order sessions newest first
    pub fn from_raw(sessions: Vec<RawSession>, goals: Vec<RawGoal>) -> Self {
        let mut sessions: Vec<WorkoutSession> =
            sessions.into_iter().map(WorkoutSession::from).collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));

        Snapshot {
            sessions,
            goals: goals.into_iter().map(Goal::from).collect(),
        }
    }

    /// Load sessions (JSON Lines) and goals (JSON array) from disk
    ///
    /// Missing files mean "no records". Unreadable files or a malformed
    /// goals file fail the whole load.
    pub fn load(sessions_path: &Path, goals_path: &Path) -> Result<Self> {
        let sessions = read_sessions(sessions_path)?;
        let goals = read_goals(goals_path)?;
        let snapshot = Self::from_raw(sessions, goals);

        tracing::info!(
            "Loaded snapshot: {} sessions, {} goals",
            snapshot.sessions.len(),
            snapshot.goals.len()
        );
        Ok(snapshot)
    }

    /// Keep only the records belonging to `user_id`
    pub fn for_user(self, user_id: &str) -> Self {
        let before = (self.sessions.len(), self.goals.len());
        let scoped = Snapshot {
            sessions: self
                .sessions
                .into_iter()
                .filter(|s| s.user_id == user_id)
                .collect(),
            goals: self
                .goals
                .into_iter()
                .filter(|g| g.user_id == user_id)
                .collect(),
        };
        tracing::debug!(
            "Scoped snapshot to user {}: sessions {} -> {}, goals {} -> {}",
            user_id,
            before.0,
            scoped.sessions.len(),
            before.1,
            scoped.goals.len()
        );
        scoped
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.goals.is_empty()
    }
}

/// Read raw sessions from a JSON Lines file under a shared lock
///
/// Blank lines are ignored. A line that fails to parse fails the whole
/// read, so a damaged file never yields a partial history.
pub fn read_sessions(path: &Path) -> Result<Vec<RawSession>> {
    if !path.exists() {
        tracing::debug!("No sessions file at {:?}", path);
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut sessions = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = match line_result {
            Ok(line) => line,
            Err(e) => {
                let _ = file.unlock();
                return Err(Error::Io(e));
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<RawSession>(&line) {
            Ok(session) => sessions.push(session),
            Err(e) => {
                let _ = file.unlock();
                return Err(Error::Snapshot(format!(
                    "sessions file {:?} line {} is not a valid session: {}",
                    path,
                    line_num + 1,
                    e
                )));
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} sessions from {:?}", sessions.len(), path);
    Ok(sessions)
}

/// Read raw goals from a JSON array file under a shared lock
pub fn read_goals(path: &Path) -> Result<Vec<RawGoal>> {
    if !path.exists() {
        tracing::debug!("No goals file at {:?}", path);
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let goals: Vec<RawGoal> = serde_json::from_str(&contents).map_err(|e| {
        Error::Snapshot(format!("goals file {:?} is not a valid goal list: {}", path, e))
    })?;
    tracing::debug!("Read {} goals from {:?}", goals.len(), path);
    Ok(goals)
}
