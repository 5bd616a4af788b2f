//! Core domain types for FitTrack statistics.
//!
//! This module defines the normalized records the calculators work on:
//! - Workout sessions and their exercise logs
//! - Goals, goal types and statuses
//! - Small view types shared by the dashboard and progress summaries
//!
//! Records arrive through [`crate::snapshot`], which fills in missing
//! relations before anything here is constructed.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Session Types
// ============================================================================

/// The workout template a session was performed from
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutInfo {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Exercise reference attached to a log entry
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInfo {
    pub id: String,
    pub name: String,
    /// Muscle group / category, e.g. "Chest"
    pub category: String,
}

/// Sets, reps and weights recorded for one exercise within a session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseLog {
    pub id: String,
    pub exercise: ExerciseInfo,
    pub sets: u32,
    pub reps: Vec<u32>,
    pub weight: Vec<f64>,
    pub notes: Option<String>,
}

impl ExerciseLog {
    /// Reps performed in set `index`, 0 when the set was not recorded
    pub fn rep_at(&self, index: usize) -> u32 {
        self.reps.get(index).copied().unwrap_or(0)
    }

    /// Weight used in set `index`, 0 when the set was not recorded
    pub fn weight_at(&self, index: usize) -> f64 {
        self.weight
            .get(index)
            .copied()
            .filter(|w| w.is_finite())
            .unwrap_or(0.0)
    }

    /// Heaviest weight across all sets (0 when nothing was recorded)
    pub fn max_weight(&self) -> f64 {
        self.weight
            .iter()
            .copied()
            .filter(|w| w.is_finite())
            .fold(0.0, f64::max)
    }

    /// Total load moved: sum of reps x weight over the declared sets
    pub fn volume(&self) -> f64 {
        (0..self.sets as usize)
            .map(|i| f64::from(self.rep_at(i)) * self.weight_at(i))
            .sum()
    }
}

/// A recorded workout session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: String,
    pub user_id: String,
    pub workout: WorkoutInfo,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub completed: bool,
    pub exercise_logs: Vec<ExerciseLog>,
}

impl WorkoutSession {
    /// Session length in minutes; 0 without an end time or with an end
    /// time before the start.
    pub fn duration_minutes(&self) -> f64 {
        match self.end_time {
            Some(end) if end >= self.start_time => {
                (end - self.start_time).num_milliseconds() as f64 / 60_000.0
            }
            _ => 0.0,
        }
    }

    /// Calendar day (UTC) the session started on
    pub fn start_day(&self) -> NaiveDate {
        self.start_time.date_naive()
    }
}

// ============================================================================
// Goal Types
// ============================================================================

/// What a goal measures. Free text outside the known kinds is kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GoalType {
    Weight,
    Consistency,
    Performance,
    Other(String),
}

impl GoalType {
    pub fn as_str(&self) -> &str {
        match self {
            GoalType::Weight => "weight",
            GoalType::Consistency => "consistency",
            GoalType::Performance => "performance",
            GoalType::Other(s) => s,
        }
    }
}

impl From<String> for GoalType {
    fn from(s: String) -> Self {
        parse_goal_type(&s)
    }
}

impl From<&str> for GoalType {
    fn from(s: &str) -> Self {
        parse_goal_type(s)
    }
}

impl From<GoalType> for String {
    fn from(kind: GoalType) -> Self {
        kind.as_str().to_string()
    }
}

fn parse_goal_type(s: &str) -> GoalType {
    match s.trim().to_lowercase().as_str() {
        "weight" => GoalType::Weight,
        "consistency" => GoalType::Consistency,
        "performance" => GoalType::Performance,
        _ => GoalType::Other(s.trim().to_string()),
    }
}

/// Lifecycle state of a goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    Active,
    Completed,
    Abandoned,
}

/// A user goal with its current measured value
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub target_value: f64,
    pub current_value: f64,
    pub status: GoalStatus,
    pub deadline: Option<DateTime<Utc>>,
    pub start_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
}

/// Goal as submitted for creation, before it has an id or status
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

impl NewGoal {
    /// Reject goals whose progress could not be computed later.
    ///
    /// A target of zero or below is refused here so that read-time code
    /// never has to decide what "percent of nothing" means.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("goal name must not be empty".into()));
        }
        if !self.target_value.is_finite() || self.target_value <= 0.0 {
            return Err(Error::Validation(format!(
                "goal '{}': target value must be greater than 0, got {}",
                self.name, self.target_value
            )));
        }
        if !self.current_value.is_finite() || self.current_value < 0.0 {
            return Err(Error::Validation(format!(
                "goal '{}': current value must be 0 or more, got {}",
                self.name, self.current_value
            )));
        }
        Ok(())
    }

    /// Validate and turn into an active goal starting at `now`
    pub fn into_goal(
        self,
        id: impl Into<String>,
        user_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Goal> {
        self.validate()?;
        Ok(Goal {
            id: id.into(),
            user_id: user_id.into(),
            name: self.name.trim().to_string(),
            kind: self.kind,
            target_value: self.target_value,
            current_value: self.current_value,
            status: GoalStatus::Active,
            deadline: self.deadline,
            start_date: now,
            completed_date: None,
        })
    }
}

// ============================================================================
// Shared View Types
// ============================================================================

/// A session as listed under "recent workouts"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentWorkout {
    pub id: String,
    pub name: String,
    pub date: DateTime<Utc>,
    /// Minutes, rounded
    pub duration: i64,
    pub exercises: usize,
    pub calories: i64,
    pub completed: bool,
}

/// A goal with its computed completion percentage
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub current_value: f64,
    pub target_value: f64,
    pub progress: u8,
    pub deadline: Option<DateTime<Utc>>,
}

/// A completed goal with a human-readable "when"
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedGoal {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub completed_date: Option<DateTime<Utc>>,
    pub completed_label: String,
}
