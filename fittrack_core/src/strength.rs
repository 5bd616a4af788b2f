//! Per-exercise strength progression.
//!
//! Compares the heaviest weight lifted in the earliest and the latest
//! session containing each exercise. Only improvements are reported.

use crate::percent::{percent, round_half_up, round_tenths};
use crate::{ExerciseLog, WorkoutSession};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Improvement for a single exercise between its first and last session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrengthProgression {
    pub exercise_id: String,
    pub exercise: String,
    pub previous_weight: f64,
    pub current_weight: f64,
    pub increase: f64,
    /// Real improvement, may exceed 100
    pub percentage: i64,
    /// `percentage` capped at 100 for progress bars
    pub progress: u8,
}

/// Strength progressions for every exercise that improved, best first
///
/// An exercise is included only when its first max weight is positive and
/// its last max weight is strictly higher. Ties on percentage are ordered
/// by exercise name, then by exercise id.
pub fn strength_progressions(sessions: &[WorkoutSession]) -> Vec<StrengthProgression> {
    let mut by_exercise: BTreeMap<&str, Vec<(DateTime<Utc>, &ExerciseLog)>> = BTreeMap::new();
    for session in sessions {
        for log in &session.exercise_logs {
            by_exercise
                .entry(log.exercise.id.as_str())
                .or_default()
                .push((session.start_time, log));
        }
    }

    let mut progressions = Vec::new();
    for (exercise_id, mut entries) in by_exercise {
        entries.sort_by_key(|(start, _)| *start);

        let (Some((_, first)), Some((_, last))) = (entries.first(), entries.last()) else {
            continue;
        };

        let first_weight = first.max_weight();
        let last_weight = last.max_weight();
        if first_weight <= 0.0 || last_weight <= first_weight {
            continue;
        }

        let percentage = percent(last_weight - first_weight, first_weight);
        progressions.push(StrengthProgression {
            exercise_id: exercise_id.to_string(),
            exercise: last.exercise.name.clone(),
            previous_weight: first_weight,
            current_weight: last_weight,
            increase: round_tenths(last_weight - first_weight),
            percentage,
            progress: percentage.min(100) as u8,
        });
    }

    progressions.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then_with(|| a.exercise.cmp(&b.exercise))
            .then_with(|| a.exercise_id.cmp(&b.exercise_id))
    });

    tracing::debug!("{} exercise(s) show strength gains", progressions.len());
    progressions
}

/// Average improvement across all progressing exercises, rounded (0 if none)
pub fn strength_increase(progressions: &[StrengthProgression]) -> i64 {
    if progressions.is_empty() {
        return 0;
    }
    let total: i64 = progressions.iter().map(|p| p.percentage).sum();
    round_half_up(total as f64 / progressions.len() as f64)
}
