//! Dashboard summary: this week at a glance.
//!
//! Composes windowing, streaks and goal targets into the structure the
//! dashboard page renders. Everything is derived from the snapshot and the
//! supplied `now`; nothing here reads the clock.

use crate::goals::{active_goals, fallback_monthly_target, GoalTargets};
use crate::percent::{clamp_percent, percent, round_half_up};
use crate::snapshot::Snapshot;
use crate::streak::current_streak;
use crate::window::Windows;
use crate::{Config, GoalSummary, RecentWorkout, WorkoutSession};
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub workouts: usize,
    /// Minutes
    pub total_time: i64,
    pub calories: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuickStats {
    pub weekly_progress: u8,
    pub monthly_progress: u8,
    pub current_streak: u32,
    pub weekly_goal_current: usize,
    pub weekly_goal_target: u32,
    pub monthly_goal_current: usize,
    pub monthly_goal_target: u32,
}

/// Placeholder entry for the "upcoming" list
///
/// These are guesses built from recent history, not a schedule.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingWorkout {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Display label: "Today", "Tomorrow" or a weekday name
    pub date: String,
    pub scheduled_for: NaiveDate,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub weekly_stats: WeeklyStats,
    pub recent_workouts: Vec<RecentWorkout>,
    pub goals: Vec<GoalSummary>,
    pub quick_stats: QuickStats,
    pub upcoming_workouts: Vec<UpcomingWorkout>,
}

/// Build the dashboard summary for one user's snapshot
pub fn build_dashboard(snapshot: &Snapshot, now: DateTime<Utc>, config: &Config) -> DashboardSummary {
    let sessions = &snapshot.sessions;
    let rate = config.estimates.calories_per_minute;

    let windows = Windows::partition(sessions, now);
    let week = windows.this_week_stats();
    let month = windows.this_month_stats();
    let total_time = round_half_up(week.total_minutes);

    let targets = GoalTargets::derive(&snapshot.goals);
    let weekly_target = targets
        .weekly
        .unwrap_or(config.targets.default_weekly_target);
    let monthly_target = targets.monthly.unwrap_or_else(|| {
        fallback_monthly_target(sessions, now, config.targets.min_monthly_target)
    });

    let quick_stats = QuickStats {
        weekly_progress: clamp_percent(percent(week.sessions as f64, f64::from(weekly_target))),
        monthly_progress: clamp_percent(percent(
            month.sessions as f64,
            f64::from(monthly_target),
        )),
        current_streak: current_streak(sessions.iter().map(|s| s.start_time), now),
        weekly_goal_current: week.sessions,
        weekly_goal_target: weekly_target,
        monthly_goal_current: month.sessions,
        monthly_goal_target: monthly_target,
    };

    let mut goals = active_goals(&snapshot.goals);
    goals.truncate(config.dashboard.goal_limit);

    let summary = DashboardSummary {
        weekly_stats: WeeklyStats {
            workouts: week.sessions,
            total_time,
            calories: estimate_calories(week.total_minutes, rate),
        },
        recent_workouts: recent_workouts(sessions, config.dashboard.recent_limit, rate),
        goals,
        quick_stats,
        upcoming_workouts: upcoming_workouts(sessions, now),
    };

    tracing::info!(
        "Built dashboard: {} workouts this week, streak {}",
        summary.weekly_stats.workouts,
        summary.quick_stats.current_streak
    );
    summary
}

/// Estimated calories for `minutes` of training
pub fn estimate_calories(minutes: f64, calories_per_minute: f64) -> i64 {
    round_half_up(minutes * calories_per_minute)
}

/// The `limit` newest sessions (input is newest first)
pub fn recent_workouts(
    sessions: &[WorkoutSession],
    limit: usize,
    calories_per_minute: f64,
) -> Vec<RecentWorkout> {
    sessions
        .iter()
        .take(limit)
        .map(|s| {
            let minutes = s.duration_minutes();
            RecentWorkout {
                id: s.id.clone(),
                name: s.workout.name.clone(),
                date: s.start_time,
                duration: round_half_up(minutes),
                exercises: s.exercise_logs.len(),
                calories: estimate_calories(minutes, calories_per_minute),
                completed: s.completed,
            }
        })
        .collect()
}

/// Placeholder "upcoming" entries
///
/// A rest day is suggested for today when nothing has been logged today.
/// Tomorrow repeats the most recent workout and the day after repeats the
/// one before it, when that much history exists. Sessions dated after
/// `now` are not history yet and are ignored.
pub fn upcoming_workouts(sessions: &[WorkoutSession], now: DateTime<Utc>) -> Vec<UpcomingWorkout> {
    let today = now.date_naive();
    let mut upcoming = Vec::new();
    let past: Vec<&WorkoutSession> = sessions.iter().filter(|s| s.start_time <= now).collect();

    if !past.iter().any(|s| s.start_day() == today) {
        upcoming.push(UpcomingWorkout {
            id: "rest-day".to_string(),
            name: "Rest Day".to_string(),
            description: "Recovery and light stretching".to_string(),
            date: "Today".to_string(),
            scheduled_for: today,
        });
    }

    for (offset, session) in (1u64..).zip(past.iter().take(2)) {
        let Some(day) = today.checked_add_days(Days::new(offset)) else {
            continue;
        };
        let date = if offset == 1 {
            "Tomorrow".to_string()
        } else {
            day.format("%A").to_string()
        };

        upcoming.push(UpcomingWorkout {
            id: format!("upcoming-{}", offset),
            name: session.workout.name.clone(),
            description: session.workout.description.clone(),
            date,
            scheduled_for: day,
        });
    }

    upcoming
}
