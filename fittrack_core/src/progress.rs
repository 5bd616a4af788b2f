//! Progress summary: long-term trends for the progress page.

use crate::dashboard::recent_workouts;
use crate::goals::{active_goals, completed_goals, goal_achievement, goal_progress, GoalTargets};
use crate::percent::{clamp_percent, percent, round_half_up, round_tenths};
use crate::snapshot::Snapshot;
use crate::strength::{strength_increase, strength_progressions, StrengthProgression};
use crate::streak::{active_days, current_streak, longest_streak};
use crate::window::{calendar_week, Windows};
use crate::{CompletedGoal, Config, GoalStatus, GoalSummary, RecentWorkout, WorkoutSession};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days in a row needed for the streak badge
const STREAK_BADGE_DAYS: u32 = 7;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub workouts_completed: usize,
    /// Percent change of this week's sessions against last week's
    pub weekly_change: i64,
    pub strength_increase: i64,
    pub streak: u32,
    /// Minutes across the whole history
    pub training_time: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressMetrics {
    pub workout_consistency: u8,
    pub strength_progression: u8,
    pub goal_achievement: u8,
    pub overall_progress: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub earned: bool,
    pub progress: u8,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Completed,
    Today,
    Upcoming,
    Missed,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    /// Short weekday name, "Mon" .. "Sun"
    pub day: String,
    pub date: NaiveDate,
    pub status: DayStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Minutes, over sessions with a recorded end
    pub average_duration: i64,
    /// Sum of reps x weight over every logged set
    pub total_volume: i64,
    pub average_workouts_per_week: f64,
    pub completion_rate: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseFrequency {
    pub exercise_id: String,
    pub name: String,
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroupShare {
    pub group: String,
    pub count: usize,
    pub percentage: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseAnalytics {
    pub most_frequent_exercises: Vec<ExerciseFrequency>,
    pub muscle_group_distribution: Vec<MuscleGroupShare>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub metrics: Metrics,
    pub progress_metrics: ProgressMetrics,
    pub achievements: Vec<Achievement>,
    pub week_summary: Vec<DaySummary>,
    pub strength_progression: Vec<StrengthProgression>,
    pub performance_metrics: PerformanceMetrics,
    pub current_goals: Vec<GoalSummary>,
    pub completed_goals: Vec<CompletedGoal>,
    pub recent_workouts: Vec<RecentWorkout>,
    pub exercise_analytics: ExerciseAnalytics,
}

/// Build the progress summary for one user's snapshot
pub fn build_progress(snapshot: &Snapshot, now: DateTime<Utc>, config: &Config) -> ProgressSummary {
    let sessions = &snapshot.sessions;
    let goals = &snapshot.goals;

    let windows = Windows::partition(sessions, now);
    let this_week = windows.this_week_stats().sessions;
    let last_week = windows.last_week_stats().sessions;
    let this_month = windows.this_month_stats().sessions;

    let mut progressions = strength_progressions(sessions);
    let increase = strength_increase(&progressions);
    progressions.truncate(config.progress.strength_top);

    let training_minutes: f64 = sessions.iter().map(|s| s.duration_minutes()).sum();
    let metrics = Metrics {
        workouts_completed: sessions.iter().filter(|s| s.completed).count(),
        weekly_change: weekly_change(this_week, last_week),
        strength_increase: increase,
        streak: current_streak(sessions.iter().map(|s| s.start_time), now),
        training_time: round_half_up(training_minutes),
    };

    let weekly_target = GoalTargets::derive(goals)
        .weekly
        .unwrap_or(config.targets.default_weekly_target);
    let consistency = clamp_percent(percent(this_week as f64, f64::from(weekly_target)));
    let strength = clamp_percent(increase);
    let achievement = goal_achievement(
        goals,
        sessions,
        this_month,
        now,
        config.targets.min_monthly_target,
    );
    let overall = clamp_percent(round_half_up(
        (f64::from(consistency) + f64::from(strength) + f64::from(achievement)) / 3.0,
    ));

    let summary = ProgressSummary {
        metrics,
        progress_metrics: ProgressMetrics {
            workout_consistency: consistency,
            strength_progression: strength,
            goal_achievement: achievement,
            overall_progress: overall,
        },
        achievements: achievements(snapshot),
        week_summary: week_summary(sessions, now),
        strength_progression: progressions,
        performance_metrics: performance_metrics(sessions, now),
        current_goals: active_goals(goals),
        completed_goals: completed_goals(goals, now),
        recent_workouts: recent_workouts(
            sessions,
            config.dashboard.recent_limit,
            config.estimates.calories_per_minute,
        ),
        exercise_analytics: exercise_analytics(sessions, config.progress.exercise_top),
    };

    tracing::info!(
        "Built progress summary: {} completed workouts, overall progress {}%",
        summary.metrics.workouts_completed,
        summary.progress_metrics.overall_progress
    );
    summary
}

/// Percent change from last week to this week
///
/// Going from nothing to something counts as +100%.
pub fn weekly_change(this_week: usize, last_week: usize) -> i64 {
    match (this_week, last_week) {
        (0, 0) => 0,
        (_, 0) => 100,
        (this, last) => percent(this as f64 - last as f64, last as f64),
    }
}

/// Three badges derived from history and goals
pub fn achievements(snapshot: &Snapshot) -> Vec<Achievement> {
    let total = snapshot.sessions.len();
    let longest = longest_streak(snapshot.sessions.iter().map(|s| s.start_time));
    let completed = snapshot
        .goals
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count();
    let best_active = snapshot
        .goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .map(goal_progress)
        .max()
        .unwrap_or(0);

    vec![
        Achievement {
            id: "first-workout".into(),
            title: "First Workout".into(),
            description: "Log your first workout".into(),
            earned: total > 0,
            progress: if total > 0 { 100 } else { 0 },
        },
        Achievement {
            id: "week-streak".into(),
            title: "Week Warrior".into(),
            description: format!("Work out {} days in a row", STREAK_BADGE_DAYS),
            earned: longest >= STREAK_BADGE_DAYS,
            progress: clamp_percent(percent(
                f64::from(longest),
                f64::from(STREAK_BADGE_DAYS),
            )),
        },
        Achievement {
            id: "goal-crusher".into(),
            title: "Goal Crusher".into(),
            description: "Complete a goal".into(),
            earned: completed > 0,
            progress: if completed > 0 { 100 } else { best_active },
        },
    ]
}

/// Monday to Sunday of the current calendar week
pub fn week_summary(sessions: &[WorkoutSession], now: DateTime<Utc>) -> Vec<DaySummary> {
    let trained = active_days(sessions.iter().map(|s| s.start_time));
    let today = now.date_naive();

    calendar_week(now)
        .into_iter()
        .map(|date| {
            let status = if trained.contains(&date) {
                DayStatus::Completed
            } else if date == today {
                DayStatus::Today
            } else if date > today {
                DayStatus::Upcoming
            } else {
                DayStatus::Missed
            };
            DaySummary {
                day: date.format("%a").to_string(),
                date,
                status,
            }
        })
        .collect()
}

pub fn performance_metrics(sessions: &[WorkoutSession], now: DateTime<Utc>) -> PerformanceMetrics {
    let timed: Vec<f64> = sessions
        .iter()
        .filter(|s| s.end_time.is_some())
        .map(|s| s.duration_minutes())
        .collect();
    let average_duration = if timed.is_empty() {
        0
    } else {
        round_half_up(timed.iter().sum::<f64>() / timed.len() as f64)
    };

    let total_volume: f64 = sessions
        .iter()
        .flat_map(|s| &s.exercise_logs)
        .map(|log| log.volume())
        .sum();

    let average_workouts_per_week = match sessions.iter().map(|s| s.start_time).min() {
        Some(earliest) => {
            let span_ms = (now - earliest).num_milliseconds() as f64;
            let week_ms = Duration::days(7).num_milliseconds() as f64;
            let weeks = (span_ms / week_ms).ceil().max(1.0);
            round_tenths(sessions.len() as f64 / weeks)
        }
        None => 0.0,
    };

    let completed = sessions.iter().filter(|s| s.completed).count();

    PerformanceMetrics {
        average_duration,
        total_volume: round_half_up(total_volume),
        average_workouts_per_week,
        completion_rate: clamp_percent(percent(completed as f64, sessions.len() as f64)),
    }
}

/// Most logged exercises and the share of logs per muscle group
pub fn exercise_analytics(sessions: &[WorkoutSession], top: usize) -> ExerciseAnalytics {
    let mut exercises: BTreeMap<&str, (&str, usize)> = BTreeMap::new();
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total_logs = 0usize;

    for log in sessions.iter().flat_map(|s| &s.exercise_logs) {
        total_logs += 1;
        exercises
            .entry(log.exercise.id.as_str())
            .or_insert((log.exercise.name.as_str(), 0))
            .1 += 1;
        *groups.entry(log.exercise.category.as_str()).or_insert(0) += 1;
    }

    let mut most_frequent: Vec<ExerciseFrequency> = exercises
        .into_iter()
        .map(|(id, (name, count))| ExerciseFrequency {
            exercise_id: id.to_string(),
            name: name.to_string(),
            count,
        })
        .collect();
    most_frequent.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.exercise_id.cmp(&b.exercise_id))
    });
    most_frequent.truncate(top);

    let mut distribution: Vec<MuscleGroupShare> = groups
        .into_iter()
        .map(|(group, count)| MuscleGroupShare {
            group: group.to_string(),
            count,
            percentage: clamp_percent(percent(count as f64, total_logs as f64)),
        })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));

    ExerciseAnalytics {
        most_frequent_exercises: most_frequent,
        muscle_group_distribution: distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExerciseInfo, ExerciseLog, Goal, GoalType, WorkoutInfo};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        // Thursday
        Utc.with_ymd_and_hms(2024, 5, 16, 12, 0, 0).unwrap()
    }

    fn log(id: &str, name: &str, category: &str, weight: f64) -> ExerciseLog {
        ExerciseLog {
            id: format!("log-{}", id),
            exercise: ExerciseInfo {
                id: id.into(),
                name: name.into(),
                category: category.into(),
            },
            sets: 2,
            reps: vec![10, 10],
            weight: vec![weight, weight],
            notes: None,
        }
    }

    fn session(days_ago: i64, minutes: Option<i64>, logs: Vec<ExerciseLog>) -> WorkoutSession {
        let start = now() - Duration::days(days_ago) - Duration::hours(2);
        WorkoutSession {
            id: format!("s{}", days_ago),
            user_id: "u1".into(),
            workout: WorkoutInfo {
                id: "w1".into(),
                name: "Strength".into(),
                description: String::new(),
            },
            start_time: start,
            end_time: minutes.map(|m| start + Duration::minutes(m)),
            completed: minutes.is_some(),
            exercise_logs: logs,
        }
    }

    fn history() -> Vec<WorkoutSession> {
        vec![
            session(0, Some(60), vec![
                log("bench", "Bench Press", "Chest", 110.0),
                log("squat", "Squat", "Legs", 140.0),
            ]),
            session(1, Some(40), vec![log("bench", "Bench Press", "Chest", 105.0)]),
            session(3, None, vec![log("row", "Barbell Row", "Back", 70.0)]),
            session(9, Some(50), vec![
                log("bench", "Bench Press", "Chest", 100.0),
                log("squat", "Squat", "Legs", 120.0),
            ]),
        ]
    }

    fn completed_goal() -> Goal {
        Goal {
            id: "g-done".into(),
            user_id: "u1".into(),
            name: "Run a 5k".into(),
            kind: GoalType::Performance,
            target_value: 5.0,
            current_value: 5.0,
            status: GoalStatus::Completed,
            deadline: None,
            start_date: now() - Duration::days(90),
            completed_date: Some(now() - Duration::days(3)),
        }
    }

    #[test]
    fn test_weekly_change() {
        assert_eq!(weekly_change(0, 0), 0);
        assert_eq!(weekly_change(3, 0), 100);
        assert_eq!(weekly_change(3, 2), 50);
        assert_eq!(weekly_change(1, 4), -75);
    }

    #[test]
    fn test_metrics() {
        let snapshot = Snapshot {
            sessions: history(),
            goals: vec![completed_goal()],
        };
        let summary = build_progress(&snapshot, now(), &Config::default());

        assert_eq!(summary.metrics.workouts_completed, 3);
        // 3 sessions this week against 1 last week
        assert_eq!(summary.metrics.weekly_change, 200);
        // Bench +10%, squat +17%
        assert_eq!(summary.metrics.strength_increase, 14);
        assert_eq!(summary.metrics.streak, 2);
        assert_eq!(summary.metrics.training_time, 150);

        assert_eq!(summary.strength_progression.len(), 2);
        assert_eq!(summary.strength_progression[0].exercise, "Squat");

        assert_eq!(summary.completed_goals.len(), 1);
        assert_eq!(summary.completed_goals[0].completed_label, "3 days ago");
    }

    #[test]
    fn test_progress_metrics_with_fallback_target() {
        let snapshot = Snapshot {
            sessions: history(),
            goals: vec![],
        };
        let summary = build_progress(&snapshot, now(), &Config::default());
        let pm = &summary.progress_metrics;

        // 3 this week against the default weekly target of 3
        assert_eq!(pm.workout_consistency, 100);
        assert_eq!(pm.strength_progression, 14);
        // 4 sessions in May, fallback target max(4, 4) = 4
        assert_eq!(pm.goal_achievement, 100);
        assert_eq!(pm.overall_progress, 71);
    }

    #[test]
    fn test_week_summary_statuses() {
        let days = week_summary(&history(), now());
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].day, "Mon");
        assert_eq!(days[0].status, DayStatus::Completed); // 13th, 3 days ago
        assert_eq!(days[1].status, DayStatus::Missed);
        assert_eq!(days[2].status, DayStatus::Completed); // yesterday
        assert_eq!(days[3].status, DayStatus::Completed); // today, trained
        assert_eq!(days[4].status, DayStatus::Upcoming);
        assert_eq!(days[6].day, "Sun");

        let untrained_today = week_summary(&[], now());
        assert_eq!(untrained_today[3].status, DayStatus::Today);
        assert_eq!(untrained_today[0].status, DayStatus::Missed);
    }

    #[test]
    fn test_exercise_analytics() {
        let analytics = exercise_analytics(&history(), 2);

        assert_eq!(analytics.most_frequent_exercises.len(), 2);
        assert_eq!(analytics.most_frequent_exercises[0].name, "Bench Press");
        assert_eq!(analytics.most_frequent_exercises[0].count, 3);
        assert_eq!(analytics.most_frequent_exercises[1].name, "Squat");

        let chest = &analytics.muscle_group_distribution[0];
        assert_eq!(chest.group, "Chest");
        assert_eq!(chest.count, 3);
        assert_eq!(chest.percentage, 50);
        assert_eq!(analytics.muscle_group_distribution.len(), 3);
    }

    #[test]
    fn test_unnamed_exercises_keep_a_stable_order() {
        let ids: Vec<String> = (0..10).map(|i| format!("ex{}", i)).collect();
        let logs_at = |weight: f64| -> Vec<ExerciseLog> {
            ids.iter().map(|id| log(id, "Exercise", "Other", weight)).collect()
        };
        let sessions = vec![
            session(0, Some(30), logs_at(110.0)),
            session(7, Some(30), logs_at(100.0)),
        ];
        let snapshot = Snapshot {
            sessions,
            goals: Vec::new(),
        };
        let config = Config::default();

        let first = build_progress(&snapshot, now(), &config);
        let strength: Vec<_> = first
            .strength_progression
            .iter()
            .map(|p| p.exercise_id.as_str())
            .collect();
        assert_eq!(strength, vec!["ex0", "ex1", "ex2", "ex3"]);
        let frequent: Vec<_> = first
            .exercise_analytics
            .most_frequent_exercises
            .iter()
            .map(|e| e.exercise_id.as_str())
            .collect();
        assert_eq!(frequent, vec!["ex0", "ex1", "ex2", "ex3", "ex4"]);

        for _ in 0..20 {
            assert_eq!(build_progress(&snapshot, now(), &config), first);
        }
    }

    #[test]
    fn test_performance_metrics() {
        let metrics = performance_metrics(&history(), now());

        assert_eq!(metrics.average_duration, 50);
        // 20 reps per log: 2200 + 2800 + 2100 + 1400 + 2000 + 2400
        assert_eq!(metrics.total_volume, 12_900);
        // 4 sessions over two weeks
        assert_eq!(metrics.average_workouts_per_week, 2.0);
        assert_eq!(metrics.completion_rate, 75);
    }

    #[test]
    fn test_achievements() {
        let badges = achievements(&Snapshot {
            sessions: history(),
            goals: vec![completed_goal()],
        });
        assert_eq!(badges.len(), 3);
        assert!(badges[0].earned);
        assert!(!badges[1].earned);
        // Longest run is 2 days (yesterday and today)
        assert_eq!(badges[1].progress, 29);
        assert!(badges[2].earned);
    }

    #[test]
    fn test_empty_snapshot_is_all_zero() {
        let summary = build_progress(&Snapshot::default(), now(), &Config::default());

        assert_eq!(summary.metrics.workouts_completed, 0);
        assert_eq!(summary.metrics.weekly_change, 0);
        assert_eq!(summary.metrics.strength_increase, 0);
        assert_eq!(summary.metrics.streak, 0);
        assert_eq!(summary.progress_metrics.overall_progress, 0);
        assert!(summary.strength_progression.is_empty());
        assert_eq!(summary.performance_metrics.average_workouts_per_week, 0.0);
        assert!(summary.exercise_analytics.most_frequent_exercises.is_empty());
        assert!(summary.achievements.iter().all(|a| !a.earned));
    }

    #[test]
    fn test_progress_is_deterministic() {
        let snapshot = Snapshot {
            sessions: history(),
            goals: vec![completed_goal()],
        };
        let config = Config::default();
        let first = serde_json::to_string(&build_progress(&snapshot, now(), &config)).unwrap();
        let second = serde_json::to_string(&build_progress(&snapshot, now(), &config)).unwrap();
        assert_eq!(first, second);
    }
}
