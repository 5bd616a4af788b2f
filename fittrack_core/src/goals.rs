//! Goal progress, workout targets and goal achievement.

use crate::percent::{clamp_percent, percent, round_half_up};
use crate::{CompletedGoal, Goal, GoalStatus, GoalSummary, GoalType, WorkoutSession};
use chrono::{DateTime, Duration, Utc};

/// Completed goals older than this many days are labelled "recently"
const LAST_MONTH_MAX_DAYS: i64 = 60;

/// Percent complete, always within 0..=100
pub fn goal_progress(goal: &Goal) -> u8 {
    clamp_percent(percent(goal.current_value, goal.target_value))
}

/// Active goals that track workout frequency
pub fn is_workout_goal(goal: &Goal) -> bool {
    goal.status == GoalStatus::Active
        && (goal.kind == GoalType::Consistency || goal.kind.as_str().contains("workout"))
}

/// Weekly/monthly session targets taken from the user's workout goals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GoalTargets {
    pub weekly: Option<u32>,
    pub monthly: Option<u32>,
}

impl GoalTargets {
    /// The first workout goal whose name mentions "week" (resp. "month")
    /// supplies that target.
    pub fn derive(goals: &[Goal]) -> Self {
        let mut targets = GoalTargets::default();
        for goal in goals.iter().filter(|g| is_workout_goal(g)) {
            let name = goal.name.to_lowercase();
            let target =
                u32::try_from(round_half_up(goal.target_value).max(1)).unwrap_or(u32::MAX);
            if targets.weekly.is_none() && name.contains("week") {
                targets.weekly = Some(target);
            }
            if targets.monthly.is_none() && name.contains("month") {
                targets.monthly = Some(target);
            }
        }
        targets
    }
}

/// Monthly session target implied by the user's own history
///
/// Sessions are spread over `ceil(days since first session / 30)` months
/// (at least one). The average per month, or `min_target` when that
/// rounds to zero, is raised to at least `min_target`.
pub fn fallback_monthly_target(
    sessions: &[WorkoutSession],
    now: DateTime<Utc>,
    min_target: u32,
) -> u32 {
    let Some(earliest) = sessions.iter().map(|s| s.start_time).min() else {
        return min_target;
    };

    let span_ms = (now - earliest).num_milliseconds() as f64;
    let month_ms = Duration::days(30).num_milliseconds() as f64;
    let months_with_data = (span_ms / month_ms).ceil().max(1.0);

    let average = round_half_up(sessions.len() as f64 / months_with_data);
    let average = if average <= 0 { i64::from(min_target) } else { average };

    let target = u32::try_from(average.max(i64::from(min_target))).unwrap_or(u32::MAX);
    tracing::debug!(
        "Fallback monthly target: {} ({} sessions over {} month(s))",
        target,
        sessions.len(),
        months_with_data
    );
    target
}

/// Overall goal achievement score
///
/// With active workout goals this is their average progress. Without any,
/// this month's session count is measured against
/// [`fallback_monthly_target`].
pub fn goal_achievement(
    goals: &[Goal],
    sessions: &[WorkoutSession],
    month_sessions: usize,
    now: DateTime<Utc>,
    min_target: u32,
) -> u8 {
    let workout_goals: Vec<&Goal> = goals.iter().filter(|g| is_workout_goal(g)).collect();
    if !workout_goals.is_empty() {
        let total: u32 = workout_goals.iter().map(|g| u32::from(goal_progress(g))).sum();
        return clamp_percent(round_half_up(
            f64::from(total) / workout_goals.len() as f64,
        ));
    }

    let target = fallback_monthly_target(sessions, now, min_target);
    clamp_percent(percent(month_sessions as f64, f64::from(target)))
}

/// Human-readable age of a completed goal
pub fn completed_label(completed: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now - completed).num_days();
    match days {
        d if d <= 0 => "today".to_string(),
        1 => "yesterday".to_string(),
        d if d < 7 => format!("{} days ago", d),
        d if d < LAST_MONTH_MAX_DAYS => "last month".to_string(),
        _ => "recently".to_string(),
    }
}

/// Dashboard view of a goal with its clamped progress percent
pub fn summarize(goal: &Goal) -> GoalSummary {
    GoalSummary {
        id: goal.id.clone(),
        name: goal.name.clone(),
        kind: goal.kind.clone(),
        current_value: goal.current_value,
        target_value: goal.target_value,
        progress: goal_progress(goal),
        deadline: goal.deadline,
    }
}

/// Active goals in input order (newest first), with progress
pub fn active_goals(goals: &[Goal]) -> Vec<GoalSummary> {
    goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .map(summarize)
        .collect()
}

/// Completed goals with their relative completion label
pub fn completed_goals(goals: &[Goal], now: DateTime<Utc>) -> Vec<CompletedGoal> {
    goals
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .map(|g| CompletedGoal {
            id: g.id.clone(),
            name: g.name.clone(),
            kind: g.kind.clone(),
            completed_date: g.completed_date,
            completed_label: g
                .completed_date
                .map(|d| completed_label(d, now))
                .unwrap_or_else(|| "recently".to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WorkoutInfo;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 20, 12, 0, 0).unwrap()
    }

    fn goal(name: &str, kind: &str, current: f64, target: f64, status: GoalStatus) -> Goal {
        Goal {
            id: name.to_lowercase().replace(' ', "-"),
            user_id: "u1".into(),
            name: name.into(),
            kind: GoalType::from(kind),
            target_value: target,
            current_value: current,
            status,
            deadline: None,
            start_date: now() - Duration::days(60),
            completed_date: None,
        }
    }

    fn sessions_days_ago(days: &[i64]) -> Vec<WorkoutSession> {
        days.iter()
            .map(|d| {
                let start = now() - Duration::days(*d);
                WorkoutSession {
                    id: format!("s{}", d),
                    user_id: "u1".into(),
                    workout: WorkoutInfo {
                        id: "w".into(),
                        name: "Run".into(),
                        description: String::new(),
                    },
                    start_time: start,
                    end_time: None,
                    completed: true,
                    exercise_logs: vec![],
                }
            })
            .collect()
    }

    #[test]
    fn test_goal_progress_bounds() {
        let done = goal("Run 50km", "performance", 50.0, 50.0, GoalStatus::Active);
        assert_eq!(goal_progress(&done), 100);

        let fresh = goal("Run 50km", "performance", 0.0, 50.0, GoalStatus::Active);
        assert_eq!(goal_progress(&fresh), 0);

        let over = goal("Run 50km", "performance", 80.0, 50.0, GoalStatus::Active);
        assert_eq!(goal_progress(&over), 100);

        let partial = goal("Lose 5kg", "weight", 2.0, 3.0, GoalStatus::Active);
        assert_eq!(goal_progress(&partial), 67);
    }

    #[test]
    fn test_zero_target_never_divides() {
        let broken = goal("Legacy", "performance", 10.0, 0.0, GoalStatus::Active);
        assert_eq!(goal_progress(&broken), 0);
    }

    #[test]
    fn test_workout_goal_filter() {
        assert!(is_workout_goal(&goal("Train", "consistency", 1.0, 4.0, GoalStatus::Active)));
        assert!(is_workout_goal(&goal("Train", "weekly_workouts", 1.0, 4.0, GoalStatus::Active)));
        assert!(!is_workout_goal(&goal("Train", "weight", 1.0, 4.0, GoalStatus::Active)));
        assert!(!is_workout_goal(&goal("Train", "consistency", 1.0, 4.0, GoalStatus::Completed)));
    }

    #[test]
    fn test_targets_from_goal_names() {
        let goals = vec![
            goal("Bench 100kg", "performance", 80.0, 100.0, GoalStatus::Active),
            goal("Workouts per Week", "consistency", 2.0, 4.0, GoalStatus::Active),
            goal("Monthly sessions", "consistency", 5.0, 16.0, GoalStatus::Active),
            goal("Another week goal", "consistency", 0.0, 7.0, GoalStatus::Active),
        ];
        let targets = GoalTargets::derive(&goals);
        assert_eq!(targets.weekly, Some(4));
        assert_eq!(targets.monthly, Some(16));

        assert_eq!(GoalTargets::derive(&[]), GoalTargets::default());
    }

    #[test]
    fn test_oversized_target_saturates() {
        let goals = vec![goal(
            "Sessions per week",
            "consistency",
            1.0,
            4_294_967_296.0,
            GoalStatus::Active,
        )];
        assert_eq!(GoalTargets::derive(&goals).weekly, Some(u32::MAX));

        let goals = vec![goal("Monthly sessions", "consistency", 1.0, 1e30, GoalStatus::Active)];
        assert_eq!(GoalTargets::derive(&goals).monthly, Some(u32::MAX));
    }

    #[test]
    fn test_fallback_target_without_history() {
        assert_eq!(fallback_monthly_target(&[], now(), 4), 4);
    }

    #[test]
    fn test_fallback_target_from_frequency() {
        // 20 sessions spread over 59 days -> 2 months -> 10 per month
        let days: Vec<i64> = (0..20).map(|i| i * 3 + 2).collect();
        let sessions = sessions_days_ago(&days);
        assert_eq!(fallback_monthly_target(&sessions, now(), 4), 10);

        // A sparse history never drops below the minimum
        let sessions = sessions_days_ago(&[85, 40]);
        assert_eq!(fallback_monthly_target(&sessions, now(), 4), 4);
    }

    #[test]
    fn test_achievement_uses_workout_goals_when_present() {
        let goals = vec![
            goal("Workouts per week", "consistency", 2.0, 4.0, GoalStatus::Active),
            goal("Monthly workouts", "consistency", 12.0, 12.0, GoalStatus::Active),
        ];
        assert_eq!(goal_achievement(&goals, &[], 0, now(), 4), 75);
    }

    #[test]
    fn test_achievement_fallback() {
        let sessions = sessions_days_ago(&[1, 3, 5]);
        // Target is the minimum (4); 3 of 4 this month
        assert_eq!(goal_achievement(&[], &sessions, 3, now(), 4), 75);
        assert_eq!(goal_achievement(&[], &sessions, 9, now(), 4), 100);
        assert_eq!(goal_achievement(&[], &[], 0, now(), 4), 0);
    }

    #[test]
    fn test_completed_labels() {
        let now = now();
        assert_eq!(completed_label(now - Duration::hours(3), now), "today");
        assert_eq!(completed_label(now - Duration::days(1), now), "yesterday");
        assert_eq!(completed_label(now - Duration::days(3), now), "3 days ago");
        assert_eq!(completed_label(now - Duration::days(12), now), "last month");
        assert_eq!(completed_label(now - Duration::days(40), now), "last month");
        assert_eq!(completed_label(now - Duration::days(90), now), "recently");
    }

    #[test]
    fn test_goal_classification() {
        let mut finished = goal("5k under 25min", "performance", 1.0, 1.0, GoalStatus::Completed);
        finished.completed_date = Some(now() - Duration::days(3));
        let goals = vec![
            goal("Workouts per week", "consistency", 2.0, 4.0, GoalStatus::Active),
            finished,
            goal("Abandoned", "weight", 0.0, 5.0, GoalStatus::Abandoned),
        ];

        let active = active_goals(&goals);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].progress, 50);

        let completed = completed_goals(&goals, now());
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].completed_label, "3 days ago");
    }
}
