//! Time windows over the session history.
//!
//! "This week" and "last week" are rolling 7-day windows ending at `now`;
//! "this month" starts at 00:00 UTC on the first of the current month.
//! The Mon-Sun day summary uses the calendar week instead.

use crate::WorkoutSession;
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};

/// Session count and training minutes for one window
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowStats {
    pub sessions: usize,
    pub total_minutes: f64,
}

impl WindowStats {
    fn add(&mut self, session: &WorkoutSession) {
        self.sessions += 1;
        self.total_minutes += session.duration_minutes();
    }
}

/// Sessions bucketed relative to `now`
#[derive(Clone, Debug)]
pub struct Windows<'a> {
    pub this_week: Vec<&'a WorkoutSession>,
    pub last_week: Vec<&'a WorkoutSession>,
    pub this_month: Vec<&'a WorkoutSession>,
}

impl<'a> Windows<'a> {
    /// Bucket sessions by start time. Sessions starting after `now` fall
    /// outside every window. The month window may overlap both weeks.
    pub fn partition(sessions: &'a [WorkoutSession], now: DateTime<Utc>) -> Self {
        let week_ago = now - Duration::days(7);
        let two_weeks_ago = now - Duration::days(14);
        let month_start = month_start(now);

        let mut windows = Windows {
            this_week: Vec::new(),
            last_week: Vec::new(),
            this_month: Vec::new(),
        };

        for session in sessions {
            let start = session.start_time;
            if start > now {
                continue;
            }
            if start >= week_ago {
                windows.this_week.push(session);
            } else if start >= two_weeks_ago {
                windows.last_week.push(session);
            }
            if start >= month_start {
                windows.this_month.push(session);
            }
        }

        tracing::debug!(
            "Windowed sessions: {} this week, {} last week, {} this month",
            windows.this_week.len(),
            windows.last_week.len(),
            windows.this_month.len()
        );

        windows
    }

    pub fn this_week_stats(&self) -> WindowStats {
        stats(&self.this_week)
    }

    pub fn last_week_stats(&self) -> WindowStats {
        stats(&self.last_week)
    }

    pub fn this_month_stats(&self) -> WindowStats {
        stats(&self.this_month)
    }
}

/// Totals for a set of sessions; sessions without an end time add no minutes
pub fn stats(sessions: &[&WorkoutSession]) -> WindowStats {
    let mut totals = WindowStats::default();
    for session in sessions {
        totals.add(session);
    }
    totals
}

/// 00:00 UTC on the first day of `now`'s month
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// Monday through Sunday of the calendar week containing `now`
pub fn calendar_week(now: DateTime<Utc>) -> [NaiveDate; 7] {
    let today = now.date_naive();
    // Monday = 1 .. Sunday = 7
    let iso_day = u64::from(today.weekday().number_from_monday());
    let monday = today
        .checked_sub_days(Days::new(iso_day - 1))
        .unwrap_or(today);

    let mut week = [monday; 7];
    for (offset, day) in week.iter_mut().enumerate() {
        *day = monday
            .checked_add_days(Days::new(offset as u64))
            .unwrap_or(monday);
    }
    week
}
