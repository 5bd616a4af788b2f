//! Consecutive-day streaks from session start times.
//!
//! Days are UTC calendar days. Several sessions on one day count once.

use chrono::{DateTime, Days, NaiveDate, Utc};
use std::collections::BTreeSet;

/// Distinct UTC calendar days on which at least one session started
pub fn active_days<I>(starts: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    starts.into_iter().map(|t| t.date_naive()).collect()
}

/// Current streak as shown on the dashboard and progress page
///
/// Walks the distinct days newest first:
/// 1. If the newest day is today, the streak starts at 1 and the scan
///    continues from the next day.
/// 2. Otherwise the streak starts at 0 and the newest day opens the run.
/// 3. Each day exactly one day before the previously scanned day adds 1;
///    the first gap ends the scan.
///
/// A run that ended before today is still reported (see DESIGN.md).
/// Sessions that start after `now` are ignored.
pub fn current_streak<I>(starts: I, now: DateTime<Utc>) -> u32
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let days: Vec<NaiveDate> = active_days(starts.into_iter().filter(|t| *t <= now))
        .into_iter()
        .rev()
        .collect();
    let Some(&newest) = days.first() else {
        return 0;
    };

    let today = now.date_naive();
    let (mut streak, scan_from) = if newest == today { (1, 1) } else { (0, 0) };

    let mut previous: Option<NaiveDate> = if scan_from == 1 { Some(newest) } else { None };
    for &day in &days[scan_from..] {
        match previous {
            Some(prev) if prev.checked_sub_days(Days::new(1)) != Some(day) => break,
            _ => {}
        }
        streak += 1;
        previous = Some(day);
    }

    tracing::debug!("Current streak: {} day(s), newest active day {}", streak, newest);
    streak
}

/// Longest run of consecutive active days anywhere in the history
pub fn longest_streak<I>(starts: I) -> u32
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for day in active_days(starts) {
        current = match previous {
            Some(prev) if prev.checked_add_days(Days::new(1)) == Some(day) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(day);
    }

    longest
}
