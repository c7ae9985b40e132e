//! Derived statistics over completed sessions.
//!
//! All calendar math happens in the time zone of the supplied `now`: a day is
//! local midnight to local midnight, and weeks start on Monday.

use crate::core::session::{DailyStats, Session};
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeDelta, TimeZone};
use std::collections::BTreeSet;

/// Local calendar day on which `timestamp_ms` falls.
///
/// Returns `None` for timestamps outside chrono's representable range.
#[must_use]
pub fn day_key<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|utc| utc.with_timezone(tz).date_naive())
}

/// Start of `date` in local time, in ms since the epoch.
///
/// Where DST skips midnight the day starts at the first local time that
/// exists, e.g. 01:00.
fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    // DST gaps are whole quarter hours.
    (0..=24 * 4)
        .filter_map(|quarter| midnight.checked_add_signed(TimeDelta::minutes(15 * quarter)))
        .find_map(|naive| tz.from_local_datetime(&naive).earliest())
        .map_or_else(|| midnight.and_utc().timestamp_millis(), |dt| dt.timestamp_millis())
}

/// Start of the current week: Monday 00:00 local time.
#[must_use]
pub fn start_of_week<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    let today = now.date_naive();
    let back = u64::from(today.weekday().num_days_from_monday());
    let monday = today.checked_sub_days(Days::new(back)).unwrap_or(today);
    local_midnight(monday, &now.timezone())
}

/// Totals for sessions that started on today's local calendar day.
#[must_use]
pub fn today_stats<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> DailyStats {
    let tz = now.timezone();
    let today = now.date_naive();

    let (total_duration, session_count) = sessions
        .iter()
        .filter(|s| day_key(s.start_time, &tz) == Some(today))
        .fold((0_i64, 0), |(total, count), s| {
            (total.saturating_add(s.duration), count + 1)
        });

    DailyStats {
        date: today,
        total_duration,
        session_count,
    }
}

/// Sum of durations of sessions started since Monday 00:00 local time.
#[must_use]
pub fn weekly_total<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> i64 {
    let week_start = start_of_week(now);
    sessions
        .iter()
        .filter(|s| s.start_time >= week_start)
        .map(|s| s.duration)
        .fold(0, i64::saturating_add)
}

/// Consecutive local days, ending today or yesterday, with a completed session.
///
/// If neither today nor yesterday has a session the streak is broken and
/// counts zero, even though today is not over yet.
#[must_use]
pub fn streak<Tz: TimeZone>(sessions: &[Session], now: &DateTime<Tz>) -> u32 {
    let tz = now.timezone();
    let days: BTreeSet<NaiveDate> = sessions
        .iter()
        .filter_map(|s| day_key(s.start_time, &tz))
        .collect();

    let mut descending = days.into_iter().rev();
    let Some(latest) = descending.next() else {
        return 0;
    };

    let today = now.date_naive();
    if latest != today && Some(latest) != today.pred_opt() {
        return 0;
    }

    let mut streak = 1;
    let mut previous = latest;
    for day in descending {
        if day.succ_opt() != Some(previous) {
            break;
        }
        streak += 1;
        previous = day;
    }
    streak
}
