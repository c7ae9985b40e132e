//! Session record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One detox interval, open while `end_time` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique identifier assigned at creation.
    pub id: String,

    /// When the session began (ms since epoch).
    pub start_time: i64,

    /// When the session ended (ms since epoch), `None` while in progress.
    pub end_time: Option<i64>,

    /// `end_time - start_time` once closed, zero while open.
    #[serde(default)]
    pub duration: i64,
}

impl Session {
    /// Open a new session starting at `start_time`.
    #[must_use]
    pub fn open(start_time: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            start_time,
            end_time: None,
            duration: 0,
        }
    }

    /// Close the session at `end_time`.
    #[must_use]
    pub fn close(self, end_time: i64) -> Self {
        Self {
            end_time: Some(end_time),
            duration: end_time.saturating_sub(self.start_time),
            ..self
        }
    }

    /// Whether the session is still in progress.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

/// Time elapsed since `session` started, as seen at `now_ms`.
///
/// Always derived from absolute timestamps so missed ticks self-correct.
/// A clock that moved backwards yields zero rather than a negative value.
#[must_use]
pub fn elapsed_ms(session: &Session, now_ms: i64) -> i64 {
    now_ms.saturating_sub(session.start_time).max(0)
}

/// The durable record: completed history plus the open session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreData {
    /// Completed sessions in completion order.
    #[serde(default)]
    pub sessions: Vec<Session>,

    /// The single open session, if any.
    #[serde(default)]
    pub current_session: Option<Session>,
}

/// Totals for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    /// Local calendar day.
    pub date: NaiveDate,

    /// Sum of durations of completed sessions started that day (ms).
    pub total_duration: i64,

    /// Number of completed sessions started that day.
    pub session_count: usize,
}

/// Everything the stats screen shows, computed from a single load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub today: DailyStats,
    pub weekly_total_ms: i64,
    pub streak_days: u32,
}
