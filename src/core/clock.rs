//! Wall-clock time sources.

use chrono::{DateTime, Duration, FixedOffset, Local, TimeZone};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Source of "now" in a particular local time zone.
///
/// The time zone defines the calendar used for daily, weekly and streak
/// statistics.
pub trait Clock: Send + Sync {
    /// Time zone of the local calendar.
    type Tz: TimeZone;

    /// Current instant in local time.
    fn now(&self) -> DateTime<Self::Tz>;

    /// Current instant as milliseconds since the epoch.
    fn now_ms(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// The system clock in the machine's local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A settable clock at a fixed UTC offset.
///
/// Clones share the same instant, so a test can keep one handle and advance
/// time under a store or controller that owns the other.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Arc<AtomicI64>,
    offset: FixedOffset,
}

impl ManualClock {
    /// Create a clock frozen at `now`.
    #[must_use]
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now_ms: Arc::new(AtomicI64::new(now.timestamp_millis())),
            offset: *now.offset(),
        }
    }

    /// Move the clock to `now`; its offset is ignored.
    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now_ms.store(now.timestamp_millis(), Ordering::SeqCst);
    }

    /// Move the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        self.now_ms.fetch_add(by.num_milliseconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    type Tz = FixedOffset;

    fn now(&self) -> DateTime<FixedOffset> {
        let ms = self.now_ms.load(Ordering::SeqCst);
        DateTime::from_timestamp_millis(ms)
            .unwrap_or_default()
            .with_timezone(&self.offset)
    }

    fn now_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}
