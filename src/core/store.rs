//! Persisted session history and the open-session slot.

use crate::config::OpenSessionPolicy;
use crate::core::clock::{Clock, SystemClock};
use crate::core::session::{DailyStats, Session, StatsSummary, StoreData};
use crate::core::stats;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use tracing::{debug, info, warn};

/// Key under which the whole record is stored.
pub const STORAGE_KEY: &str = "detox_timer_data";

/// Single source of truth for session history.
///
/// Every read loads the full record; every mutation rewrites it.
#[derive(Debug)]
pub struct SessionStore<K, C = SystemClock> {
    backend: K,
    clock: C,
    policy: OpenSessionPolicy,
}

impl<K: KeyValueStore> SessionStore<K> {
    /// Create a store on the system clock with the default policy.
    #[must_use]
    pub fn new(backend: K) -> Self {
        Self::with_clock(backend, SystemClock)
    }
}

impl<K: KeyValueStore, C: Clock> SessionStore<K, C> {
    /// Create a store driven by `clock`.
    #[must_use]
    pub fn with_clock(backend: K, clock: C) -> Self {
        Self {
            backend,
            clock,
            policy: OpenSessionPolicy::default(),
        }
    }

    /// Set what `start_session` does while a session is open.
    #[must_use]
    pub fn with_policy(mut self, policy: OpenSessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The clock this store timestamps sessions with.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Load the record.
    ///
    /// A missing or unparseable record reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend read fails.
    pub fn load(&self) -> Result<StoreData> {
        let Some(raw) = self.backend.get(STORAGE_KEY)? else {
            return Ok(StoreData::default());
        };

        match serde_json::from_slice(&raw) {
            Ok(data) => Ok(data),
            Err(e) => {
                warn!(error = %e, "Discarding malformed session record");
                Ok(StoreData::default())
            }
        }
    }

    /// Persist the whole record.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or the backend write fails.
    pub fn save(&self, data: &StoreData) -> Result<()> {
        let raw = serde_json::to_vec(data)?;
        self.backend.set(STORAGE_KEY, &raw)
    }

    /// Open a new session starting now.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionAlreadyOpen`] if a session is open and the
    /// policy is [`OpenSessionPolicy::Reject`], or a storage error.
    pub fn start_session(&self) -> Result<Session> {
        let mut data = self.load()?;

        if let Some(open) = &data.current_session {
            match self.policy {
                OpenSessionPolicy::Reject => {
                    return Err(Error::SessionAlreadyOpen(open.id.clone()));
                }
                OpenSessionPolicy::Replace => {
                    warn!(
                        session_id = %open.id,
                        start_time = open.start_time,
                        "Replacing open session without archiving it"
                    );
                }
            }
        }

        let session = Session::open(self.clock.now_ms());
        data.current_session = Some(session.clone());
        self.save(&data)?;

        info!(session_id = %session.id, "Session started");
        Ok(session)
    }

    /// Close the open session and append it to history.
    ///
    /// Returns `None` without touching storage when no session is open.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub fn end_session(&self) -> Result<Option<Session>> {
        let mut data = self.load()?;

        let Some(open) = data.current_session.take() else {
            debug!("No open session to end");
            return Ok(None);
        };

        let session = open.close(self.clock.now_ms());
        data.sessions.push(session.clone());
        self.save(&data)?;

        info!(
            session_id = %session.id,
            duration_ms = session.duration,
            "Session ended"
        );
        Ok(Some(session))
    }

    /// The open session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub fn current_session(&self) -> Result<Option<Session>> {
        Ok(self.load()?.current_session)
    }

    /// All completed sessions in completion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub fn all_sessions(&self) -> Result<Vec<Session>> {
        Ok(self.load()?.sessions)
    }

    /// Totals for today's local calendar day.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub fn today_stats(&self) -> Result<DailyStats> {
        Ok(stats::today_stats(&self.all_sessions()?, &self.clock.now()))
    }

    /// Total completed duration since Monday 00:00 local time, in ms.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub fn weekly_total(&self) -> Result<i64> {
        Ok(stats::weekly_total(&self.all_sessions()?, &self.clock.now()))
    }

    /// Consecutive days with a completed session, ending today or yesterday.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub fn streak(&self) -> Result<u32> {
        Ok(stats::streak(&self.all_sessions()?, &self.clock.now()))
    }

    /// Today, weekly and streak figures from one load.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    pub fn stats_summary(&self) -> Result<StatsSummary> {
        let sessions = self.all_sessions()?;
        let now = self.clock.now();
        Ok(StatsSummary {
            today: stats::today_stats(&sessions, &now),
            weekly_total_ms: stats::weekly_total(&sessions, &now),
            streak_days: stats::streak(&sessions, &now),
        })
    }
}
