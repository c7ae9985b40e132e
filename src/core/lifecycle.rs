//! Session lifecycle: idle → active → returning → idle.
//!
//! The controller is the only writer of the store's open-session slot. Timer
//! ticks and foreground notifications arrive as [`Event`]s on a channel whose
//! receiver is handed back by [`Controller::new`]; the owner feeds each one to
//! [`Controller::handle`], so transitions never interleave.

use crate::core::clock::Clock;
use crate::core::foreground::{ForegroundNotifier, Subscription};
use crate::core::session::{Session, elapsed_ms};
use crate::core::store::SessionStore;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use serde::Serialize;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

/// Where the user is in a detox session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionState {
    /// No session open.
    #[default]
    Idle,
    /// Session open, user away.
    Active,
    /// Session open, user just came back and has not decided yet.
    Returning,
}

/// Asynchronous input to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Periodic elapsed-time refresh.
    Tick,
    /// The app became active again. Carries the generation of the
    /// subscription that saw it; events from an earlier session are ignored.
    Foreground(u64),
}

/// What observers see after every change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: SessionState,
    pub session: Option<Session>,
    pub elapsed_ms: i64,
}

/// Recurring tick task; aborted when dropped.
#[derive(Debug)]
struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    fn spawn(runtime: &Handle, period: Duration, events: mpsc::UnboundedSender<Event>) -> Self {
        let handle = runtime.spawn(async move {
            let mut interval = time::interval(period);
            // Ticks missed while suspended are dropped, not replayed.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if events.send(Event::Tick).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Owns the state machine, the tick timer and the foreground subscription.
pub struct Controller<K, C> {
    store: SessionStore<K, C>,
    notifier: Box<dyn ForegroundNotifier>,
    tick_interval: Duration,
    events: mpsc::UnboundedSender<Event>,
    snapshot: watch::Sender<Snapshot>,
    state: SessionState,
    session: Option<Session>,
    elapsed_ms: i64,
    ticker: Option<Ticker>,
    foreground: Option<Subscription>,
    generation: u64,
}

impl<K: KeyValueStore, C: Clock> Controller<K, C> {
    /// Create a controller, recovering any session left open by a previous run.
    ///
    /// A recovered session starts in [`SessionState::Returning`]. Returns the
    /// receiver on which ticks and foreground events arrive.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the store fails.
    pub fn new(
        store: SessionStore<K, C>,
        notifier: impl ForegroundNotifier + 'static,
        tick_interval: Duration,
    ) -> Result<(Self, mpsc::UnboundedReceiver<Event>)> {
        let (events, receiver) = mpsc::unbounded_channel();
        let (snapshot, _) = watch::channel(Snapshot::default());

        let mut controller = Self {
            store,
            notifier: Box::new(notifier),
            tick_interval,
            events,
            snapshot,
            state: SessionState::Idle,
            session: None,
            elapsed_ms: 0,
            ticker: None,
            foreground: None,
            generation: 0,
        };

        if let Some(session) = controller.store.current_session()? {
            controller.elapsed_ms = elapsed_ms(&session, controller.store.clock().now_ms());
            info!(
                session_id = %session.id,
                elapsed_ms = controller.elapsed_ms,
                "Recovered open session"
            );
            controller.session = Some(session);
            controller.enter(SessionState::Returning);
        }

        Ok((controller, receiver))
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Milliseconds since the open session started, as of the last refresh.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }

    #[must_use]
    pub fn current_session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether the tick timer is armed.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_some()
    }

    /// Whether the foreground subscription is held.
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.foreground.is_some()
    }

    /// The store, for reading history and statistics.
    pub fn store(&self) -> &SessionStore<K, C> {
        &self.store
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    /// Receive a [`Snapshot`] after every state or elapsed-time change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    /// Begin a session: idle → active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionAlreadyOpen`] unless idle, or the store's
    /// error. On error nothing changes.
    pub fn start(&mut self) -> Result<Session> {
        if let Some(open) = &self.session {
            return Err(Error::SessionAlreadyOpen(open.id.clone()));
        }

        let session = self.store.start_session()?;
        self.session = Some(session.clone());
        self.elapsed_ms = 0;
        self.enter(SessionState::Active);
        Ok(session)
    }

    /// End the session: active/returning → idle.
    ///
    /// Returns the closed session, or `None` if none was open.
    ///
    /// # Errors
    ///
    /// Returns the store's error; on error nothing changes.
    pub fn end(&mut self) -> Result<Option<Session>> {
        let closed = self.store.end_session()?;
        self.session = None;
        self.elapsed_ms = 0;
        self.enter(SessionState::Idle);
        Ok(closed)
    }

    /// Keep the session going: returning → active.
    ///
    /// Does nothing and returns `false` from any other state.
    pub fn continue_session(&mut self) -> bool {
        if self.state != SessionState::Returning {
            return false;
        }
        self.enter(SessionState::Active);
        true
    }

    /// Apply one event from the channel.
    pub fn handle(&mut self, event: Event) {
        match event {
            Event::Tick => self.refresh(),
            Event::Foreground(generation) => {
                if generation != self.generation {
                    debug!(generation, current = self.generation, "Stale foreground event");
                    return;
                }
                if self.state == SessionState::Active && self.session.is_some() {
                    self.elapsed_ms = self.elapsed_now();
                    self.enter(SessionState::Returning);
                }
            }
        }
    }

    fn elapsed_now(&self) -> i64 {
        self.session
            .as_ref()
            .map_or(0, |session| elapsed_ms(session, self.store.clock().now_ms()))
    }

    fn refresh(&mut self) {
        if self.state == SessionState::Idle {
            return;
        }
        self.elapsed_ms = self.elapsed_now();
        self.publish();
    }

    fn enter(&mut self, state: SessionState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "Session state change");
        }
        self.state = state;

        if state == SessionState::Idle {
            self.ticker = None;
            self.foreground = None;
        } else {
            self.arm();
        }
        self.publish();
    }

    fn arm(&mut self) {
        if self.ticker.is_none() {
            match Handle::try_current() {
                Ok(runtime) => {
                    self.ticker = Some(Ticker::spawn(
                        &runtime,
                        self.tick_interval,
                        self.events.clone(),
                    ));
                }
                Err(_) => debug!("No async runtime; elapsed time refreshes on demand only"),
            }
        }

        if self.foreground.is_none() {
            self.generation += 1;
            let generation = self.generation;
            let events = self.events.clone();
            self.foreground = Some(self.notifier.subscribe(Box::new(move || {
                let _ = events.send(Event::Foreground(generation));
            })));
        }
    }

    fn publish(&self) {
        self.snapshot.send_replace(Snapshot {
            state: self.state,
            session: self.session.clone(),
            elapsed_ms: self.elapsed_ms,
        });
    }
}
