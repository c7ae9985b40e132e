//! Session model, statistics and lifecycle.

pub mod clock;
pub mod foreground;
pub mod lifecycle;
pub mod session;
pub mod stats;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use foreground::{ForegroundNotifier, ManualNotifier, SignalNotifier, Subscription};
pub use lifecycle::{Controller, Event, SessionState, Snapshot};
pub use session::{DailyStats, Session, StatsSummary, StoreData, elapsed_ms};
pub use store::{STORAGE_KEY, SessionStore};
