//! CLI command implementations.

pub mod end;
pub mod history;
pub mod start;
pub mod stats;
pub mod status;
pub mod watch;

use crate::config::Config;
use crate::core::{Controller, Event, ForegroundNotifier, SessionStore, SystemClock};
use crate::error::Result;
use crate::storage::FileBackend;
use tokio::sync::mpsc::UnboundedReceiver;

/// Store backed by the configured storage directory.
fn open_store(config: &Config) -> Result<SessionStore<FileBackend>> {
    let backend = FileBackend::new(config.storage.path.clone())?;
    Ok(SessionStore::new(backend).with_policy(config.session.open_session))
}

/// Controller over the configured store, recovering any open session.
fn open_controller(
    config: &Config,
    notifier: impl ForegroundNotifier + 'static,
) -> Result<(
    Controller<FileBackend, SystemClock>,
    UnboundedReceiver<Event>,
)> {
    Controller::new(
        open_store(config)?,
        notifier,
        config.session.tick_interval(),
    )
}
