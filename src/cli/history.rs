//! `detox history` command implementation.

use crate::config::Config;
use crate::core::Session;
use crate::error::Result;
use crate::i18n::{Locale, Message, format_history_footer, format_timer, text};
use chrono::{DateTime, Local};

/// Default number of sessions to show.
const DEFAULT_LIMIT: usize = 20;

/// Run the history command.
///
/// Shows completed sessions, most recent first.
///
/// # Errors
///
/// Returns an error if the storage backend fails.
pub fn run(config: &Config, limit: Option<usize>) -> Result<()> {
    let locale = config.display.resolved_locale();
    let store = super::open_store(config)?;
    let limit = limit.unwrap_or(DEFAULT_LIMIT);

    let sessions = store.all_sessions()?;

    if sessions.is_empty() {
        println!("{}", text(Message::NoHistory, locale));
        println!(
            "\n{}: {}",
            text(Message::StoredIn, locale),
            config.storage.path.display()
        );
        return Ok(());
    }

    println!("{}", header(locale));
    println!("{}", "─".repeat(52));

    let shown = recent(&sessions, limit);
    for session in &shown {
        println!(
            "{:<20} {:<20} {:>10}",
            format_local_time(session.start_time),
            session.end_time.map(format_local_time).unwrap_or_default(),
            format_timer(session.duration)
        );
    }

    println!("{}", "─".repeat(52));
    println!("{}", format_history_footer(shown.len(), sessions.len(), locale));

    Ok(())
}

fn header(locale: Locale) -> String {
    format!(
        "{:<20} {:<20} {:>10}",
        text(Message::ColumnStarted, locale),
        text(Message::ColumnEnded, locale),
        text(Message::ColumnDuration, locale)
    )
}

/// The `limit` most recently completed sessions, newest first.
fn recent(sessions: &[Session], limit: usize) -> Vec<&Session> {
    sessions.iter().rev().take(limit).collect()
}

/// Format an epoch-ms timestamp as local time for display.
fn format_local_time(ms: i64) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(
        || "-".to_string(),
        |utc| {
            let local: DateTime<Local> = utc.into();
            local.format("%Y-%m-%d %H:%M").to_string()
        },
    )
}
