//! `detox end` command implementation.

use crate::config::Config;
use crate::core::ManualNotifier;
use crate::error::Result;
use crate::i18n::{Message, format_result_text, format_timer, text};

/// Run the end command.
///
/// Ending with no open session is not an error.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn run(config: &Config) -> Result<()> {
    let locale = config.display.resolved_locale();
    let (mut controller, _events) = super::open_controller(config, ManualNotifier::new())?;

    match controller.end()? {
        Some(session) => {
            println!("{}", format_result_text(session.duration, locale));
            println!("{}", format_timer(session.duration));
        }
        None => println!("{}", text(Message::NoSession, locale)),
    }
    Ok(())
}
