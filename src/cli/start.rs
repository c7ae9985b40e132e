//! `detox start` command implementation.

use crate::config::Config;
use crate::core::ManualNotifier;
use crate::error::Result;
use crate::i18n::{Message, text};

/// Run the start command.
///
/// # Errors
///
/// Returns an error if a session is already open or storage fails.
pub fn run(config: &Config) -> Result<()> {
    let locale = config.display.resolved_locale();
    let (mut controller, _events) = super::open_controller(config, ManualNotifier::new())?;

    let session = controller.start()?;

    println!("{}", text(Message::Active, locale));
    println!("{}", text(Message::Hint, locale));
    println!("\nSession: {}", session.id);
    Ok(())
}
