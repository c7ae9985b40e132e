//! `detox status` command implementation.

use crate::config::Config;
use crate::core::{ManualNotifier, SessionState};
use crate::error::Result;
use crate::i18n::{Message, format_result_text, format_timer, text};

/// Run the status command.
///
/// An open session is shown as the welcome-back view, since checking status
/// means the user is back at the device.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn run(config: &Config) -> Result<()> {
    let locale = config.display.resolved_locale();
    let (controller, _events) = super::open_controller(config, ManualNotifier::new())?;

    if controller.state() == SessionState::Idle {
        println!("{}", text(Message::NoSession, locale));
        println!("{}", text(Message::Instruction, locale));
        return Ok(());
    }

    let elapsed = controller.elapsed_ms();
    println!("{}", text(Message::WelcomeBack, locale));
    println!("{}", format_result_text(elapsed, locale));
    println!("{}", format_timer(elapsed));
    println!(
        "\n`detox end` - {}    `detox watch` - {}",
        text(Message::End, locale),
        text(Message::Continue, locale)
    );
    Ok(())
}
