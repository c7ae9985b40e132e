//! `detox watch` command implementation.
//!
//! Keeps the controller running: the ticker refreshes the elapsed time,
//! resuming a suspended process (`fg` after Ctrl-Z) counts as coming back,
//! and single-letter commands on stdin drive start / continue / end.

use crate::config::Config;
use crate::core::{Clock, Controller, SessionState, SignalNotifier};
use crate::error::{Error, Result};
use crate::i18n::{Locale, Message, format_result_text, format_timer, text};
use crate::storage::KeyValueStore;
use std::io::{self, Write};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// A line of input from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Start,
    Continue,
    End,
    Quit,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "s" | "start" => Some(Self::Start),
            "c" | "continue" => Some(Self::Continue),
            "e" | "end" => Some(Self::End),
            "q" | "quit" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Run the watch command until `q` or end of input.
///
/// # Errors
///
/// Returns an error if storage or reading stdin fails.
pub async fn run(config: &Config) -> Result<()> {
    let locale = config.display.resolved_locale();
    let (mut controller, mut events) = super::open_controller(config, SignalNotifier)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = io::stdout();

    render_view(&mut out, controller.state(), controller.elapsed_ms(), locale)?;

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                let before = controller.state();
                controller.handle(event);
                if controller.state() == before {
                    render_elapsed(&mut out, controller.state(), controller.elapsed_ms())?;
                } else {
                    render_view(&mut out, controller.state(), controller.elapsed_ms(), locale)?;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match Command::parse(&line) {
                    Some(Command::Quit) => break,
                    Some(command) => apply(&mut controller, command, locale)?,
                    None => {}
                }
                render_view(&mut out, controller.state(), controller.elapsed_ms(), locale)?;
            }
        }
    }

    println!();
    Ok(())
}

/// Execute a command, reporting rejected starts instead of failing.
fn apply<K: KeyValueStore, C: Clock>(
    controller: &mut Controller<K, C>,
    command: Command,
    locale: Locale,
) -> Result<()> {
    match command {
        Command::Start => match controller.start() {
            Ok(_) | Err(Error::SessionAlreadyOpen(_)) => {}
            Err(e) => return Err(e),
        },
        Command::Continue => {
            controller.continue_session();
        }
        Command::End => {
            if let Some(session) = controller.end()? {
                println!("\n{}", format_result_text(session.duration, locale));
            }
        }
        Command::Quit => {}
    }
    Ok(())
}

/// Full view for the current state.
fn render_view(
    out: &mut impl Write,
    state: SessionState,
    elapsed_ms: i64,
    locale: Locale,
) -> io::Result<()> {
    let quit = text(Message::Quit, locale);
    writeln!(out)?;
    match state {
        SessionState::Idle => {
            writeln!(out, "{}", text(Message::Instruction, locale))?;
            writeln!(out, "[s] {}  [q] {quit}", text(Message::Start, locale))?;
        }
        SessionState::Active => {
            writeln!(out, "{}", text(Message::Active, locale))?;
            writeln!(out, "{}", text(Message::Hint, locale))?;
            writeln!(out, "[e] {}  [q] {quit}", text(Message::End, locale))?;
        }
        SessionState::Returning => {
            writeln!(out, "{}", text(Message::WelcomeBack, locale))?;
            writeln!(out, "{}", format_result_text(elapsed_ms, locale))?;
            writeln!(
                out,
                "[c] {}  [e] {}  [q] {quit}",
                text(Message::Continue, locale),
                text(Message::End, locale)
            )?;
        }
    }
    render_elapsed(out, state, elapsed_ms)
}

/// Redraw the running timer in place.
fn render_elapsed(out: &mut impl Write, state: SessionState, elapsed_ms: i64) -> io::Result<()> {
    if state == SessionState::Idle {
        return Ok(());
    }
    write!(out, "\r{}   ", format_timer(elapsed_ms))?;
    out.flush()
}
