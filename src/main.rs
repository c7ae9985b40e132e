//! detox CLI - digital detox session tracker.

use clap::{Parser, Subcommand};
use detox::cli;
use detox::config::load_config;
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Get the version string.
///
/// - Release builds (on a git tag): "0.1.0"
/// - Development builds: "0.1.0-dev (abc1234)"
/// - Dirty working directory: "0.1.0-dev (abc1234-dirty)"
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("DETOX_GIT_HASH");
    const IS_RELEASE: &str = env!("DETOX_IS_RELEASE");

    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" {
            VERSION.to_string()
        } else {
            format!("{VERSION}-dev ({GIT_HASH})")
        }
    })
}

#[derive(Parser)]
#[command(name = "detox")]
#[command(author, version = version(), about = "Track time away from your phone", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a detox session.
    Start,

    /// End the session in progress.
    End,

    /// Show the session in progress, if any.
    Status,

    /// Show today's total, this week's total and the day streak.
    Stats,

    /// List completed sessions.
    History {
        /// Maximum number of sessions to show. Defaults to 20.
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Live timer; resume with `fg` after Ctrl-Z to come back.
    Watch,
}

/// Log to stderr so command output stays clean.
fn init_logging() {
    let debug_enabled = env::var("DETOX_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let result = match load_config() {
        Ok(config) => match cli.command {
            Commands::Start => cli::start::run(&config),
            Commands::End => cli::end::run(&config),
            Commands::Status => cli::status::run(&config),
            Commands::Stats => cli::stats::run(&config),
            Commands::History { limit } => cli::history::run(&config, limit),
            Commands::Watch => cli::watch::run(&config).await,
        },
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("detox: error: {e}");
            ExitCode::FAILURE
        }
    }
}
