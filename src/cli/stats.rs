//! `detox stats` command implementation.

use crate::config::Config;
use crate::core::StatsSummary;
use crate::error::Result;
use crate::i18n::{
    Locale, Message, format_session_count, format_stats_duration, format_streak_days, text,
};

/// Width of the separator rules.
const RULE_WIDTH: usize = 40;

/// Run the stats command.
///
/// # Errors
///
/// Returns an error if storage operations fail.
pub fn run(config: &Config) -> Result<()> {
    let locale = config.display.resolved_locale();
    let store = super::open_store(config)?;
    let summary = store.stats_summary()?;

    for line in render_stats(&summary, locale) {
        println!("{line}");
    }
    Ok(())
}

/// Lines of the stats view.
fn render_stats(summary: &StatsSummary, locale: Locale) -> Vec<String> {
    let rule = "─".repeat(RULE_WIDTH);
    let mut lines = vec![
        text(Message::StatsToday, locale).to_string(),
        format!(
            "  {}  ({})",
            format_stats_duration(summary.today.total_duration, locale),
            format_session_count(summary.today.session_count, locale)
        ),
        rule.clone(),
        text(Message::StatsWeekly, locale).to_string(),
        format!("  {}", format_stats_duration(summary.weekly_total_ms, locale)),
        rule,
        text(Message::StatsStreak, locale).to_string(),
        format!("  {}", format_streak_days(summary.streak_days, locale)),
    ];

    if summary.streak_days > 0 {
        lines.push(format!("  {}", text(Message::StatsKeepGoing, locale)));
    }
    lines
}
