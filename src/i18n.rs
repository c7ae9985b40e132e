//! User-facing text in English and Japanese.

use serde::Deserialize;
use std::env;

/// Output language.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ja,
}

impl Locale {
    /// Resolve a language tag such as `ja_JP.UTF-8` or `en-US`.
    ///
    /// Anything that is not Japanese falls back to English.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().to_lowercase().starts_with("ja") {
            Self::Ja
        } else {
            Self::En
        }
    }

    /// Locale requested by `LC_ALL`, then `LANG`.
    #[must_use]
    pub fn from_env() -> Self {
        ["LC_ALL", "LANG"]
            .iter()
            .filter_map(|var| env::var(var).ok())
            .find(|tag| !tag.is_empty())
            .map_or(Self::En, |tag| Self::from_tag(&tag))
    }
}

/// Fixed messages shown by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Instruction,
    Start,
    Active,
    Hint,
    WelcomeBack,
    Continue,
    End,
    StatsToday,
    StatsWeekly,
    StatsStreak,
    StatsKeepGoing,
    NoSession,
    Quit,
    NoHistory,
    StoredIn,
    ColumnStarted,
    ColumnEnded,
    ColumnDuration,
}

/// Translate `message` into `locale`.
#[must_use]
pub fn text(message: Message, locale: Locale) -> &'static str {
    match (locale, message) {
        (Locale::En, Message::Instruction) => "Put your phone down and start your detox session",
        (Locale::En, Message::Start) => "Start",
        (Locale::En, Message::Active) => "Detox in progress...",
        (Locale::En, Message::Hint) => "Lock your screen and leave your phone",
        (Locale::En, Message::WelcomeBack) => "Welcome back!",
        (Locale::En, Message::Continue) => "Keep going",
        (Locale::En, Message::End) => "End session",
        (Locale::En, Message::StatsToday) => "Today's Detox",
        (Locale::En, Message::StatsWeekly) => "Weekly Total",
        (Locale::En, Message::StatsStreak) => "Current Streak",
        (Locale::En, Message::StatsKeepGoing) => "Keep it up!",
        (Locale::En, Message::NoSession) => "No session in progress",
        (Locale::En, Message::Quit) => "quit",
        (Locale::En, Message::NoHistory) => "No sessions found.",
        (Locale::En, Message::StoredIn) => "Sessions are stored in",
        (Locale::En, Message::ColumnStarted) => "Started",
        (Locale::En, Message::ColumnEnded) => "Ended",
        (Locale::En, Message::ColumnDuration) => "Duration",
        (Locale::Ja, Message::Instruction) => "スマホを置いてデトックスを始めましょう",
        (Locale::Ja, Message::Start) => "開始",
        (Locale::Ja, Message::Active) => "デトックス中...",
        (Locale::Ja, Message::Hint) => "画面をロックしてスマホを置いてください",
        (Locale::Ja, Message::WelcomeBack) => "おかえりなさい!",
        (Locale::Ja, Message::Continue) => "もう少し続ける",
        (Locale::Ja, Message::End) => "終了する",
        (Locale::Ja, Message::StatsToday) => "今日のデトックス",
        (Locale::Ja, Message::StatsWeekly) => "今週の累計",
        (Locale::Ja, Message::StatsStreak) => "連続達成日数",
        (Locale::Ja, Message::StatsKeepGoing) => "この調子で続けましょう!",
        (Locale::Ja, Message::NoSession) => "進行中のセッションはありません",
        (Locale::Ja, Message::Quit) => "終了",
        (Locale::Ja, Message::NoHistory) => "セッションの記録はありません。",
        (Locale::Ja, Message::StoredIn) => "セッションの保存先",
        (Locale::Ja, Message::ColumnStarted) => "開始",
        (Locale::Ja, Message::ColumnEnded) => "終了",
        (Locale::Ja, Message::ColumnDuration) => "時間",
    }
}

/// Running timer display: `m:ss`, or `h:mm:ss` past the hour.
#[must_use]
pub fn format_timer(ms: i64) -> String {
    let total_seconds = ms.max(0) / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Length of a single session, in seconds below a minute.
#[must_use]
pub fn format_session_length(ms: i64, locale: Locale) -> String {
    let minutes = ms.max(0) / 60_000;
    if minutes < 1 {
        let seconds = ms.max(0) / 1000;
        return match locale {
            Locale::En => format!("{seconds} sec"),
            Locale::Ja => format!("{seconds}秒間"),
        };
    }
    match locale {
        Locale::En => format!("{minutes} min"),
        Locale::Ja => format!("{minutes}分間"),
    }
}

/// Aggregate duration for the stats view, at minute resolution.
#[must_use]
pub fn format_stats_duration(ms: i64, locale: Locale) -> String {
    let total_minutes = ms.max(0) / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    match locale {
        Locale::Ja if hours > 0 => format!("{hours}時間{minutes}分"),
        Locale::Ja => format!("{minutes}分"),
        Locale::En if hours > 0 && minutes > 0 => format!("{hours}h {minutes}m"),
        Locale::En if hours > 0 => format!("{hours}h"),
        Locale::En => format!("{minutes}m"),
    }
}

#[must_use]
pub fn format_session_count(count: usize, locale: Locale) -> String {
    match locale {
        Locale::Ja => format!("{count}回のセッション"),
        Locale::En if count == 1 => "1 session".to_string(),
        Locale::En => format!("{count} sessions"),
    }
}

#[must_use]
pub fn format_streak_days(days: u32, locale: Locale) -> String {
    match locale {
        Locale::Ja => format!("{days}日"),
        Locale::En if days == 1 => "1 day".to_string(),
        Locale::En => format!("{days} days"),
    }
}

/// Footer under the history table.
#[must_use]
pub fn format_history_footer(shown: usize, total: usize, locale: Locale) -> String {
    match locale {
        Locale::Ja => format!("{total}件中{shown}件を表示"),
        Locale::En if total == 1 => format!("Showing {shown} of 1 session"),
        Locale::En => format!("Showing {shown} of {total} sessions"),
    }
}

/// Summary line shown when the user comes back.
#[must_use]
pub fn format_result_text(ms: i64, locale: Locale) -> String {
    let length = format_session_length(ms, locale);
    match locale {
        Locale::En => format!("Detoxed for {length}"),
        Locale::Ja => format!("{length}デトックスしました"),
    }
}
