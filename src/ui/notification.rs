use std::time::{Duration, Instant};

use ratatui::style::Color;
use typemaster::report::Report;

/// How long a toast stays on screen
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn color(self) -> Color {
        match self {
            NotificationKind::Success => Color::Green,
            NotificationKind::Info => Color::Blue,
            NotificationKind::Warning => Color::Yellow,
            NotificationKind::Error => Color::Red,
        }
    }
}

/// A transient message. Only one is shown at a time; a newer one replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub shown_at: Instant,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= NOTIFICATION_TTL
    }

    pub fn started() -> Self {
        Self::new("Test started! Good luck!", NotificationKind::Success)
    }

    /// Closing message, tiered on the final speed
    pub fn for_report(report: &Report) -> Self {
        match report.wpm() {
            wpm if wpm > 60 => Self::new("Excellent typing speed!", NotificationKind::Success),
            wpm if wpm > 40 => Self::new("Good job! Keep practicing!", NotificationKind::Success),
            _ => Self::new(
                "Test completed! Practice makes perfect!",
                NotificationKind::Info,
            ),
        }
    }

    pub fn paste_refused() -> Self {
        Self::new("Pasting is disabled during the test!", NotificationKind::Warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typemaster::report::{EndReason, Snapshot};
    use typemaster::scoring::{Metrics, Score};

    fn report_with_wpm(wpm: u32) -> Report {
        Report {
            snapshot: Snapshot {
                score: Score::default(),
                metrics: Metrics {
                    wpm,
                    cpm: wpm * 5,
                    accuracy: 100,
                },
                time_remaining: 0,
                progress_percent: 100.0,
            },
            elapsed: Duration::from_secs(60),
            reason: EndReason::TimeUp,
        }
    }

    #[test]
    fn report_message_tiers() {
        assert_eq!(
            Notification::for_report(&report_with_wpm(61)).message,
            "Excellent typing speed!"
        );
        assert_eq!(
            Notification::for_report(&report_with_wpm(60)).message,
            "Good job! Keep practicing!"
        );
        assert_eq!(
            Notification::for_report(&report_with_wpm(41)).kind,
            NotificationKind::Success
        );
        let slow = Notification::for_report(&report_with_wpm(40));
        assert_eq!(slow.message, "Test completed! Practice makes perfect!");
        assert_eq!(slow.kind, NotificationKind::Info);
    }

    #[test]
    fn expires_after_ttl() {
        let n = Notification::started();
        assert!(!n.is_expired(n.shown_at));
        assert!(!n.is_expired(n.shown_at + Duration::from_millis(2999)));
        assert!(n.is_expired(n.shown_at + NOTIFICATION_TTL));
    }

    #[test]
    fn kind_colors_are_distinct() {
        let colors = [
            NotificationKind::Success.color(),
            NotificationKind::Info.color(),
            NotificationKind::Warning.color(),
            NotificationKind::Error.color(),
        ];
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
