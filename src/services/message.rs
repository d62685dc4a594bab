//! One-request orchestration: restore → parse → evaluate → apply → format.
//!
//! The whole pipeline is a pure transform over the message string. There is
//! no version token in the text, so concurrent edits of the same message are
//! last-writer-wins; callers needing stronger guarantees must serialize
//! edits per message externally. Accepted limitation, not patched here.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::config::AppConfig;
use crate::domain::Action;
use crate::engine;
use crate::formatter::Formatter;
use crate::normalizer::Normalizer;
use crate::parser::Parser;
use crate::timing::{LateCheck, PenaltyEvaluator};

/// Result of applying one action to one message
pub struct EditOutcome {
    pub text: String,
    pub notification: Option<String>,
    pub late_warning: Option<LateCheck>,
}

pub struct MessageService {
    config: AppConfig,
    parser: Parser,
    formatter: Formatter,
    normalizer: Normalizer,
    evaluator: PenaltyEvaluator,
}

impl MessageService {
    pub fn new(config: AppConfig) -> Result<Self> {
        Ok(Self {
            parser: Parser::new(&config)?,
            formatter: Formatter::new(&config),
            normalizer: Normalizer::new(&config)?,
            evaluator: PenaltyEvaluator::new(&config)?,
            config,
        })
    }

    /// Apply one participant action to message text.
    ///
    /// Returns `None` when no game state is recoverable from the text; the
    /// caller must then leave the message unchanged.
    pub fn apply_action(&self, text: &str, display_name: &str, action_label: &str) -> Option<EditOutcome> {
        self.apply_action_at(text, display_name, action_label, Utc::now())
    }

    pub fn apply_action_at(
        &self,
        text: &str,
        display_name: &str,
        action_label: &str,
        now: DateTime<Utc>,
    ) -> Option<EditOutcome> {
        let restored = self.normalizer.restore_at(text, now);
        let snapshot = self.parser.parse_at(&restored, now)?;
        let action = Action::from_label(action_label, self.config.text.not_coming_labels);

        // Advisory check before the roster changes; the cancellation itself
        // always goes through.
        let late_warning = match action {
            Action::NotComing => {
                let check = self.evaluator.is_late_cancellation_at(&restored, now);
                check.is_late.then_some(check)
            }
            Action::Register(_) => None,
        };

        debug!(
            "applying {:?} for {} ({} main, {} waitlisted)",
            action,
            display_name,
            snapshot.main_roster.len(),
            snapshot.waitlist.len()
        );
        let outcome = engine::apply(snapshot, display_name, action, now);
        if let Some(notification) = &outcome.notification {
            info!("  → {}", notification);
        }

        Some(EditOutcome {
            text: self.formatter.format(&outcome.snapshot),
            notification: outcome.notification,
            late_warning,
        })
    }

    /// Repair pass only, no roster change
    pub fn restore(&self, text: &str) -> String {
        self.normalizer.restore(text)
    }

    pub fn parser(&self) -> &Parser {
        &self.parser
    }

    pub fn evaluator(&self) -> &PenaltyEvaluator {
        &self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> MessageService {
        MessageService::new(AppConfig::new()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap()
    }

    fn empty_game_text() -> String {
        [
            "🎾 <b>Сб, 31.08, 18:00-20:00</b>",
            "",
            "📍 <b>Место:</b> <a href=\"https://maps.app.goo.gl/Xv9pT4sNnDhW2a8C7\">SANDDUNE PADEL CLUB Al Qouz</a>",
            "💵 <b>Цена:</b> 80 AED",
            "🏟️ <b>Забронировано кортов:</b> 1",
            "",
            "📅 <a href=\"https://calendar.google.com/calendar/render?action=TEMPLATE\">Добавить в Google Calendar</a>",
            "",
            "Записавшиеся игроки:",
            "1. -",
            "2. -",
            "3. -",
            "4. -",
            "",
            "⏳ <b>Waitlist:</b>",
            "---",
        ]
        .join("\n")
    }

    #[test]
    fn test_register_then_fill_then_overflow() {
        let service = service();

        // First registration lands in slot 1, silently
        let first = service
            .apply_action_at(&empty_game_text(), "@p1", "D+", now())
            .unwrap();
        assert!(first.text.contains("1. @p1 (D+)"));
        assert!(first.text.contains("---"));
        assert!(first.notification.is_none());

        // Four distinct players fill the court
        let mut text = first.text;
        for name in ["@p2", "@p3", "@p4"] {
            let outcome = service.apply_action_at(&text, name, "D", now()).unwrap();
            assert!(outcome.notification.is_none());
            text = outcome.text;
        }
        assert!(text.contains("4. @p4 (D)"));

        // The fifth goes to the waitlist with a queued notification
        let fifth = service.apply_action_at(&text, "@p5", "C", now()).unwrap();
        assert!(fifth.text.contains("⏳ <b>Waitlist:</b>"));
        assert!(fifth.text.contains("1. @p5 (C)"));
        let note = fifth.notification.unwrap();
        assert!(note.contains("@p5"));
    }

    #[test]
    fn test_unrecoverable_text_leaves_message_unchanged() {
        assert!(service().apply_action_at("Invalid message", "@p1", "D", now()).is_none());
        assert!(service().apply_action_at("", "@p1", "D", now()).is_none());
    }

    #[test]
    fn test_legacy_text_comes_back_canonical() {
        let legacy = [
            "🎾 Сб, 31.08, 18:00-20:00",
            "Место: SANDDUNE PADEL CLUB Al Qouz",
            "Цена: 80 AED",
            "Забронировано кортов: 1",
            "Записавшиеся игроки:",
            "1. @pavel (D+)",
            "Waitlist:",
            "---",
        ]
        .join("\n");
        let outcome = service().apply_action_at(&legacy, "@anna", "C-", now()).unwrap();
        assert!(outcome.text.contains("🎾 <b>Сб, 31.08, 18:00-20:00</b>"));
        assert!(outcome.text.contains("maps.app.goo.gl"));
        assert!(outcome.text.contains("calendar.google.com"));
        assert!(outcome.text.contains("2. @anna (C-)"));
    }

    #[test]
    fn test_cancel_close_to_start_carries_warning() {
        let offset = chrono::FixedOffset::east_opt(4 * 3600).unwrap();
        let start = now() + chrono::Duration::hours(10);
        let local = start.with_timezone(&offset);
        let text = format!(
            "🎾 <b>Пн, {}, {}-{}</b>\n\nЗаписавшиеся игроки:\n1. @pavel (D+)\n2. -\n3. -\n4. -\n",
            local.format("%d.%m"),
            local.format("%H:%M"),
            (local + chrono::Duration::hours(2)).format("%H:%M"),
        );

        let outcome = service()
            .apply_action_at(&text, "@pavel", "Не приду", now())
            .unwrap();
        let warning = outcome.late_warning.unwrap();
        assert!(warning.is_late);
        assert!((warning.hours_remaining.unwrap() - 10.0).abs() < 0.01);
        // The cancellation itself still went through
        assert!(!outcome.text.contains("@pavel"));
    }
}
