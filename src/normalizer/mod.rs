//! Restoration pass for messages whose decoration was stripped.
//!
//! Chat clients and manual edits occasionally flatten the markup: bold tags
//! gone, venue anchor reduced to its text, calendar anchor dropped. This
//! pass puts the decoration back before any edit runs, and it is idempotent:
//! a span that already carries its tag is left alone, never nested.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;

use crate::config::AppConfig;
use crate::domain::Schedule;
use crate::domain::identity::strip_tags;
use crate::links;
use crate::parser::rules::LineRules;

pub struct Normalizer {
    config: AppConfig,
    rules: LineRules,
}

impl Normalizer {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            rules: LineRules::compile()?,
        })
    }

    pub fn restore(&self, text: &str) -> String {
        self.restore_at(text, Utc::now())
    }

    /// Deterministic variant for tests; `now` pins the year of a
    /// synthesized calendar link.
    pub fn restore_at(&self, text: &str, now: DateTime<Utc>) -> String {
        let venue_name = self.find_venue_name(text);
        let schedule = self.find_schedule(text);
        let mut header_seen = false;

        let lines: Vec<String> = text
            .lines()
            .map(|line| {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return line.to_string();
                }
                if !header_seen {
                    header_seen = true;
                    if let Some(restored) = self.restore_header(trimmed) {
                        return restored;
                    }
                }
                self.restore_line(line, trimmed, venue_name.as_deref(), schedule.as_ref(), now)
            })
            .collect();

        lines.join("\n")
    }

    fn restore_line(
        &self,
        line: &str,
        trimmed: &str,
        venue_name: Option<&str>,
        schedule: Option<&Schedule>,
        now: DateTime<Utc>,
    ) -> String {
        let text = &self.config.text;
        if trimmed.contains(text.place_label) {
            // A place line that kept its bold can still have lost its anchor,
            // so the anchor repair runs whether or not the label needed one.
            let restored = self
                .restore_label_line(trimmed, text.place_label, text.place_emoji)
                .unwrap_or_else(|| line.to_string());
            return self.restore_venue_anchor(restored);
        }
        if let Some(restored) = self.restore_label_line(trimmed, text.price_label, text.price_emoji)
        {
            return restored;
        }
        if let Some(restored) =
            self.restore_label_line(trimmed, text.courts_label, text.courts_emoji)
        {
            return restored;
        }
        if let Some(restored) = self.restore_waitlist_header(trimmed) {
            return restored;
        }
        if let Some(restored) = self.restore_cancel_banner(trimmed) {
            return restored;
        }
        if let Some(restored) = self.restore_calendar_anchor(trimmed, venue_name, schedule, now) {
            return restored;
        }
        line.to_string()
    }

    // --- Individual repairs, each a no-op on already-decorated input ---

    fn restore_header(&self, trimmed: &str) -> Option<String> {
        let text = &self.config.text;
        let rest = trimmed.strip_prefix(text.header_emoji)?.trim();
        if rest.is_empty() || rest.contains("<b>") {
            return None;
        }
        // Only a schedule header gets the bold wrap; an emoji waitlist entry
        // that happens to come first is not a header.
        self.rules.parse_header(rest)?;
        Some(format!("{} <b>{}</b>", text.header_emoji, rest))
    }

    fn restore_label_line(&self, trimmed: &str, label: &str, emoji: &str) -> Option<String> {
        if !trimmed.contains(label) || trimmed.contains("<b>") {
            return None;
        }
        let idx = trimmed.find(label)?;
        let value = trimmed[idx + label.len()..].trim();
        Some(
            format!("{} <b>{}</b> {}", emoji, label, value)
                .trim_end()
                .to_string(),
        )
    }

    fn restore_waitlist_header(&self, trimmed: &str) -> Option<String> {
        let text = &self.config.text;
        let plain = strip_tags(trimmed);
        let plain = plain.trim();
        let is_header = plain == text.waitlist_label
            || (plain.starts_with(text.waitlist_emoji) && plain.ends_with(text.waitlist_label));
        if !is_header || trimmed.contains("<b>") {
            return None;
        }
        Some(format!("{} <b>{}</b>", text.waitlist_emoji, text.waitlist_label))
    }

    fn restore_cancel_banner(&self, trimmed: &str) -> Option<String> {
        let text = &self.config.text;
        let plain: String = strip_tags(trimmed)
            .chars()
            .filter(|c| !matches!(c, '❗' | '️' | '!'))
            .collect();
        if plain.trim() != text.cancel_marker || trimmed.contains("<b>") {
            return None;
        }
        Some(format!("❗️<b>{}</b>❗️", text.cancel_marker))
    }

    fn restore_venue_anchor(&self, line: String) -> String {
        if line.contains("<a ") {
            return line;
        }
        let Some(idx) = line.find("</b>") else {
            return line;
        };
        let (head, value) = line.split_at(idx + "</b>".len());
        let name = value.trim();
        match self.config.clubs.maps_url_for(name) {
            Some(url) => {
                debug!("restoring venue anchor for {}", name);
                format!("{} <a href=\"{}\">{}</a>", head, url, name)
            }
            None => line,
        }
    }

    fn restore_calendar_anchor(
        &self,
        trimmed: &str,
        venue_name: Option<&str>,
        schedule: Option<&Schedule>,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let text = &self.config.text;
        if !trimmed.contains(text.calendar_phrase) || trimmed.contains("<a ") {
            return None;
        }
        let venue = venue_name.unwrap_or(self.config.engine.placeholder_venue);
        let links = links::build_links(schedule?, venue, now, &self.config.engine)?;
        Some(format!(
            "{} <a href=\"{}\">{}</a>",
            text.calendar_emoji, links.google, text.calendar_phrase
        ))
    }

    // --- Context scraped from the rest of the message ---

    fn find_venue_name(&self, text: &str) -> Option<String> {
        let label = self.config.text.place_label;
        let line = text
            .lines()
            .map(strip_tags)
            .find(|line| line.contains(label))?;
        let idx = line.find(label)?;
        let name = line[idx + label.len()..].trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    fn find_schedule(&self, text: &str) -> Option<Schedule> {
        let first = text.lines().map(|line| strip_tags(line)).find(|line| {
            !line.trim().is_empty()
        })?;
        let title = first
            .trim()
            .strip_prefix(self.config.text.header_emoji)
            .unwrap_or(first.trim())
            .trim()
            .to_string();
        self.rules.parse_header(&title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn normalizer() -> Normalizer {
        Normalizer::new(&AppConfig::new()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap()
    }

    fn stripped_text() -> String {
        [
            "🎾 Сб, 31.08, 18:00-20:00",
            "",
            "📍 Место: SANDDUNE PADEL CLUB Al Qouz",
            "💵 Цена: 80 AED",
            "🏟️ Забронировано кортов: 1",
            "ОТМЕНА",
            "",
            "📅 Добавить в Google Calendar",
            "",
            "Записавшиеся игроки:",
            "1. @pavel (D+)",
            "",
            "Waitlist:",
            "---",
        ]
        .join("\n")
    }

    #[test]
    fn test_restore_bolds_header_and_labels() {
        let restored = normalizer().restore_at(&stripped_text(), now());
        assert!(restored.contains("🎾 <b>Сб, 31.08, 18:00-20:00</b>"));
        assert!(restored.contains("📍 <b>Место:</b>"));
        assert!(restored.contains("💵 <b>Цена:</b> 80 AED"));
        assert!(restored.contains("🏟️ <b>Забронировано кортов:</b> 1"));
        assert!(restored.contains("⏳ <b>Waitlist:</b>"));
        assert!(restored.contains("❗️<b>ОТМЕНА</b>❗️"));
    }

    #[test]
    fn test_restore_anchors_known_venue() {
        let restored = normalizer().restore_at(&stripped_text(), now());
        assert!(restored.contains(
            "<a href=\"https://maps.app.goo.gl/Xv9pT4sNnDhW2a8C7\">SANDDUNE PADEL CLUB Al Qouz</a>"
        ));
    }

    #[test]
    fn test_restore_anchors_venue_on_already_bold_line() {
        let text = [
            "🎾 <b>Сб, 31.08, 18:00-20:00</b>",
            "📍 <b>Место:</b> SANDDUNE PADEL CLUB Al Qouz",
        ]
        .join("\n");
        let restored = normalizer().restore_at(&text, now());
        assert!(restored.contains(
            "📍 <b>Место:</b> <a href=\"https://maps.app.goo.gl/Xv9pT4sNnDhW2a8C7\">SANDDUNE PADEL CLUB Al Qouz</a>"
        ));
        // Still a single bold label, no second wrap
        assert_eq!(restored.matches("<b>Место:</b>").count(), 1);
    }

    #[test]
    fn test_restore_leaves_unknown_venue_plain() {
        let text = stripped_text().replace("SANDDUNE PADEL CLUB Al Qouz", "Чей-то задний двор");
        let restored = normalizer().restore_at(&text, now());
        assert!(restored.contains("📍 <b>Место:</b> Чей-то задний двор"));
        assert!(!restored.contains("Чей-то задний двор</a>"));
    }

    #[test]
    fn test_restore_synthesizes_calendar_anchor() {
        let restored = normalizer().restore_at(&stripped_text(), now());
        assert!(restored.contains("📅 <a href=\"https://calendar.google.com/"));
        assert!(restored.contains("20260831T140000Z"));
        assert!(restored.contains(">Добавить в Google Calendar</a>"));
    }

    #[test]
    fn test_restore_is_idempotent() {
        let n = normalizer();
        let once = n.restore_at(&stripped_text(), now());
        let twice = n.restore_at(&once, now());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_restore_never_nests_tags() {
        let n = normalizer();
        let twice = n.restore_at(&n.restore_at(&stripped_text(), now()), now());
        assert!(!twice.contains("<b><b>"));
        assert!(!twice.contains("<a href=\"<a"));
        assert!(!twice.contains("</b></b>"));
    }

    #[test]
    fn test_restore_passes_through_arbitrary_text() {
        let n = normalizer();
        assert_eq!(n.restore_at("", now()), "");
        assert_eq!(n.restore_at("Invalid message", now()), "Invalid message");
    }

    #[test]
    fn test_restore_keeps_decorated_text_unchanged() {
        let decorated = [
            "🎾 <b>Сб, 31.08, 18:00-20:00</b>",
            "📍 <b>Место:</b> <a href=\"https://maps.app.goo.gl/Xv9pT4sNnDhW2a8C7\">SANDDUNE PADEL CLUB Al Qouz</a>",
        ]
        .join("\n");
        assert_eq!(normalizer().restore_at(&decorated, now()), decorated);
    }
}
