//! Canonical renderer: snapshot in, decorated message text out.
//!
//! For any snapshot the parser can produce, parsing the formatted text gives
//! the same roster, waitlist, schedule, venue and cancellation state back.
//! Total over structurally valid snapshots, including a game nobody has
//! joined yet.

use crate::config::AppConfig;
use crate::domain::{GameSnapshot, Participant};

pub struct Formatter {
    config: AppConfig,
}

impl Formatter {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn format(&self, snapshot: &GameSnapshot) -> String {
        let mut out = Vec::new();

        self.push_header(&mut out, snapshot);
        self.push_details(&mut out, snapshot);
        self.push_calendar(&mut out, snapshot);
        self.push_roster(&mut out, snapshot);
        self.push_waitlist(&mut out, snapshot);

        out.join("\n")
    }

    fn push_header(&self, out: &mut Vec<String>, snapshot: &GameSnapshot) {
        if snapshot.title.is_empty() {
            return;
        }
        let text = &self.config.text;
        out.push(format!("{} <b>{}</b>", text.header_emoji, snapshot.title));
        out.push(String::new());
    }

    fn push_details(&self, out: &mut Vec<String>, snapshot: &GameSnapshot) {
        let text = &self.config.text;

        let venue = match &snapshot.venue.maps_url {
            Some(url) => format!("<a href=\"{}\">{}</a>", url, snapshot.venue.name),
            None => snapshot.venue.name.clone(),
        };
        out.push(format!(
            "{} <b>{}</b> {}",
            text.place_emoji, text.place_label, venue
        ));
        out.push(format!(
            "{} <b>{}</b> {}",
            text.price_emoji, text.price_label, snapshot.price_label
        ));
        out.push(format!(
            "{} <b>{}</b> {}",
            text.courts_emoji, text.courts_label, snapshot.courts
        ));

        if let Some(note) = &snapshot.note {
            out.push(note.clone());
        }
        if snapshot.cancelled {
            out.push(format!("❗️<b>{}</b>❗️", text.cancel_marker));
        }
    }

    fn push_calendar(&self, out: &mut Vec<String>, snapshot: &GameSnapshot) {
        let Some(link) = &snapshot.calendar_link else {
            return;
        };
        let text = &self.config.text;
        out.push(String::new());
        out.push(format!(
            "{} <a href=\"{}\">{}</a>",
            text.calendar_emoji, link, text.calendar_phrase
        ));
    }

    fn push_roster(&self, out: &mut Vec<String>, snapshot: &GameSnapshot) {
        let text = &self.config.text;
        out.push(String::new());
        out.push(if snapshot.cancelled {
            text.cancelled_roster_header.to_string()
        } else {
            text.roster_header.to_string()
        });

        // Always the full grid of slots; extra registrations beyond capacity
        // still render rather than disappear.
        let slots = snapshot.max_players.max(snapshot.main_roster.len());
        for index in 0..slots {
            match snapshot.main_roster.get(index) {
                Some(player) => out.push(format!("{}. {}", index + 1, entry(player))),
                None => out.push(format!("{}. {}", index + 1, text.empty_slot)),
            }
        }
    }

    fn push_waitlist(&self, out: &mut Vec<String>, snapshot: &GameSnapshot) {
        let text = &self.config.text;
        out.push(String::new());
        out.push(format!(
            "{} <b>{}</b>",
            text.waitlist_emoji, text.waitlist_label
        ));
        if snapshot.waitlist.is_empty() {
            out.push(text.empty_waitlist.to_string());
            return;
        }
        for (index, player) in snapshot.waitlist.iter().enumerate() {
            out.push(format!("{}. {}", index + 1, entry(player)));
        }
    }
}

fn entry(player: &Participant) -> String {
    format!("{} ({})", player.display_name, player.skill_level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Dialect, SkillLevel, Venue};
    use crate::parser::Parser;
    use chrono::{TimeZone, Utc};

    fn config() -> AppConfig {
        AppConfig::new()
    }

    fn empty_snapshot() -> GameSnapshot {
        GameSnapshot {
            title: "Сб, 31.08, 18:00-20:00".to_string(),
            schedule: None,
            venue: Venue {
                name: "SANDDUNE PADEL CLUB Al Qouz".to_string(),
                maps_url: Some("https://maps.app.goo.gl/Xv9pT4sNnDhW2a8C7".to_string()),
            },
            price_label: "80 AED".to_string(),
            courts: 1,
            max_players: 4,
            note: None,
            cancelled: false,
            main_roster: vec![],
            waitlist: vec![],
            calendar_link: Some("https://calendar.google.com/calendar/render?x=1".to_string()),
            dialect: Dialect::Canonical,
        }
    }

    #[test]
    fn test_format_empty_game() {
        let text = Formatter::new(&config()).format(&empty_snapshot());
        assert!(text.contains("🎾 <b>Сб, 31.08, 18:00-20:00</b>"));
        assert!(text.contains("1. -"));
        assert!(text.contains("4. -"));
        assert!(text.contains("---"));
        assert!(!text.contains("5."));
    }

    #[test]
    fn test_format_venue_without_link_is_plain() {
        let mut snapshot = empty_snapshot();
        snapshot.venue = Venue {
            name: "Чей-то задний двор".to_string(),
            maps_url: None,
        };
        let text = Formatter::new(&config()).format(&snapshot);
        assert!(text.contains("📍 <b>Место:</b> Чей-то задний двор"));
        assert!(!text.contains("<a href=\"\">"));
    }

    #[test]
    fn test_format_cancelled_banner_and_header() {
        let mut snapshot = empty_snapshot();
        snapshot.cancelled = true;
        let text = Formatter::new(&config()).format(&snapshot);
        assert!(text.contains("❗️<b>ОТМЕНА</b>❗️"));
        assert!(text.contains("Игра отменена. Waitlist:"));
        assert!(!text.contains("Записавшиеся игроки:"));
    }

    #[test]
    fn test_format_overflowing_roster_still_renders() {
        let mut snapshot = empty_snapshot();
        for index in 0..6 {
            snapshot
                .main_roster
                .push(Participant::new(&format!("@p{}", index), SkillLevel("D".to_string())));
        }
        let text = Formatter::new(&config()).format(&snapshot);
        assert!(text.contains("6. @p5 (D)"));
    }

    #[test]
    fn test_round_trip_preserves_state() {
        let parser = Parser::new(&config()).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap();

        let mut snapshot = empty_snapshot();
        snapshot.main_roster.push(Participant::new("@pavel", SkillLevel("D+".to_string())));
        snapshot.main_roster.push(Participant::new(
            "<a href=\"https://t.me/anna\">Anna</a>",
            SkillLevel("C-".to_string()),
        ));
        snapshot.waitlist.push(Participant::new("@dina", SkillLevel("E".to_string())));
        snapshot.note = Some("Берите воду".to_string());

        let text = Formatter::new(&config()).format(&snapshot);
        let reparsed = parser.parse_at(&text, now).unwrap();

        assert_eq!(reparsed.title, snapshot.title);
        assert_eq!(reparsed.venue, snapshot.venue);
        assert_eq!(reparsed.price_label, snapshot.price_label);
        assert_eq!(reparsed.courts, snapshot.courts);
        assert_eq!(reparsed.note, snapshot.note);
        assert_eq!(reparsed.cancelled, snapshot.cancelled);
        assert_eq!(reparsed.main_roster.len(), 2);
        assert_eq!(reparsed.main_roster[0].display_name, "@pavel");
        assert_eq!(reparsed.main_roster[1].skill_level.as_str(), "C-");
        assert_eq!(reparsed.waitlist.len(), 1);
        assert_eq!(reparsed.calendar_link, snapshot.calendar_link);
    }
}
