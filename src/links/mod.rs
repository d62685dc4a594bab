//! Deep-link builders for a scheduled game.
//!
//! Pure functions over the schedule and venue name. The calendar link treats
//! the header times as civil time in the fixed deployment offset and renders
//! UTC instants; with no DST in the target city the conversion is a plain
//! subtraction.

use chrono::{DateTime, Utc};

use crate::config::settings::EngineSettings;
use crate::domain::Schedule;

const CALENDAR_BASE_URL: &str = "https://calendar.google.com/calendar/render";

pub struct GameLinks {
    pub google: String,
}

/// Build deep links for a game, or `None` when the schedule labels cannot be
/// turned into concrete instants.
pub fn build_links(
    schedule: &Schedule,
    venue_name: &str,
    now: DateTime<Utc>,
    settings: &EngineSettings,
) -> Option<GameLinks> {
    let (start, end) = schedule.start_end(now, settings.utc_offset_hours)?;
    Some(GameLinks {
        google: google_calendar_url(venue_name, start, end),
    })
}

/// Google Calendar event-template URL; the title is always `Padel - {venue}`.
pub fn google_calendar_url(venue_name: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let title = format!("Padel - {}", venue_name);
    format!(
        "{}?action=TEMPLATE&text={}&dates={}/{}&location={}",
        CALENDAR_BASE_URL,
        urlencoding::encode(&title),
        format_calendar_instant(start),
        format_calendar_instant(end),
        urlencoding::encode(venue_name),
    )
}

fn format_calendar_instant(instant: DateTime<Utc>) -> String {
    instant.format("%Y%m%dT%H%M%SZ").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn schedule() -> Schedule {
        Schedule {
            day_label: "Сб".to_string(),
            date_label: "31.08".to_string(),
            time_range: "18:00-20:00".to_string(),
        }
    }

    #[test]
    fn test_calendar_url_shifts_to_utc() {
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap();
        let links = build_links(&schedule(), "Just Padel Business Bay", now,
            &EngineSettings::default())
        .unwrap();

        // 18:00-20:00 at UTC+4 is 14:00-16:00 UTC
        assert!(links.google.contains("dates=20260831T140000Z/20260831T160000Z"));
    }

    #[test]
    fn test_calendar_url_encodes_title_and_location() {
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap();
        let links = build_links(&schedule(), "SANDDUNE PADEL CLUB Al Qouz", now,
            &EngineSettings::default())
        .unwrap();

        assert!(links.google.contains("text=Padel%20-%20SANDDUNE%20PADEL%20CLUB%20Al%20Qouz"));
        assert!(links.google.contains("location=SANDDUNE%20PADEL%20CLUB%20Al%20Qouz"));
    }

    #[test]
    fn test_unparsable_schedule_yields_none() {
        let schedule = Schedule {
            day_label: String::new(),
            date_label: "??".to_string(),
            time_range: "??".to_string(),
        };
        let links = build_links(&schedule, "X", Utc::now(), &EngineSettings::default());
        assert!(links.is_none());
    }
}
