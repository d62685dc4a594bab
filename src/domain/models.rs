use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Opaque skill label (`E`, `D-`, `D`, `D+`, `D++`, `C-`, `C`, `C+`).
///
/// The engine never ranks or validates it: whatever label the player wrote is
/// echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLevel(pub String);

impl SkillLevel {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One registered player
///
/// `display_name` is raw message text and may carry anchor markup; identity
/// comparisons go through `identity::normalize`, never through this field
/// directly. `joined_at` is only known for registrations made in-process:
/// the text protocol cannot recover it, so parsed entries carry `None` and
/// rely on list position for FIFO order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub display_name: String,
    pub skill_level: SkillLevel,
    pub joined_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn new(display_name: &str, skill_level: SkillLevel) -> Self {
        Self {
            display_name: display_name.to_string(),
            skill_level,
            joined_at: None,
        }
    }

    pub fn identity(&self) -> String {
        super::identity::normalize(&self.display_name)
    }
}

/// Venue of the game; `maps_url` is resolved from the club directory when the
/// message carries only a bare name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub name: String,
    pub maps_url: Option<String>,
}

/// Schedule labels exactly as they appear in the header line.
///
/// The date carries no year; derivation pins it to the year of `now` in the
/// deployment offset. Fine for a single-city group that never schedules more
/// than a few weeks out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub day_label: String,
    pub date_label: String,
    pub time_range: String,
}

impl Schedule {
    /// Derive concrete start/end instants from the labels.
    ///
    /// Labels are civil time in a fixed UTC offset (no DST). An end time at
    /// or before the start rolls over to the next day (late games).
    pub fn start_end(
        &self,
        now: DateTime<Utc>,
        utc_offset_hours: i32,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let offset = FixedOffset::east_opt(utc_offset_hours * 3600)?;
        let (day, month) = parse_date_label(&self.date_label)?;
        let (from, to) = parse_time_range(&self.time_range)?;

        let year = now.with_timezone(&offset).year();
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        let start = offset
            .from_local_datetime(&date.and_time(from))
            .single()?
            .with_timezone(&Utc);
        let mut end = offset
            .from_local_datetime(&date.and_time(to))
            .single()?
            .with_timezone(&Utc);
        if end <= start {
            end += Duration::days(1);
        }
        Some((start, end))
    }
}

fn parse_date_label(label: &str) -> Option<(u32, u32)> {
    let (day, month) = label.trim().split_once('.')?;
    Some((day.trim().parse().ok()?, month.trim().parse().ok()?))
}

fn parse_time_range(range: &str) -> Option<(NaiveTime, NaiveTime)> {
    let normalized = range.trim().replace('–', "-");
    let (from, to) = normalized.split_once('-')?;
    Some((parse_time(from)?, parse_time(to)?))
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    let (hours, minutes) = value.trim().split_once(':')?;
    NaiveTime::from_hms_opt(hours.trim().parse().ok()?, minutes.trim().parse().ok()?, 0)
}

/// Which dialect of the message grammar the parser recognized.
///
/// The public contract is a flat snapshot, but keeping the tag around lets
/// callers distinguish "no venue in a well-formed message" from "venue lost
/// to formatting damage".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dialect {
    Canonical,
    Legacy,
    Degraded,
}

/// Full game state decoded from one chat message.
///
/// Built fresh on every parse, mutated by exactly one action, serialized
/// back to text and discarded; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub title: String,
    pub schedule: Option<Schedule>,
    pub venue: Venue,
    pub price_label: String,
    pub courts: u32,
    pub max_players: usize,
    pub note: Option<String>,
    pub cancelled: bool,
    pub main_roster: Vec<Participant>,
    pub waitlist: Vec<Participant>,
    pub calendar_link: Option<String>,
    pub dialect: Dialect,
}

impl GameSnapshot {
    pub fn is_full(&self) -> bool {
        self.main_roster.len() >= self.max_players
    }

    /// Position of an identity in the main roster
    pub fn main_index_of(&self, identity: &str) -> Option<usize> {
        self.main_roster.iter().position(|p| p.identity() == identity)
    }

    /// Position of an identity in the waitlist
    pub fn waitlist_index_of(&self, identity: &str) -> Option<usize> {
        self.waitlist.iter().position(|p| p.identity() == identity)
    }
}

/// One participant action against a game message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Register(SkillLevel),
    NotComing,
}

impl Action {
    /// Interpret a free-text action label: the "not coming" sentinels cancel,
    /// anything else registers under that label.
    pub fn from_label(label: &str, not_coming_labels: &[&str]) -> Self {
        let trimmed = label.trim();
        let lowered = trimmed.to_lowercase();
        if not_coming_labels.iter().any(|sentinel| lowered == *sentinel) {
            Action::NotComing
        } else {
            Action::Register(SkillLevel(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_end_derivation() {
        let schedule = Schedule {
            day_label: "Сб".to_string(),
            date_label: "31.08".to_string(),
            time_range: "18:00-20:00".to_string(),
        };
        let now = Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap();
        let (start, end) = schedule.start_end(now, 4).unwrap();

        // 18:00 at UTC+4 is 14:00 UTC
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 8, 31, 14, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 8, 31, 16, 0, 0).unwrap());
    }

    #[test]
    fn test_overnight_range_rolls_to_next_day() {
        let schedule = Schedule {
            day_label: "Пт".to_string(),
            date_label: "05.06".to_string(),
            time_range: "23:00-01:00".to_string(),
        };
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        let (start, end) = schedule.start_end(now, 4).unwrap();
        assert!(end > start);
        assert_eq!(end - start, Duration::hours(2));
    }

    #[test]
    fn test_unparsable_labels_yield_none() {
        let schedule = Schedule {
            day_label: String::new(),
            date_label: "sometime".to_string(),
            time_range: "evening".to_string(),
        };
        assert!(schedule.start_end(Utc::now(), 4).is_none());
    }

    #[test]
    fn test_action_from_label() {
        let sentinels = ["не приду", "not coming"];
        assert_eq!(Action::from_label("Не приду", &sentinels), Action::NotComing);
        assert_eq!(
            Action::from_label("D+", &sentinels),
            Action::Register(SkillLevel("D+".to_string()))
        );
    }
}
