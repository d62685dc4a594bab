/// Roster capacity and timing rules
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub slots_per_court: usize,
    pub default_courts: u32,
    pub late_window_hours: f64,
    pub utc_offset_hours: i32,
    pub skill_levels: &'static [&'static str],
    pub placeholder_venue: &'static str,
    pub placeholder_price: &'static str,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            slots_per_court: 4,
            default_courts: 1,
            late_window_hours: 24.0,
            utc_offset_hours: 4, // Gulf Standard Time, no DST
            skill_levels: &["E", "D-", "D", "D+", "D++", "C-", "C", "C+"],
            placeholder_venue: "Не указано",
            placeholder_price: "не указана",
        }
    }
}

/// Literal labels and markers of the message grammar.
///
/// Every string the formatter emits and the parser anchors on lives here so
/// tests can substitute the whole table without touching globals.
#[derive(Debug, Clone)]
pub struct TextTemplates {
    pub header_emoji: &'static str,
    pub place_emoji: &'static str,
    pub place_label: &'static str,
    pub price_emoji: &'static str,
    pub price_label: &'static str,
    pub courts_emoji: &'static str,
    pub courts_label: &'static str,
    pub calendar_emoji: &'static str,
    pub calendar_phrase: &'static str,
    pub roster_header: &'static str,
    pub cancelled_roster_header: &'static str,
    pub waitlist_emoji: &'static str,
    pub waitlist_label: &'static str,
    pub cancel_marker: &'static str,
    pub cancelled_phrase: &'static str,
    pub empty_slot: &'static str,
    pub empty_waitlist: &'static str,
    pub not_coming_labels: &'static [&'static str],
}

impl Default for TextTemplates {
    fn default() -> Self {
        Self {
            header_emoji: "🎾",
            place_emoji: "📍",
            place_label: "Место:",
            price_emoji: "💵",
            price_label: "Цена:",
            courts_emoji: "🏟️",
            courts_label: "Забронировано кортов:",
            calendar_emoji: "📅",
            calendar_phrase: "Добавить в Google Calendar",
            roster_header: "Записавшиеся игроки:",
            cancelled_roster_header: "Игра отменена. Waitlist:",
            waitlist_emoji: "⏳",
            waitlist_label: "Waitlist:",
            cancel_marker: "ОТМЕНА",
            cancelled_phrase: "Игра отменена",
            empty_slot: "-",
            empty_waitlist: "---",
            not_coming_labels: &["не приду", "not coming"],
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub engine: EngineSettings,
    pub text: TextTemplates,
    pub clubs: super::clubs::ClubDirectory,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            engine: EngineSettings::default(),
            text: TextTemplates::default(),
            clubs: super::clubs::ClubDirectory::default(),
        }
    }

    pub fn max_players(&self, courts: u32) -> usize {
        courts as usize * self.engine.slots_per_court
    }
}
