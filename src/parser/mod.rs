//! Game-state parser: message text in, snapshot out.
//!
//! Three dialects come through the door. Canonical text is whatever the
//! formatter last wrote. Legacy text predates the decorated format:
//! undecorated labels, bare venue names, emoji waitlist entries, no calendar
//! section. Degraded text has lost its section headers entirely but still
//! carries roster lines, and those must survive a parse no matter what
//! happened to the rest of the message.

pub mod rules;

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::debug;

use crate::config::AppConfig;
use crate::domain::identity::strip_tags;
use crate::domain::{Dialect, GameSnapshot, Participant, Schedule, Venue};
use crate::links;

use rules::{LineRules, RosterLine};

pub struct Parser {
    config: AppConfig,
    rules: LineRules,
}

impl Parser {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            rules: LineRules::compile()?,
        })
    }

    /// Parse message text into a snapshot.
    ///
    /// Returns `None` only when no roster or waitlist content is recoverable
    /// at all; callers must then leave the message text unchanged.
    pub fn parse(&self, text: &str) -> Option<GameSnapshot> {
        self.parse_at(text, Utc::now())
    }

    /// Deterministic variant: `now` pins the derived year and any
    /// regenerated calendar link.
    pub fn parse_at(&self, text: &str, now: DateTime<Utc>) -> Option<GameSnapshot> {
        let lines: Vec<&str> = text.lines().collect();
        let stripped: Vec<String> = lines
            .iter()
            .map(|line| strip_tags(line).trim().to_string())
            .collect();

        let anchor_idx = self.find_roster_anchor(&stripped);
        let waitlist_idx = self.find_waitlist_header(&stripped);

        let (main_roster, waitlist) = match anchor_idx {
            Some(anchor) => self.collect_sections(&lines, anchor, waitlist_idx),
            None => {
                debug!("no roster anchor found, falling back to degraded scan");
                let (main, wait) = self.collect_degraded(&lines, &stripped, waitlist_idx);
                if main.is_empty() && wait.is_empty() {
                    return None;
                }
                (main, wait)
            }
        };

        let title = self.extract_title(&stripped);
        let schedule = self.rules.parse_header(&title);
        let venue = self.extract_venue(&lines, &stripped);
        let price_label = self.extract_price(&stripped);
        let (courts, courts_idx) = self.extract_courts(&stripped);
        let cancelled = self.detect_cancelled(&stripped);
        let calendar_link = self
            .extract_calendar_link(&lines, &stripped)
            .or_else(|| self.regenerate_calendar_link(schedule.as_ref(), &venue.name, now));
        let note = self.extract_note(&stripped, courts_idx, anchor_idx);

        let dialect = match anchor_idx {
            None => Dialect::Degraded,
            Some(_) if text.contains("<b>") => Dialect::Canonical,
            Some(_) => Dialect::Legacy,
        };

        Some(GameSnapshot {
            title,
            schedule,
            venue,
            price_label,
            max_players: self.config.max_players(courts),
            courts,
            note,
            cancelled,
            main_roster,
            waitlist,
            calendar_link,
            dialect,
        })
    }

    // --- Section anchors ---

    fn find_roster_anchor(&self, stripped: &[String]) -> Option<usize> {
        let text = &self.config.text;
        stripped.iter().position(|line| {
            line.as_str() == text.roster_header || line.as_str() == text.cancelled_roster_header
        })
    }

    fn find_waitlist_header(&self, stripped: &[String]) -> Option<usize> {
        let text = &self.config.text;
        stripped.iter().position(|line| {
            line.as_str() == text.waitlist_label
                || (line.starts_with(text.waitlist_emoji) && line.ends_with(text.waitlist_label))
        })
    }

    // --- Roster collection ---

    fn collect_sections(
        &self,
        lines: &[&str],
        anchor: usize,
        waitlist_idx: Option<usize>,
    ) -> (Vec<Participant>, Vec<Participant>) {
        let text = &self.config.text;
        let roster_end = waitlist_idx.unwrap_or(lines.len());

        let mut main = Vec::new();
        let mut wait = Vec::new();

        for line in lines.iter().take(roster_end).skip(anchor + 1) {
            match self.rules.parse_roster_line(line, text.empty_slot) {
                Some(RosterLine::Player(p)) => main.push(p),
                Some(RosterLine::Empty) => {}
                None => {
                    // Legacy messages park emoji entries right under the
                    // roster without a waitlist header.
                    if let Some(p) =
                        self.rules
                            .parse_waitlist_line(line, text.header_emoji, text.empty_slot)
                    {
                        wait.push(p);
                    }
                }
            }
        }

        if let Some(start) = waitlist_idx {
            for line in lines.iter().skip(start + 1) {
                if let Some(p) =
                    self.rules
                        .parse_waitlist_line(line, text.header_emoji, text.empty_slot)
                {
                    wait.push(p);
                }
            }
        }

        (main, wait)
    }

    fn collect_degraded(
        &self,
        lines: &[&str],
        stripped: &[String],
        waitlist_idx: Option<usize>,
    ) -> (Vec<Participant>, Vec<Participant>) {
        let text = &self.config.text;
        let split = waitlist_idx.unwrap_or_else(|| {
            stripped
                .iter()
                .position(|line| line.to_lowercase().contains("waitlist"))
                .unwrap_or(lines.len())
        });

        let mut main = Vec::new();
        let mut wait = Vec::new();
        for (idx, line) in lines.iter().enumerate() {
            match self.rules.parse_roster_line(line, text.empty_slot) {
                Some(RosterLine::Player(p)) if idx < split => main.push(p),
                Some(RosterLine::Player(p)) => wait.push(p),
                Some(RosterLine::Empty) => {}
                None => {
                    if let Some(p) =
                        self.rules
                            .parse_waitlist_line(line, text.header_emoji, text.empty_slot)
                    {
                        wait.push(p);
                    }
                }
            }
        }
        (main, wait)
    }

    // --- Header and meta lines ---

    fn extract_title(&self, stripped: &[String]) -> String {
        let text = &self.config.text;
        let Some(first) = stripped.iter().find(|line| !line.is_empty()) else {
            return String::new();
        };
        if self.is_meta_line(first) {
            return String::new();
        }
        first
            .strip_prefix(text.header_emoji)
            .unwrap_or(first.as_str())
            .trim()
            .to_string()
    }

    fn is_meta_line(&self, stripped_line: &str) -> bool {
        let text = &self.config.text;
        stripped_line.contains(text.place_label)
            || stripped_line.contains(text.price_label)
            || stripped_line.contains(text.courts_label)
            || stripped_line.contains(text.calendar_phrase)
            || stripped_line.contains(text.cancel_marker)
            || stripped_line == text.roster_header
            || stripped_line == text.cancelled_roster_header
            || self
                .rules
                .parse_roster_line(stripped_line, text.empty_slot)
                .is_some()
    }

    fn extract_venue(&self, lines: &[&str], stripped: &[String]) -> Venue {
        let text = &self.config.text;
        let Some(idx) = stripped
            .iter()
            .position(|line| line.contains(text.place_label))
        else {
            return Venue {
                name: self.config.engine.placeholder_venue.to_string(),
                maps_url: None,
            };
        };

        // An embedded maps link wins over the directory.
        if let Some((href, name)) = self.rules.anchor_in(lines[idx]) {
            return Venue {
                name: name.trim().to_string(),
                maps_url: Some(href.to_string()),
            };
        }

        let name = label_value(&stripped[idx], text.place_label);
        if name.is_empty() {
            return Venue {
                name: self.config.engine.placeholder_venue.to_string(),
                maps_url: None,
            };
        }
        let maps_url = self.config.clubs.maps_url_for(&name).map(str::to_string);
        Venue { name, maps_url }
    }

    fn extract_price(&self, stripped: &[String]) -> String {
        let text = &self.config.text;
        stripped
            .iter()
            .find(|line| line.contains(text.price_label))
            .map(|line| label_value(line, text.price_label))
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.config.engine.placeholder_price.to_string())
    }

    fn extract_courts(&self, stripped: &[String]) -> (u32, Option<usize>) {
        let text = &self.config.text;
        let idx = stripped
            .iter()
            .position(|line| line.contains(text.courts_label));
        let courts = idx
            .map(|i| label_value(&stripped[i], text.courts_label))
            .and_then(|value| value.parse().ok())
            .filter(|&courts| courts > 0)
            .unwrap_or(self.config.engine.default_courts);
        (courts, idx)
    }

    fn detect_cancelled(&self, stripped: &[String]) -> bool {
        let text = &self.config.text;
        stripped.iter().any(|line| {
            line.contains(text.cancel_marker) || line.contains(text.cancelled_phrase)
        })
    }

    fn extract_calendar_link(&self, lines: &[&str], stripped: &[String]) -> Option<String> {
        let idx = stripped
            .iter()
            .position(|line| line.contains(self.config.text.calendar_phrase))?;
        self.rules
            .anchor_in(lines[idx])
            .map(|(href, _)| href.to_string())
    }

    /// Legacy text has no calendar section; rebuild the link from the
    /// derived schedule so formatting always emits a working one.
    fn regenerate_calendar_link(
        &self,
        schedule: Option<&Schedule>,
        venue_name: &str,
        now: DateTime<Utc>,
    ) -> Option<String> {
        let links = links::build_links(schedule?, venue_name, now, &self.config.engine)?;
        Some(links.google)
    }

    fn extract_note(
        &self,
        stripped: &[String],
        courts_idx: Option<usize>,
        anchor_idx: Option<usize>,
    ) -> Option<String> {
        let start = courts_idx? + 1;
        let end = anchor_idx.unwrap_or(stripped.len());
        stripped[start..end.max(start)]
            .iter()
            .find(|line| !line.is_empty() && !self.is_meta_line(line))
            .cloned()
    }
}

fn label_value(stripped_line: &str, label: &str) -> String {
    match stripped_line.find(label) {
        Some(idx) => stripped_line[idx + label.len()..].trim().to_string(),
        None => String::new(),
    }
}
