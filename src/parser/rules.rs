//! Line grammar of the game message.
//!
//! One small rule per line shape instead of a monolithic pattern, so a
//! failing input points at the rule that rejected it.

use anyhow::{Context, Result};
use regex::Regex;

use crate::domain::{Participant, Schedule, SkillLevel};

/// A parsed numbered roster line
#[derive(Debug, Clone)]
pub enum RosterLine {
    Empty,
    Player(Participant),
}

pub struct LineRules {
    anchor: Regex,
    numbered: Regex,
    name_level: Regex,
    date: Regex,
    time_range: Regex,
}

impl LineRules {
    pub fn compile() -> Result<Self> {
        Ok(Self {
            anchor: Regex::new(r#"<a\s+href="([^"]+)"[^>]*>(.*?)</a>"#)
                .context("Failed to compile anchor rule")?,
            numbered: Regex::new(r"^(\d+)\.\s*(.*)$").context("Failed to compile roster rule")?,
            name_level: Regex::new(r"^(.*\S)\s*\(([^()]*)\)$")
                .context("Failed to compile name/level rule")?,
            date: Regex::new(r"\b(\d{1,2}\.\d{1,2})\b").context("Failed to compile date rule")?,
            time_range: Regex::new(r"(\d{1,2}:\d{2})\s*[-–]\s*(\d{1,2}:\d{2})")
                .context("Failed to compile time range rule")?,
        })
    }

    /// First anchor in a raw line: `(href, inner text)`
    pub fn anchor_in<'t>(&self, line: &'t str) -> Option<(&'t str, &'t str)> {
        let caps = self.anchor.captures(line)?;
        Some((
            caps.get(1).map(|m| m.as_str())?,
            caps.get(2).map(|m| m.as_str())?,
        ))
    }

    /// Schedule labels from the header title (`Сб, 31.08, 18:00-20:00`)
    pub fn parse_header(&self, title: &str) -> Option<Schedule> {
        let date = self.date.captures(title)?.get(1)?.as_str().to_string();
        let time_caps = self.time_range.captures(title)?;
        let time_range = format!(
            "{}-{}",
            time_caps.get(1)?.as_str(),
            time_caps.get(2)?.as_str()
        );
        let day_label = title
            .split(',')
            .next()
            .map(str::trim)
            .filter(|day| !day.is_empty() && !day.contains(':') && !day.contains('.'))
            .unwrap_or_default()
            .to_string();
        Some(Schedule {
            day_label,
            date_label: date,
            time_range,
        })
    }

    /// `<index>. <name> (<level>)` or an empty slot (`<index>. -`)
    pub fn parse_roster_line(&self, line: &str, empty_slot: &str) -> Option<RosterLine> {
        let caps = self.numbered.captures(line.trim())?;
        let rest = caps.get(2)?.as_str().trim();
        if rest.is_empty() || rest == empty_slot {
            return Some(RosterLine::Empty);
        }
        Some(RosterLine::Player(self.parse_entry(rest)))
    }

    /// Waitlist entry: numbered form or the legacy `🎾 <name> (<level>)` form.
    /// The emoji form requires an explicit level so a stray header line
    /// starting with the same emoji is not mistaken for an entry.
    pub fn parse_waitlist_line(
        &self,
        line: &str,
        entry_emoji: &str,
        empty_slot: &str,
    ) -> Option<Participant> {
        let trimmed = line.trim();
        if let Some(caps) = self.numbered.captures(trimmed) {
            let rest = caps.get(2)?.as_str().trim();
            if rest.is_empty() || rest == empty_slot {
                return None;
            }
            return Some(self.parse_entry(rest));
        }
        let rest = trimmed.strip_prefix(entry_emoji)?.trim();
        let caps = self.name_level.captures(rest)?;
        Some(Participant::new(
            caps.get(1)?.as_str(),
            SkillLevel(caps.get(2)?.as_str().trim().to_string()),
        ))
    }

    /// Split `<name> (<level>)`; a missing level is echoed as `?` rather
    /// than rejecting the player.
    fn parse_entry(&self, rest: &str) -> Participant {
        match self.name_level.captures(rest) {
            Some(caps) => {
                let name = caps.get(1).map(|m| m.as_str()).unwrap_or(rest);
                let level = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("?");
                Participant::new(name, SkillLevel(level.to_string()))
            }
            None => Participant::new(rest, SkillLevel("?".to_string())),
        }
    }
}
