//! Late-cancellation evaluator.
//!
//! Advisory only: the update engine performs the cancellation regardless,
//! this just tells the caller whether to warn the player that the game is
//! less than a day away.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::config::AppConfig;
use crate::parser::Parser;

/// Result of a late-cancellation check.
///
/// `hours_remaining` is `None` when the schedule cannot be parsed or the
/// game has already started; `is_late` is then always `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct LateCheck {
    pub is_late: bool,
    pub hours_remaining: Option<f64>,
}

impl LateCheck {
    fn not_applicable() -> Self {
        Self {
            is_late: false,
            hours_remaining: None,
        }
    }
}

pub struct PenaltyEvaluator {
    config: AppConfig,
    parser: Parser,
}

impl PenaltyEvaluator {
    pub fn new(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            parser: Parser::new(config)?,
        })
    }

    /// Hours from now until the scheduled start; negative once the game has
    /// started, `None` when the message carries no parsable schedule.
    pub fn hours_until_game(&self, text: &str) -> Option<f64> {
        self.hours_until_game_at(text, Utc::now())
    }

    pub fn hours_until_game_at(&self, text: &str, now: DateTime<Utc>) -> Option<f64> {
        let snapshot = self.parser.parse_at(text, now)?;
        let schedule = snapshot.schedule?;
        let (start, _) = schedule.start_end(now, self.config.engine.utc_offset_hours)?;
        Some((start - now).num_seconds() as f64 / 3600.0)
    }

    /// A cancellation is late inside the configured window before start.
    pub fn is_late_cancellation(&self, text: &str) -> LateCheck {
        self.is_late_cancellation_at(text, Utc::now())
    }

    pub fn is_late_cancellation_at(&self, text: &str, now: DateTime<Utc>) -> LateCheck {
        let Some(hours) = self.hours_until_game_at(text, now) else {
            return LateCheck::not_applicable();
        };
        if hours <= 0.0 {
            return LateCheck::not_applicable();
        }
        LateCheck {
            is_late: hours < self.config.engine.late_window_hours,
            hours_remaining: Some(hours),
        }
    }
}
