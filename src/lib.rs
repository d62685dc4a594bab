pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod formatter;
pub mod links;
pub mod normalizer;
pub mod parser;
pub mod services;
pub mod timing;

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser as _;
use colored::Colorize;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::services::MessageService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_parse() -> Result<()> {
    let text = read_stdin()?;
    let config = AppConfig::new();
    let parser = parser::Parser::new(&config)?;
    match parser.parse(&text) {
        Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
        None => println!("null"),
    }
    Ok(())
}

pub fn handle_apply(name: &str, action: &str) -> Result<()> {
    let text = read_stdin()?;
    let config = AppConfig::new();

    // The engine echoes any label verbatim; the hint is for the operator only.
    let is_sentinel = config
        .text
        .not_coming_labels
        .iter()
        .any(|sentinel| action.trim().to_lowercase() == *sentinel);
    if !is_sentinel && !config.engine.skill_levels.contains(&action.trim()) {
        eprintln!(
            "{}",
            format!("Метка уровня \"{}\" вне обычного словаря", action.trim()).yellow()
        );
    }

    let service = MessageService::new(config)?;
    match service.apply_action(&text, name, action) {
        Some(outcome) => {
            println!("{}", outcome.text);
            if let Some(notification) = outcome.notification {
                eprintln!("{}", notification.yellow());
            }
            if let Some(warning) = outcome.late_warning {
                let hours = warning.hours_remaining.unwrap_or_default();
                eprintln!(
                    "{}",
                    format!("Отмена менее чем за 24 часа (осталось {:.1} ч)", hours).red()
                );
            }
        }
        None => {
            // Unrecoverable text: echo it back unchanged
            println!("{}", text);
            eprintln!("{}", "Не удалось разобрать сообщение".red());
        }
    }
    Ok(())
}

pub fn handle_restore() -> Result<()> {
    let text = read_stdin()?;
    let service = MessageService::new(AppConfig::new())?;
    println!("{}", service.restore(&text));
    Ok(())
}

pub fn handle_hours() -> Result<()> {
    let text = read_stdin()?;
    let config = AppConfig::new();
    let evaluator = timing::PenaltyEvaluator::new(&config)?;
    match evaluator.hours_until_game(&text) {
        Some(hours) => {
            let check = evaluator.is_late_cancellation(&text);
            println!("{:.2}", hours);
            if check.is_late {
                eprintln!("{}", "отмена сейчас будет поздней".yellow());
            }
        }
        None => println!("null"),
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read message text from stdin")?;
    Ok(text)
}
