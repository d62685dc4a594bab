use anyhow::Result;

use dubai_padel_roster::cli::Command;
use dubai_padel_roster::{handle_apply, handle_hours, handle_parse, handle_restore, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Parse => handle_parse(),
        Command::Apply { name, action } => handle_apply(name, action),
        Command::Restore => handle_restore(),
        Command::Hours => handle_hours(),
    }
}
