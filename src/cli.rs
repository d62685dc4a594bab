use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "padel game-message codec")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Parse a game message from stdin and print the snapshot as JSON
    Parse,
    /// Apply one participant action to a game message from stdin
    Apply {
        /// Display name of the participant (may be @handle or anchor markup)
        #[arg(short, long)]
        name: String,
        /// Skill label to register with, or "Не приду" to cancel
        #[arg(short, long)]
        action: String,
    },
    /// Repair stripped decoration in a game message from stdin
    Restore,
    /// Print hours until the scheduled start and the late-cancellation flag
    Hours,
}
