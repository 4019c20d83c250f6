use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "newspush")]
#[command(about = "Fetch a news feed and email new entries to a recipient list")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the feed and email new entries (default)
    Run {
        /// Dry run - print the email instead of sending it and leave the state file untouched
        #[arg(long)]
        dry_run: bool,
    },

    /// Render the current feed as an email without checking for new entries
    Preview {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the last pushed link
    Status,

    /// Forget the last pushed link so the next run pushes again
    Reset,
}
