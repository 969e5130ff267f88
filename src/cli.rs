//! Command-line interface for trivia_match.

use clap::{Args, Parser, Subcommand};
use trivia_match::API_BASE_ENV;

/// Trivia Match - two-team trivia memory match
#[derive(Parser, Debug)]
#[command(name = "trivia_match")]
#[command(about = "Two-team trivia memory match in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Where cards come from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Config file (defaults to trivia_match.toml when present)
    #[arg(long)]
    pub config: Option<std::path::PathBuf>,

    /// Base URL of the card endpoint
    #[arg(long, env = API_BASE_ENV)]
    pub api_base: Option<String>,

    /// Read cards from a local JSON deck instead of the card endpoint
    #[arg(long)]
    pub deck: Option<std::path::PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Card source options
        #[command(flatten)]
        source: SourceArgs,

        /// Pairs per round
        #[arg(long)]
        round_size: Option<usize>,

        /// How long a wrong pair stays visible, in milliseconds
        #[arg(long)]
        cooldown_ms: Option<u64>,
    },

    /// Fetch the card list once and print a summary
    Cards {
        /// Card source options
        #[command(flatten)]
        source: SourceArgs,
    },
}
