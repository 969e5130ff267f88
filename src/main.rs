//! Trivia Match - terminal front end
//!
//! Plays the game in the terminal or inspects the card list.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, SourceArgs};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use trivia_match::{
    AppConfig, CardSource, FileCardSource, HttpCardSource, build_round, usable_cards,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            source,
            round_size,
            cooldown_ms,
        } => run_play(source, round_size, cooldown_ms).await,
        Command::Cards { source } => run_cards(source).await,
    }
}

/// Run the terminal game
async fn run_play(
    source: SourceArgs,
    round_size: Option<usize>,
    cooldown_ms: Option<u64>,
) -> Result<()> {
    let mut config = load_config(&source)?;
    if let Some(round_size) = round_size {
        config = config.with_round_size(round_size)?;
    }
    if let Some(cooldown_ms) = cooldown_ms {
        config = config.with_cooldown_ms(cooldown_ms);
    }

    let card_source = make_source(&source, &config);
    tui::run_tui(card_source, config.game().clone()).await
}

/// Fetch the card list and print a summary
#[instrument(skip_all)]
async fn run_cards(source: SourceArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&source)?;
    let card_source = make_source(&source, &config);

    info!(source = %card_source.describe(), "Fetching card list");
    let cards = card_source.fetch_cards().await?;
    let usable = usable_cards(&cards).len();
    let round_size = *config.game().round_size();

    println!("Source:       {}", card_source.describe());
    println!("Cards:        {}", cards.len());
    println!("Usable cards: {}", usable);
    match build_round(&cards, round_size, &mut rand::rng()) {
        Ok(_) => println!("Round of {}:  ready", round_size),
        Err(e) => println!("Round of {}:  {}", round_size, e),
    }

    Ok(())
}

/// Reads the config file and applies the endpoint override.
fn load_config(source: &SourceArgs) -> Result<AppConfig> {
    let mut config = AppConfig::load(source.config.as_deref())?;
    if let Some(api_base) = &source.api_base {
        config = config.with_api_base(api_base.clone());
    }
    Ok(config)
}

/// A deck file wins over the card endpoint.
fn make_source(source: &SourceArgs, config: &AppConfig) -> Box<dyn CardSource> {
    match &source.deck {
        Some(path) => Box::new(FileCardSource::new(path.clone())),
        None => Box::new(HttpCardSource::new(config.api_base().clone())),
    }
}
