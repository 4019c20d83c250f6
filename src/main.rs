use std::fs;

use chrono::{FixedOffset, Utc};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newspush::cli::{Cli, Commands};
use newspush::config::Config;
use newspush::domain::{DeliveryOutcome, FetchOutcome, SkipReason};
use newspush::errors::PushResult;
use newspush::services::{
    ContentFormatter, DeliveryAgent, NoveltyTracker, PushPipeline, RunReport, SmtpMailTransport,
};
use newspush::sources::{FeedSource, HttpFeedSource};
use newspush::storage::{FilePointerStore, PointerStore};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "newspush=debug,info"
    } else {
        "newspush=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> PushResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Commands::Run { dry_run: false }) {
        Commands::Run { dry_run } => cmd_run(&config, dry_run),
        Commands::Preview { output } => cmd_preview(&config, output),
        Commands::Status => cmd_status(&config),
        Commands::Reset => cmd_reset(&config),
    }
}

fn log_run_banner() {
    let now = Utc::now();
    let utc = now.format("%Y-%m-%d %H:%M:%S");
    let cst = FixedOffset::east_opt(8 * 3600)
        .map(|offset| now.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    tracing::info!("Run started | UTC: {} | UTC+8: {}", utc, cst);
}

fn cmd_run(config: &Config, dry_run: bool) -> PushResult<()> {
    log_run_banner();

    let source = HttpFeedSource::new(&config.feed)?;
    let store = FilePointerStore::new(&config.state_path);
    let pipeline = PushPipeline::new(
        NoveltyTracker::new(source, store),
        ContentFormatter::new(config.max_entries),
        DeliveryAgent::new(SmtpMailTransport::new(&config.mail), config.mail.clone()),
    );

    let report = if dry_run {
        pipeline.dry_run()?
    } else {
        pipeline.run()?
    };

    match report {
        RunReport::Skipped(SkipReason::NoData) => {
            println!("No feed entries available, nothing to push.");
        }
        RunReport::Skipped(SkipReason::Unchanged) => {
            println!("No new entries since last run.");
        }
        RunReport::Previewed(document) => {
            println!("{}", document);
        }
        RunReport::Delivered(DeliveryOutcome::Delivered { sent }) => {
            println!("Delivered to {} recipients.", sent);
        }
        RunReport::Delivered(DeliveryOutcome::ConfigError(reason)) => {
            println!("Mail not sent, configuration incomplete: {}", reason);
        }
        RunReport::Delivered(DeliveryOutcome::AuthFailed(reason)) => {
            println!("Mail not sent, login rejected: {}", reason);
        }
    }

    tracing::info!("Run finished");
    Ok(())
}

fn cmd_preview(config: &Config, output: Option<String>) -> PushResult<()> {
    let source = HttpFeedSource::new(&config.feed)?;
    tracing::info!(url = source.url(), "Rendering preview");

    let entries = match source.fetch() {
        FetchOutcome::Entries { entries, .. } => entries,
        FetchOutcome::NoData { reason } => {
            println!("No feed entries available: {}", reason);
            return Ok(());
        }
    };

    let fragment = ContentFormatter::new(config.max_entries).format(&entries);
    let document = ContentFormatter::document(&fragment);

    match output {
        Some(path) => {
            fs::write(&path, &document)?;
            println!("Wrote preview of {} entries to {}", entries.len().min(config.max_entries), path);
        }
        None => {
            println!("{}", document);
        }
    }

    Ok(())
}

fn cmd_status(config: &Config) -> PushResult<()> {
    let store = FilePointerStore::new(&config.state_path);

    match store.load()? {
        Some(link) => println!("Last pushed link: {}", link),
        None => println!("No previous run recorded. State file: {}", store.path().display()),
    }

    Ok(())
}

fn cmd_reset(config: &Config) -> PushResult<()> {
    let store = FilePointerStore::new(&config.state_path);

    if store.clear()? {
        println!("Removed {}", store.path().display());
    } else {
        println!("No previous run recorded.");
    }

    Ok(())
}
