//! Liquid token indexer
//!
//! Replays decoded Liquid contract events into a local store and answers
//! holder and leaderboard queries against it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use liquid_indexer::{IndexerConfig, ServiceContainer};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use validator::Validate;

#[derive(Parser)]
#[command(name = "liquid-indexer")]
#[command(about = "Liquid token holder, points and leaderboard indexer")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "indexer.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Process a JSON Lines file of decoded events in order
    Replay {
        #[arg(long)]
        events: String,
    },
    /// Print the current top ten
    Leaderboard,
    /// Print a single holder record
    Holder { address: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if std::path::Path::new(&cli.config).exists() {
        IndexerConfig::from_file(&cli.config)?
    } else {
        warn!("Config file not found, using defaults: {}", cli.config);
        IndexerConfig::default()
    };

    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    init_logging(&config)?;

    info!("Starting Liquid indexer");
    info!("Contract: {}", config.contract.address);
    info!("Storage backend: {:?}", config.storage.backend);

    config.validate()?;
    config.ensure_directories()?;
    info!("Configuration validated successfully");

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let Some(command) = cli.command else {
        anyhow::bail!("no command given; run with --help to list them");
    };

    let container = ServiceContainer::new(config).await?;
    container.health_check().await?;

    match command {
        Command::Replay { events } => {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received shutdown signal");
                }
                result = container.replay(&events) => {
                    let summary = result?;
                    println!(
                        "recorded={} duplicates={} excluded={}",
                        summary.recorded, summary.duplicates, summary.excluded
                    );
                    if let Some(aggregate) = container.aggregate().await? {
                        println!("{}", serde_json::to_string_pretty(&aggregate)?);
                    }
                }
            }
        }
        Command::Leaderboard => {
            let slots = container.leaderboard().await?;
            println!("{}", serde_json::to_string_pretty(&slots)?);
        }
        Command::Holder { address } => match container.holder(&address).await? {
            Some(holder) => println!("{}", serde_json::to_string_pretty(&holder)?),
            None => warn!("No holder record for {}", address),
        },
    }

    info!("Shutting down Liquid indexer");
    Ok(())
}

fn init_logging(config: &IndexerConfig) -> Result<()> {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("liquid_indexer={}", log_level).into());

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}
