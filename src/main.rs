use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use quake_feed::common::time_format::parse_source_time;
use quake_feed::config::Config;
use quake_feed::logging;
use quake_feed::observability;
use quake_feed::pipeline::feed::{normalize_feed, FeedAssembler};
use quake_feed::pipeline::timeline::build_session_timeline;
use quake_feed::types::{read_object_id, RawEventRecord};
use quake_feed::NormalizationRegistry;

#[derive(Parser)]
#[command(name = "quake_feed")]
#[command(about = "Normalize raw seismic and tsunami records into display-ready events")]
#[command(version = "0.1.0")]
struct Cli {
    /// Config file (defaults to $QUAKE_FEED_CONFIG, then config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr when done
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize every record of a file (JSON lines or a JSON array; `-` reads stdin)
    Normalize {
        #[arg(long, default_value = "-")]
        input: String,
    },
    /// Assemble and normalize the recent-events feed
    Feed {
        /// Bulletin records, newest first
        #[arg(long)]
        bulletins: String,
        /// Felt-report records, newest first
        #[arg(long)]
        felt: String,
        /// Reference time as `YYYY/MM/DD HH:MM:SS`; defaults to local now
        #[arg(long)]
        now: Option<String>,
    },
    /// Build the playback timeline of one felt-report session
    Timeline {
        #[arg(long)]
        input: String,
        /// Session start as `YYYY/MM/DD HH:MM:SS`
        #[arg(long)]
        started_at: String,
    },
}

fn read_input(input: &str) -> anyhow::Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(Path::new(input)).with_context(|| format!("Failed to read {}", input))
    }
}

/// Accepts one JSON array or one JSON document per line.
fn read_records(input: &str) -> anyhow::Result<Vec<RawEventRecord>> {
    let content = read_input(input)?;
    let trimmed = content.trim_start();

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .with_context(|| format!("Failed to parse JSON array from {}", input));
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(n, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Failed to parse line {} of {}", n + 1, input))
        })
        .collect()
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::init_logging(&config.logging);

    let prometheus = if cli.metrics {
        Some(observability::install_prometheus_recorder()?)
    } else {
        None
    };

    let registry = NormalizationRegistry::new();

    match cli.command {
        Commands::Normalize { input } => {
            let records = read_records(&input)?;
            let mut failed = 0usize;

            for (index, record) in records.iter().enumerate() {
                match registry.normalize(record) {
                    Ok(event) => print_json(&event)?,
                    Err(e) => {
                        failed += 1;
                        warn!(
                            index,
                            object_id = ?read_object_id(record),
                            error = %e,
                            "failed to normalize record"
                        );
                    }
                }
            }

            info!(total = records.len(), failed, "normalize finished");
        }
        Commands::Feed { bulletins, felt, now } => {
            let now = match now {
                Some(raw) => parse_source_time(&raw).ok_or_else(|| {
                    anyhow!("--now must look like YYYY/MM/DD HH:MM:SS, got {}", raw)
                })?,
                None => chrono::Local::now().naive_local(),
            };

            let assembler = FeedAssembler::new(config.feed.clone());
            let items = assembler.assemble(read_records(&bulletins)?, read_records(&felt)?, now);
            let outcome = normalize_feed(&items, &registry);

            for event in &outcome.events {
                print_json(event)?;
            }
            if !outcome.failures.is_empty() {
                warn!(
                    failed = outcome.failures.len(),
                    "feed contained records that failed to normalize"
                );
            }
        }
        Commands::Timeline { input, started_at } => {
            let records = read_records(&input)?;
            let timeline =
                build_session_timeline(&records, &started_at, config.feed.min_felt_confidence);
            print_json(&timeline)?;
        }
    }

    if let Some(handle) = prometheus {
        eprintln!("{}", handle.render());
    }

    Ok(())
}
