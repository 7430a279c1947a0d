//! Binary entrypoint for the Merchant Board CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml`
//! - `merchants` - every merchant with its main items
//! - `schedule [--day <day>] [--all]` - a day's schedule (default today)
//! - `merchant <name>` - one merchant's schedule and catalog
//! - `item <name>` - merchants selling a matching item
//! - `active [--at <time>]` - merchants open now or at a given time
//! - `summary` - merchant and slot counts
//! - `watch` - keep refreshing and log merchant arrivals and departures
//!
//! See the library crate docs for module-level details: `merchant_board::`.
use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use merchant_board::config::Config;
use merchant_board::logutil::quoted;
use merchant_board::merchant::{DayOfWeek, IndexStore, ScheduleIndex};
use merchant_board::render;
use merchant_board::service::MerchantService;
use merchant_board::source::{Refresher, SnapshotSource};

#[derive(Parser)]
#[command(name = "merchant-board")]
#[command(about = "Wandering merchant schedule lookups")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Read the snapshot from this file instead of the configured source
    #[arg(short, long, global = true)]
    snapshot: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// List every merchant with its main items
    Merchants,
    /// Show the schedule for one day
    Schedule {
        /// Day as 0-6 (0 = Sunday), `sun`, or `Sunday`; defaults to today
        #[arg(short, long)]
        day: Option<String>,
        /// Show every day of the week
        #[arg(long, conflicts_with = "day")]
        all: bool,
    },
    /// Show one merchant's schedule and catalog
    Merchant {
        /// Part of the region or merchant name
        name: String,
    },
    /// Find merchants selling an item
    Item {
        /// Part of the item name
        name: String,
    },
    /// List merchants open at a given time on the reference clock
    Active {
        /// `YYYY-MM-DDTHH:MM:SS`; defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Show merchant and schedule counts
    Summary,
    /// Refresh periodically and log merchant arrivals and departures
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.command {
        Commands::Init => None,
        _ => Config::load(&cli.config).await.ok(),
    };
    init_logging(&config, cli.verbose);

    if let Commands::Init = cli.command {
        Config::create_default(&cli.config).await?;
        info!("Configuration file created at {}", cli.config);
        return Ok(());
    }

    let config = config.unwrap_or_else(|| {
        warn!("No usable config at {}; using defaults", cli.config);
        Config::default()
    });
    let source = match &cli.snapshot {
        Some(path) => SnapshotSource::File(path.clone()),
        None => SnapshotSource::from_config(&config.source)?,
    };

    if let Commands::Watch = cli.command {
        info!("Starting Merchant Board v{}", env!("CARGO_PKG_VERSION"));
        let mut service = MerchantService::new(config, source);
        return service.run().await;
    }

    let store = Arc::new(IndexStore::new());
    let mut refresher = Refresher::new(source, store.clone());
    if !refresher.refresh().await.is_updated() {
        warn!("Answering from an empty index");
    }
    let index = store.current();
    let now = config.clock.now();

    run_query(&cli, &index, now)
}

fn run_query(cli: &Cli, index: &ScheduleIndex, now: NaiveDateTime) -> Result<()> {
    match &cli.command {
        Commands::Merchants => {
            let list = index.merchants();
            emit(cli.json, &list, || render::merchants(&list))
        }
        Commands::Schedule { all: true, .. } => {
            let week = index.schedule_by_day();
            emit(cli.json, &week, || render::week_schedule(&week))
        }
        Commands::Schedule { day, .. } => {
            let day = match day {
                Some(text) => {
                    DayOfWeek::parse(text).ok_or_else(|| anyhow!("Unrecognized day '{}'", text))?
                }
                None => DayOfWeek::of(&now),
            };
            let slots = index.schedule_for_day(day);
            emit(cli.json, &slots, || render::day_schedule(day, &slots))
        }
        Commands::Merchant { name } => {
            info!("Merchant lookup {}", quoted(name));
            let detail = index.merchant_schedule(name);
            emit(cli.json, &detail, || {
                render::merchant_detail(name, detail.as_ref())
            })
        }
        Commands::Item { name } => {
            info!("Item search {}", quoted(name));
            let sellers = index.item_sellers(name);
            emit(cli.json, &sellers, || render::sellers(name, &sellers))
        }
        Commands::Active { at } => {
            let at = match at {
                Some(text) => parse_instant(text)?,
                None => now,
            };
            let active = index.active_merchants(&at);
            emit(cli.json, &active, || render::active(&at, &active))
        }
        Commands::Summary => {
            let summary = index.summary();
            emit(cli.json, &summary, || render::summary(&summary))
        }
        Commands::Init | Commands::Watch => Ok(()),
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text().trim_end());
    }
    Ok(())
}

fn parse_instant(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .map_err(|e| anyhow!("Invalid --at time '{}': {}", text, e))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .map(|cfg| cfg.logging.level_filter())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    match log_file {
        Some(f) => {
            let file = std::sync::Mutex::new(f);
            // Echo to the console only when attached to a terminal
            let is_tty = atty::is(atty::Stream::Stdout);
            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());
                if let Ok(mut guard) = file.lock() {
                    let _ = writeln!(guard, "{}", line);
                }
                if is_tty {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
        }
        None => {
            builder.format(|fmt, record| {
                writeln!(
                    fmt,
                    "{} [{}] {}",
                    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                    record.level(),
                    record.args()
                )
            });
        }
    }
    let _ = builder.try_init();
}
