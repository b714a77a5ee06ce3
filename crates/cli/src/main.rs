//! Lustre CLI - Inventory allocation and fulfillment classification.
//!
//! # Usage
//!
//! ```bash
//! # Run a pass and write results to ./out
//! lustre allocate --snapshot snapshot.json
//!
//! # Run a pass without writing anything
//! lustre allocate --snapshot snapshot.json --dry-run
//!
//! # Print dashboard tab counts
//! lustre tabs --snapshot snapshot.yaml
//!
//! # List the orders in one tab
//! lustre tabs --snapshot snapshot.yaml --list needs_action
//!
//! # Show resize donors for a line item
//! lustre resize-candidates --snapshot snapshot.json --line-item 4211
//! ```
//!
//! # Commands
//!
//! - `allocate` - Run an allocation pass and write line items, orders, shipments and tab counts
//! - `tabs` - Print tab counts or list one tab's orders
//! - `resize-candidates` - Print the variants a line item could be resized from

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lustre_fulfillment::{OrderSort, OrderTab};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;
mod snapshot;

use config::CliConfig;
use error::CliError;

#[derive(Parser)]
#[command(name = "lustre")]
#[command(author, version, about = "Lustre inventory allocation tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an allocation pass and write its results
    Allocate {
        /// Snapshot file (.json, .yaml or .yml)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Order listing sort key (e.g. `created_asc`, `price_desc`, `date_needed_asc`)
        #[arg(long)]
        sort: Option<OrderSort>,

        /// Output directory (defaults to `LUSTRE_OUTPUT_DIR` or `out`)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the pass summary without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Print dashboard tab counts
    Tabs {
        /// Snapshot file (.json, .yaml or .yml)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Order listing sort key
        #[arg(long)]
        sort: Option<OrderSort>,

        /// List the orders in this tab instead of printing counts
        #[arg(long)]
        list: Option<OrderTab>,
    },
    /// Print the in-stock variants a line item could be resized from
    ResizeCandidates {
        /// Snapshot file (.json, .yaml or .yml)
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Line item ID
        #[arg(short, long)]
        line_item: i32,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CliConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing with `EnvFilter` and Sentry integration.
fn init_tracing() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lustre_cli=info,lustre_fulfillment=info".into());

    // Use JSON format on Fly.io for structured log parsing, text format locally
    let is_fly = std::env::var("FLY_APP_NAME").is_ok();
    let json_layer = is_fly.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_fly).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CliConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let sentry_guard = init_sentry(&config);
    init_tracing();
    if sentry_guard.is_some() {
        tracing::info!("Sentry initialized");
    }

    if let Err(e) = run(cli, &config).await {
        sentry::capture_error(&e);
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &CliConfig) -> Result<(), CliError> {
    match cli.command {
        Commands::Allocate {
            snapshot,
            sort,
            out,
            dry_run,
        } => commands::allocate::run(config, &snapshot, sort, out, dry_run).await?,
        Commands::Tabs {
            snapshot,
            sort,
            list,
        } => commands::tabs::run(config, &snapshot, sort, list).await?,
        Commands::ResizeCandidates {
            snapshot,
            line_item,
        } => commands::resize::run(config, &snapshot, line_item).await?,
    }
    Ok(())
}
