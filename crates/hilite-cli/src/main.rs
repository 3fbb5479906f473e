//! hilite: build highlight summary notes from a library snapshot.
//!
//! Environment:
//!   HILITE_CONFIG      - TOML file with a `[summary]` table
//!   HILITE_*           - per-field overrides (see `SummaryConfig::from_lookup`)
//!   LOG_FORMAT         - "json" or "text" (default)
//!   LOG_FILE           - path to log file (optional, enables file logging)
//!   RUST_LOG           - standard env filter

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hilite_core::{defaults, ItemId};

use crate::commands::RunOptions;

#[derive(Parser)]
#[command(name = "hilite")]
#[command(author, version, about = "Collect colored highlights into summary notes")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace the summary notes of the selected item
    Run {
        /// Library snapshot (JSON)
        #[arg(short, long)]
        library: PathBuf,

        /// Item to select before running (default: the snapshot's selection)
        #[arg(short, long)]
        item: Option<ItemId>,

        /// Annotation color to collect, e.g. "#ffd400"
        #[arg(short, long)]
        color: Option<String>,

        /// TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Run without writing the library back
        #[arg(long)]
        dry_run: bool,

        /// Write the updated library here instead of over the input
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the notes under an item
    Show {
        /// Library snapshot (JSON)
        #[arg(short, long)]
        library: PathBuf,

        /// Parent item id
        #[arg(short, long)]
        item: ItemId,
    },
}

/// Install the tracing subscriber. The returned guard flushes file logs on drop.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| defaults::LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(ref path) = log_file {
        let path = std::path::Path::new(path);
        let dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file_name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("hilite.log");
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);

        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stderr)"),
        "Logging initialized"
    );
    guard
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let _guard = init_logging();

    let result = match cli.command {
        Commands::Run {
            library,
            item,
            color,
            config,
            dry_run,
            output,
        } => commands::run(RunOptions {
            library,
            item,
            color,
            config,
            dry_run,
            output,
        })
        .await
        .map(|report| println!("{}", report)),
        Commands::Show { library, item } => {
            commands::show(&library, item).await.map(|bodies| {
                for body in bodies {
                    println!("{}\n", body);
                }
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
