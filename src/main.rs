//! ParamGroups - attribute-group catalog browser
//!
//! Main entry point for the console application.
//!
//! # Overview
//!
//! This binary crate provides a console front-end for ParamGroups. It initializes:
//! - Configuration loading ([`ConfigManager`])
//! - Logging infrastructure (file rotation + optional stderr output)
//! - Tokio runtime (drives the console renderer)
//! - The [`Coordinator`], which spawns the host-processing thread
//!
//! The application uses a split threading model:
//! - **Main thread**: reads console input and issues requests, never blocks on the host
//! - **host-processing thread**: owns the document, runs one dispatch per wake
//! - **Tokio worker**: prints view changes as the host thread publishes them
//!
//! # Execution Flow
//!
//! 1. Load `ParamGroups Config.yaml` from the config directory
//! 2. Initialize logging -> logs/paramgroups.<date>
//! 3. Load the host document (YAML) if one is configured
//! 4. Start the Coordinator and issue the initial catalog request
//! 5. Run the console loop until `q` or end of input
//! 6. Join the host thread and shut the runtime down

use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use clap::Parser;
use paramgroups::services::CatalogStore;
use paramgroups::ui::console;
use paramgroups::{APP_NAME, ConfigManager, Coordinator, InMemoryDocument, VERSION};
use std::io;

#[derive(Parser, Debug)]
#[command(name = "paramgroups")]
#[command(about = "Browse the attribute groups of a host document", long_about = None)]
struct Args {
    /// Directory holding ParamGroups Config.yaml
    #[arg(long, default_value = "ParamGroups Data")]
    config_dir: Utf8PathBuf,

    /// Host document to load (YAML); overrides document.path from the config
    #[arg(short, long)]
    document: Option<Utf8PathBuf>,

    /// Log at debug level
    #[arg(long)]
    debug: bool,

    /// Also log to stderr
    #[arg(long)]
    console_log: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_manager = ConfigManager::new(&args.config_dir)?;
    let mut config = config_manager.load_config()?;

    config.logging.debug_mode |= args.debug;
    config.logging.console_output |= args.console_log;
    let _log_guard = paramgroups::logging::setup_from_settings(&config.logging, "paramgroups")?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let document = match args.document.or_else(|| config.document.path()) {
        Some(path) => InMemoryDocument::load(&path)
            .with_context(|| format!("Failed to load host document {}", path))?,
        None => {
            tracing::warn!("No host document configured - starting with an empty one");
            InMemoryDocument::default()
        }
    };

    let store = CatalogStore::from_settings(&config.catalog);
    tracing::info!(
        "Catalog at {}, index at {}",
        store.catalog_path(),
        store.index_path()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(1)
        .thread_name("paramgroups-worker")
        .build()?;

    let coordinator = Coordinator::start(document, store)?;

    let result = console::run(&coordinator, runtime.handle(), io::stdin().lock());

    tracing::info!("Console closed, shutting down");
    coordinator.shutdown();
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));

    tracing::info!("Application shutdown complete");

    result
}
