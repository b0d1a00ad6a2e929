//! firestocks - sync a local stock snapshot into Firestore
//!
//! Flags may be combined; passes run as tags, strategies, create, update, refresh.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use firestocks_clock::{Clock, SystemClock};
use firestocks_memstore::MemoryStore;
use firestocks_ports::DocumentStore;
use firestocks_runner::{App, DEFAULT_TAGS_OUTPUT, RunnerConfig, Tasks};
use log::info;

#[derive(Parser)]
#[command(name = "firestocks", about = "Firestore stock database sync")]
struct Cli {
    /// Delete the stocks and tags collections and write them from scratch.
    #[arg(short, long, default_value_t = false)]
    create: bool,

    /// Add missing stocks, then update prices and signals of this worker's shard.
    #[arg(short, long, default_value_t = false)]
    update: bool,

    /// Update every stored stock from the whole snapshot; fails on stocks the snapshot lacks.
    #[arg(short, long, default_value_t = false)]
    refresh: bool,

    /// Replace the strategies collection with the JSON files under DATA_ROOT.
    #[arg(short, long, default_value_t = false)]
    strategies: bool,

    /// Write the tag file from the stocks and tags collections.
    #[arg(short, long, default_value_t = false)]
    tags: bool,

    /// Where --tags writes its file.
    #[arg(long, default_value = DEFAULT_TAGS_OUTPUT)]
    tags_output: PathBuf,

    /// Snapshot file; overrides FIRESTOCKS_SNAPSHOT.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Run against an empty in-memory store instead of Firestore.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = RunnerConfig::from_env().context("reading environment")?;
    if let Some(snapshot) = cli.snapshot {
        config.snapshot = Some(snapshot);
    }

    let store: Arc<dyn DocumentStore> = if cli.dry_run {
        info!("Dry run against an in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        let firestore = config.firestore().context("configuring Firestore")?;
        firestocks_firestore::connect(&firestore).context("connecting to Firestore")?
    };

    let tasks = Tasks {
        tags: cli.tags,
        strategies: cli.strategies,
        create: cli.create,
        update: cli.update,
        refresh: cli.refresh,
        tags_output: cli.tags_output,
    };

    let clock = Arc::new(SystemClock::new());
    info!("Dating documents with the {} clock", clock.name());
    let app = App::new(store, clock, config)?;
    let summary = app.run(&tasks).await?;

    let diagnostics: usize = [&summary.rebuild, &summary.sync, &summary.refresh]
        .into_iter()
        .flatten()
        .map(|report| report.diagnostics.len())
        .sum();
    info!("Done with {} price warnings", diagnostics);
    Ok(())
}
