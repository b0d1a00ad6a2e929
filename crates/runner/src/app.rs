//! App - runs the requested passes in a fixed order
//!
//! Order: tag file export, strategy import, full rebuild, sync, refresh. A failing
//! pass stops the run; passes already finished stay applied.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use firestocks_engine::{PassReport, SyncEngine, SyncError, WriteSummary};
use firestocks_ports::{Clock, DocumentStore, InstrumentSource, SourceError};
use log::{info, warn};
use thiserror::Error;

use crate::config::{ConfigError, RunnerConfig};
use crate::shard::select_shard;
use crate::snapshot::JsonSnapshot;
use crate::strategies::load_strategies;

pub const DEFAULT_TAGS_OUTPUT: &str = "tags.json";

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("export failed: cannot write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<SourceError> for RunnerError {
    fn from(err: SourceError) -> Self {
        RunnerError::Sync(SyncError::Source(err))
    }
}

/// Passes requested for one run
#[derive(Debug, Clone)]
pub struct Tasks {
    pub tags: bool,
    pub strategies: bool,
    pub create: bool,
    pub update: bool,
    pub refresh: bool,
    pub tags_output: PathBuf,
}

impl Default for Tasks {
    fn default() -> Self {
        Self {
            tags: false,
            strategies: false,
            create: false,
            update: false,
            refresh: false,
            tags_output: PathBuf::from(DEFAULT_TAGS_OUTPUT),
        }
    }
}

impl Tasks {
    pub fn is_empty(&self) -> bool {
        !(self.tags || self.strategies || self.create || self.update || self.refresh)
    }

    fn needs_snapshot(&self) -> bool {
        self.create || self.update || self.refresh
    }
}

/// What a run did, per pass
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tags_file: Option<PathBuf>,
    pub strategies: Option<WriteSummary>,
    pub rebuild: Option<PassReport>,
    pub sync: Option<PassReport>,
    pub refresh: Option<PassReport>,
}

pub struct App {
    engine: SyncEngine,
    config: RunnerConfig,
}

impl App {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
        config: RunnerConfig,
    ) -> Result<Self, RunnerError> {
        let engine = SyncEngine::new(store, clock, config.sync_config())?;
        Ok(Self { engine, config })
    }

    pub async fn run(&self, tasks: &Tasks) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::default();
        if tasks.is_empty() {
            warn!("Nothing to do, pass --create, --update, --strategies or --tags");
            return Ok(summary);
        }

        let snapshot = if tasks.needs_snapshot() {
            Some(JsonSnapshot::load(self.config.require_snapshot()?)?)
        } else {
            None
        };

        if tasks.tags {
            info!("Create tag file");
            self.export_tags(&tasks.tags_output).await?;
            summary.tags_file = Some(tasks.tags_output.clone());
        }

        if tasks.strategies {
            info!("Create strategies");
            let documents = load_strategies(self.config.require_data_root()?)?;
            summary.strategies = Some(self.engine.import_strategies(documents).await?);
        }

        if let Some(snapshot) = &snapshot {
            if tasks.create {
                info!("Delete old data and add new");
                let records = snapshot.instruments().await?;
                summary.rebuild = Some(self.engine.rebuild(&records, snapshot, snapshot).await?);
            }

            if tasks.update {
                let records = select_shard(snapshot.instruments().await?, self.config.shard)?;
                info!(
                    "Sync '{}': worker {} of {} owns {} instruments",
                    self.engine.config().stocks_collection,
                    self.config.shard.worker_id,
                    self.config.shard.worker_count,
                    records.len()
                );
                summary.sync = Some(self.engine.sync(&records, snapshot, snapshot).await?);
            }

            if tasks.refresh {
                if self.config.shard.worker_id == 0 {
                    info!("Refresh every stored stock from the whole snapshot");
                    summary.refresh = Some(self.engine.refresh(snapshot.records(), snapshot).await?);
                } else {
                    info!(
                        "Refresh is left to worker 0, skipping on worker {}",
                        self.config.shard.worker_id
                    );
                }
            }
        }

        Ok(summary)
    }

    async fn export_tags(&self, path: &Path) -> Result<(), RunnerError> {
        let export = self.engine.export_tags().await?;
        let json = export.to_json()?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| RunnerError::Output {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            "Wrote {} stocks and {} tag types to {}",
            export.stocks.len(),
            export.tags.len(),
            path.display()
        );
        Ok(())
    }
}
