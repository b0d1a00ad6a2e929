//! Runner configuration from the process environment

use std::path::PathBuf;
use std::time::Duration;

use firestocks_engine::SyncConfig;
use firestocks_firestore::FirestoreConfig;
use thiserror::Error;

pub const ENV_PROJECT_ID: &str = "FIRESTORE_PROJECT_ID";
pub const ENV_ACCESS_TOKEN: &str = "FIRESTORE_ACCESS_TOKEN";
pub const ENV_EMULATOR_HOST: &str = "FIRESTORE_EMULATOR_HOST";
pub const ENV_SNAPSHOT: &str = "FIRESTOCKS_SNAPSHOT";
pub const ENV_DATA_ROOT: &str = "DATA_ROOT";
pub const ENV_WORKER_ID: &str = "STOCK2FIREBASE_ID";
pub const ENV_WORKER_COUNT: &str = "STOCK2FIREBASE_MAX_PROCESSES";
pub const ENV_MAX_BATCH: &str = "FIRESTOCKS_MAX_BATCH";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which contiguous slice of the sorted instruments this process owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerShard {
    pub worker_id: usize,
    pub worker_count: usize,
}

impl Default for WorkerShard {
    fn default() -> Self {
        Self {
            worker_id: 0,
            worker_count: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub project_id: Option<String>,
    pub access_token: Option<String>,
    pub emulator_host: Option<String>,
    /// Local snapshot file with instruments, prices and tags
    pub snapshot: Option<PathBuf>,
    /// Directory holding strategy `*.json` files
    pub data_root: Option<PathBuf>,
    pub shard: WorkerShard,
    pub max_batch_size: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            access_token: None,
            emulator_host: None,
            snapshot: None,
            data_root: None,
            shard: WorkerShard::default(),
            max_batch_size: SyncConfig::default().max_batch_size,
        }
    }
}

impl RunnerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let shard = WorkerShard {
            worker_id: parse_usize(ENV_WORKER_ID, get(ENV_WORKER_ID))?
                .unwrap_or(defaults.shard.worker_id),
            worker_count: parse_usize(ENV_WORKER_COUNT, get(ENV_WORKER_COUNT))?
                .unwrap_or(defaults.shard.worker_count),
        };

        Ok(Self {
            project_id: get(ENV_PROJECT_ID),
            access_token: get(ENV_ACCESS_TOKEN),
            emulator_host: get(ENV_EMULATOR_HOST),
            snapshot: get(ENV_SNAPSHOT).map(PathBuf::from),
            data_root: get(ENV_DATA_ROOT).map(PathBuf::from),
            shard,
            max_batch_size: parse_usize(ENV_MAX_BATCH, get(ENV_MAX_BATCH))?
                .unwrap_or(defaults.max_batch_size),
        })
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig::default()
            .with_max_batch_size(self.max_batch_size)
            .with_tag_ownership(self.shard.worker_id == 0)
    }

    /// Firestore settings; the emulator host wins over the production endpoint
    pub fn firestore(&self) -> Result<FirestoreConfig, ConfigError> {
        let project_id = self
            .project_id
            .clone()
            .ok_or(ConfigError::Missing(ENV_PROJECT_ID))?;

        let mut config = FirestoreConfig::new(project_id).with_timeout(Duration::from_secs(60));
        if let Some(token) = &self.access_token {
            config = config.with_access_token(token);
        }
        if let Some(host) = &self.emulator_host {
            config = config.emulator(host);
        }
        Ok(config)
    }

    pub fn require_snapshot(&self) -> Result<&PathBuf, ConfigError> {
        self.snapshot.as_ref().ok_or(ConfigError::Missing(ENV_SNAPSHOT))
    }

    pub fn require_data_root(&self) -> Result<&PathBuf, ConfigError> {
        self.data_root
            .as_ref()
            .ok_or(ConfigError::Missing(ENV_DATA_ROOT))
    }
}

fn parse_usize(var: &'static str, value: Option<String>) -> Result<Option<usize>, ConfigError> {
    value
        .map(|value| {
            value
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::Invalid {
                    var,
                    value: value.clone(),
                    reason: e.to_string(),
                })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = RunnerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RunnerConfig::default());
        assert_eq!(config.max_batch_size, 400);
        assert_eq!(config.shard, WorkerShard::default());
        assert!(config.sync_config().owns_tags);
        assert_eq!(config.firestore(), Err(ConfigError::Missing(ENV_PROJECT_ID)));
    }

    #[test]
    fn test_full_environment() {
        let config = RunnerConfig::from_lookup(lookup(&[
            (ENV_PROJECT_ID, "stocks-app"),
            (ENV_EMULATOR_HOST, "localhost:8080"),
            (ENV_SNAPSHOT, "/data/snapshot.json"),
            (ENV_DATA_ROOT, "/data/strategies"),
            (ENV_WORKER_ID, "2"),
            (ENV_WORKER_COUNT, "4"),
            (ENV_MAX_BATCH, "250"),
        ]))
        .unwrap();

        assert_eq!(config.shard, WorkerShard { worker_id: 2, worker_count: 4 });
        assert_eq!(config.sync_config().max_batch_size, 250);
        // Only worker 0 rewrites the tags during a sync
        assert!(!config.sync_config().owns_tags);
        assert_eq!(config.require_snapshot().unwrap(), &PathBuf::from("/data/snapshot.json"));

        let firestore = config.firestore().unwrap();
        assert_eq!(firestore.project_id, "stocks-app");
        assert_eq!(firestore.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = RunnerConfig::from_lookup(lookup(&[(ENV_WORKER_COUNT, "many")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ENV_WORKER_COUNT, .. }));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = RunnerConfig::from_lookup(lookup(&[(ENV_DATA_ROOT, "  ")])).unwrap();
        assert_eq!(config.require_data_root(), Err(ConfigError::Missing(ENV_DATA_ROOT)));
    }
}
