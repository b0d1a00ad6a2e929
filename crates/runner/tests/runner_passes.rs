//! Integration test: App <-> MemoryStore
//!
//! Runs the CLI passes against files on disk:
//! snapshot.json / DATA_ROOT -> App -> SyncEngine -> MemoryStore -> tags.json

use std::path::Path;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use firestocks_clock::FixedClock;
use firestocks_memstore::MemoryStore;
use firestocks_runner::{App, ConfigError, RunnerConfig, RunnerError, Tasks, WorkerShard};
use serde_json::{Value, json};
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{
    "instruments": [
        {"name": "adidas AG", "country": "Germany", "symbols_eur": ["ADS.F"],
         "symbols_usd": ["ADDYY"], "tags": ["Apparel"], "indices": ["DAX"],
         "signals": [
            {"filter_name": "DividendKings", "value": 4.1, "status": "buy"},
            {"filter_name": "DividendKings", "value": 0.0, "status": "sell"}
         ]},
        {"name": "Danone", "country": "France", "symbols_eur": ["BSN.F"],
         "tags": ["Food"], "indices": ["CAC 40"]},
        {"name": "SAP SE", "country": "Germany", "symbols_eur": ["SAP.F"],
         "tags": ["Software"], "indices": ["DAX"]}
    ],
    "prices": {
        "ADS.F": [{"date": "2024-05-02", "close": "148.5"}, {"date": "2024-05-03", "close": "150.0"}],
        "BSN.F": [{"date": "2024-05-03", "close": "58.2"}],
        "SAP.F": [{"date": "2024-05-03", "close": "171.2"}]
    }
}"#;

fn write_snapshot(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("snapshot.json");
    std::fs::write(&path, SNAPSHOT).unwrap();
    path
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 3, 18, 0, 0).unwrap()))
}

fn app(store: &Arc<MemoryStore>, config: RunnerConfig) -> App {
    App::new(store.clone(), clock(), config).unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_create_update_and_export() {
    let _ = env_logger::try_init();

    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let config = RunnerConfig {
        snapshot: Some(write_snapshot(&dir)),
        ..RunnerConfig::default()
    };
    let app = app(&store, config);
    let tags_output = dir.path().join("tags.json");

    let summary = app
        .run(&Tasks {
            create: true,
            update: true,
            ..Tasks::default()
        })
        .await
        .unwrap();

    let rebuild = summary.rebuild.unwrap();
    assert_eq!(rebuild.stocks.documents, 3);
    assert_eq!(rebuild.tags.documents, 3);
    let sync = summary.sync.unwrap();
    assert!(sync.created_missing.is_empty());
    assert_eq!(sync.updated.documents, 3);
    // ADDYY has no history
    assert_eq!(sync.diagnostics.len(), 1);

    let adidas = store
        .documents("stocks")
        .await
        .into_iter()
        .find(|doc| doc.name() == Some("adidas AG"))
        .unwrap();
    assert_eq!(adidas.fields["DividendKings_value"], json!(4.1));
    assert_eq!(adidas.fields["DividendKings_status"], json!("buy"));
    assert_eq!(adidas.fields["last_price_eur"], json!({"ADS.F": 150.0}));
    assert_eq!(adidas.fields["last_price_usd"], json!({"ADDYY": null}));
    assert_eq!(adidas.fields["date"], json!("05/03/2024"));

    app.run(&Tasks {
        tags: true,
        tags_output: tags_output.clone(),
        ..Tasks::default()
    })
    .await
    .unwrap();

    let tags = read_json(&tags_output);
    assert_eq!(tags["stocks"].as_array().unwrap().len(), 3);
    assert_eq!(tags["countries"], json!(["France", "Germany"]));
    assert_eq!(tags["indices"], json!(["CAC 40", "DAX"]));
    assert_eq!(tags["industries"], json!(["Apparel", "Food", "Software"]));
}

#[tokio::test]
async fn test_update_touches_only_own_shard() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let config = RunnerConfig {
        snapshot: Some(write_snapshot(&dir)),
        // Sorted: Danone, SAP SE, adidas AG; ceil(3 / 2) = 2 leaves worker 1 with adidas AG
        shard: WorkerShard {
            worker_id: 1,
            worker_count: 2,
        },
        ..RunnerConfig::default()
    };

    let summary = app(&store, config)
        .run(&Tasks {
            update: true,
            ..Tasks::default()
        })
        .await
        .unwrap();

    let sync = summary.sync.unwrap();
    assert_eq!(sync.created_missing, vec!["adidas AG".to_string()]);
    assert_eq!(sync.updated.documents, 1);

    let names: Vec<_> = store
        .documents("stocks")
        .await
        .iter()
        .filter_map(|doc| doc.name().map(str::to_string))
        .collect();
    assert_eq!(names, vec!["adidas AG"]);
    // Tags belong to worker 0
    assert_eq!(store.count("tags").await, 0);
}

#[tokio::test]
async fn test_refresh_after_create() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let config = RunnerConfig {
        snapshot: Some(write_snapshot(&dir)),
        ..RunnerConfig::default()
    };

    let summary = app(&store, config)
        .run(&Tasks {
            create: true,
            refresh: true,
            ..Tasks::default()
        })
        .await
        .unwrap();

    let refresh = summary.refresh.unwrap();
    assert_eq!(refresh.updated.documents, 3);
    assert_eq!(refresh.diagnostics.len(), 1);
}

#[tokio::test]
async fn test_refresh_is_left_to_worker_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(MemoryStore::new());
    let config = RunnerConfig {
        snapshot: Some(write_snapshot(&dir)),
        shard: WorkerShard {
            worker_id: 1,
            worker_count: 2,
        },
        ..RunnerConfig::default()
    };

    let summary = app(&store, config)
        .run(&Tasks {
            refresh: true,
            ..Tasks::default()
        })
        .await
        .unwrap();

    assert!(summary.refresh.is_none());
    assert_eq!(store.list_calls(), 0);
}

#[tokio::test]
async fn test_strategies_from_data_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dividend_kings.json"),
        r#"{"name": "DividendKings", "threshold_buy": 3}"#,
    )
    .unwrap();
    let store = Arc::new(MemoryStore::new());
    let config = RunnerConfig {
        data_root: Some(dir.path().to_path_buf()),
        ..RunnerConfig::default()
    };

    let summary = app(&store, config)
        .run(&Tasks {
            strategies: true,
            ..Tasks::default()
        })
        .await
        .unwrap();

    assert_eq!(summary.strategies.unwrap().documents, 1);
    let docs = store.documents("strategies").await;
    assert_eq!(docs[0].fields["threshold_buy"], json!(3));
}

#[tokio::test]
async fn test_missing_snapshot_fails_before_any_io() {
    let store = Arc::new(MemoryStore::new());

    let err = app(&store, RunnerConfig::default())
        .run(&Tasks {
            create: true,
            ..Tasks::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Config(ConfigError::Missing("FIRESTOCKS_SNAPSHOT"))
    ));
    assert_eq!(store.list_calls(), 0);
}

#[tokio::test]
async fn test_failed_update_reports_its_phase() {
    let dir = tempfile::tempdir().unwrap();
    // Commit 1 creates the missing stocks, commit 2 the tags, commit 3 is the first merge
    let store = Arc::new(MemoryStore::new().with_failing_commit(3));
    let config = RunnerConfig {
        snapshot: Some(write_snapshot(&dir)),
        ..RunnerConfig::default()
    };

    let err = app(&store, config)
        .run(&Tasks {
            update: true,
            ..Tasks::default()
        })
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("update failed"));
}
