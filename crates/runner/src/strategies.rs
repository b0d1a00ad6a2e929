use std::path::Path;

use firestocks_core::Fields;
use firestocks_ports::{SourceError, SourceResult};
use log::debug;

/// Every `*.json` file directly under `dir` as one document, by file name
pub fn load_strategies(dir: &Path) -> SourceResult<Vec<Fields>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .iter()
        .map(|path| -> SourceResult<Fields> {
            let content = std::fs::read_to_string(path)?;
            let document: Fields = serde_json::from_str(&content).map_err(|e| {
                SourceError::Malformed(format!("{}: {}", path.display(), e))
            })?;
            debug!("Loaded strategy {}", path.display());
            Ok(document)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loads_json_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), r#"{"name": "Momentum"}"#).unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"name": "DividendKings"}"#).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let docs = load_strategies(dir.path()).unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["name"], json!("DividendKings"));
        assert_eq!(docs[1]["name"], json!("Momentum"));
    }

    #[test]
    fn test_non_object_strategy_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "[1, 2]").unwrap();

        assert!(matches!(
            load_strategies(dir.path()),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_strategies(&dir.path().join("absent")),
            Err(SourceError::Io(_))
        ));
    }
}
