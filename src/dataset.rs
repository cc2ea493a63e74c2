// src/dataset.rs
// ============================================================================
// DATASET LOADER - JSON Lines (un ejemplo por línea)
// ============================================================================
//
// Reads the whole file up front; the auditor holds the dataset and every
// derived sequence in memory at once. Fine for the intended scale
// (thousands of short conversations).
//
// Load failures are fatal: a dataset that cannot be parsed line-by-line
// produces no report.
//
// ============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}, line {line}: invalid JSON: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("empty dataset: {path} contains no records")]
    Empty { path: PathBuf },
}

/// Loads a JSONL dataset: one self-contained JSON value per line.
///
/// Records are kept as raw JSON values so the schema validator can tally
/// defective shapes instead of rejecting them at parse time. Only lines
/// that are not valid JSON at all are fatal.
pub fn load_dataset(path: &Path) -> Result<Vec<Value>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut dataset = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let record: Value = serde_json::from_str(line).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        dataset.push(record);
    }

    if dataset.is_empty() {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    log::debug!("loaded {} records from {}", dataset.len(), path.display());

    Ok(dataset)
}
