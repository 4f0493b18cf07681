//! Snapshot files
//!
//! Writes go through a temporary file and a rename, so a crash never leaves
//! a half-written snapshot behind.

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::config::EngineConfig;
use crate::errors::{EntsError, Result};
use crate::ops::Tree;
use crate::{log_op_end, log_op_error, log_op_start};

use super::format::TreeSnapshot;

/// Serialize a Tree as pretty-printed JSON
///
/// # Errors
///
/// Returns `Serialization` if encoding fails.
pub fn to_json(tree: &Tree) -> Result<String> {
    Ok(serde_json::to_string_pretty(&tree.to_snapshot())?)
}

/// Parse and validate a Tree from JSON
///
/// # Errors
///
/// * `Serialization` - If the text is not a snapshot document
/// * `InvalidSnapshot` - If the document is inconsistent
pub fn from_json(text: &str, config: EngineConfig) -> Result<Tree> {
    let snapshot: TreeSnapshot = serde_json::from_str(text)?;
    Tree::from_snapshot(&snapshot, config)
}

/// Read a snapshot document without rebuilding a Tree
///
/// # Errors
///
/// * `Io` - If the file cannot be read
/// * `Serialization` - If the text is not a snapshot document
pub fn read_snapshot(path: &Path) -> Result<TreeSnapshot> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Write a Tree snapshot to `path`, creating parent directories
///
/// # Errors
///
/// Returns `Io` or `Serialization` on failure. An existing file at `path` is
/// left intact when writing fails.
pub fn save(tree: &Tree, path: &Path) -> Result<()> {
    let start = Instant::now();
    log_op_start!("save", path = %path.display());

    let result = write_atomic(tree, path);
    match &result {
        Ok(()) => {
            log_op_end!(
                "save",
                duration_ms = start.elapsed().as_millis() as u64,
                ents = tree.ent_count()
            );
        }
        Err(err) => {
            log_op_error!(
                "save",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}

fn write_atomic(tree: &Tree, path: &Path) -> Result<()> {
    let text = to_json(tree)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, text)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Read and validate a Tree snapshot from `path`
///
/// # Errors
///
/// * `Io` - If the file cannot be read
/// * `Serialization` / `InvalidSnapshot` - As [`from_json`]
pub fn load(path: &Path, config: EngineConfig) -> Result<Tree> {
    let start = Instant::now();
    log_op_start!("load", path = %path.display());

    let result = fs::read_to_string(path)
        .map_err(EntsError::from)
        .and_then(|text| from_json(&text, config));
    match &result {
        Ok(tree) => {
            log_op_end!(
                "load",
                duration_ms = start.elapsed().as_millis() as u64,
                ents = tree.ent_count()
            );
        }
        Err(err) => {
            log_op_error!(
                "load",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    result
}
