//! Per-user storage of built indexes
//!
//! Indexes live under the platform app data directory so a corpus can be
//! indexed once and searched from anywhere. Each corpus gets its own
//! subdirectory named from the corpus directory name plus a path hash.

use anyhow::{Context, Result};
use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "pfi";

/// Get the application data directory for storing indexes
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

/// Get the index directory for a specific corpus root
pub fn get_index_dir(corpus_path: &Path) -> Result<PathBuf> {
    let app_data = get_app_data_dir()?;
    let indexes_dir = app_data.join("indexes");
    fs::create_dir_all(&indexes_dir)?;

    let folder_name = hash_path(corpus_path);
    Ok(indexes_dir.join(folder_name))
}

/// Check if a corpus has an existing index
pub fn is_indexed(corpus_path: &Path) -> Result<bool> {
    let index_dir = get_index_dir(corpus_path)?;
    Ok(index_dir.join(crate::index::META_FILE).exists())
}

/// Remove the index for a corpus
pub fn remove_index(corpus_path: &Path) -> Result<()> {
    let index_dir = get_index_dir(corpus_path)?;
    if index_dir.exists() {
        fs::remove_dir_all(&index_dir)?;
    }
    Ok(())
}

/// Hash a path to create a unique folder name
/// Format: first 16 chars of dir name + hash
fn hash_path(path: &Path) -> String {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let path_str = canonical.to_string_lossy();

    let dir_name = canonical
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown");

    let sanitized: String = dir_name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .take(16)
        .collect();

    let mut hasher = DefaultHasher::new();
    path_str.hash(&mut hasher);
    let hash = hasher.finish();

    format!("{sanitized}-{hash:016x}")
}
