//! Subcommand implementations.

pub mod delete;
pub mod fetch;
pub mod show;

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use unrepost::JsonSnapshotStore;

/// Build the snapshot store, defaulting to the platform data directory.
pub fn snapshot_store(dir: Option<&PathBuf>) -> Result<JsonSnapshotStore> {
    let dir = match dir {
        Some(dir) => dir.clone(),
        None => ProjectDirs::from("", "", "unrepost")
            .context("Could not determine data directory")?
            .data_dir()
            .to_path_buf(),
    };
    Ok(JsonSnapshotStore::new(dir))
}
