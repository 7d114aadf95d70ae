//! On-disk snapshot store.
//!
//! One JSON array per username, pretty-printed, non-ASCII preserved
//! literally. The store is both a cache (skip refetching) and the deletion
//! engine's checkpoint: it is rewritten after every successful delete, so a
//! crash loses at most one operation's progress.
//!
//! Store failures never propagate: a failed save reports `false`, a failed
//! load reports an empty collection, both with the cause logged. The
//! snapshot is a best-effort mirror, not a transaction log.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::repost::Repost;

/// Persistence seam for the deletion engine.
pub trait RepostStore {
    /// Overwrite the snapshot for `username`. Returns false on any failure.
    fn save(&self, reposts: &[Repost], username: &str) -> bool;

    /// Load the snapshot for `username`. Missing or malformed snapshots read
    /// as empty.
    fn load(&self, username: &str) -> Vec<Repost>;
}

/// The on-disk JSON store.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    dir: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Snapshot path for a username: `<dir>/reposts_<username>.json`.
    pub fn path_for(&self, username: &str) -> PathBuf {
        self.dir.join(format!("reposts_{username}.json"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RepostStore for JsonSnapshotStore {
    fn save(&self, reposts: &[Repost], username: &str) -> bool {
        let path = self.path_for(username);

        if let Err(e) = fs::create_dir_all(&self.dir) {
            error!(dir = %self.dir.display(), error = %e, "could not create snapshot directory");
            return false;
        }

        let json = match serde_json::to_string_pretty(reposts) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "could not encode snapshot");
                return false;
            }
        };

        match fs::write(&path, json) {
            Ok(()) => {
                debug!(count = reposts.len(), path = %path.display(), "snapshot saved");
                true
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "could not write snapshot");
                false
            }
        }
    }

    fn load(&self, username: &str) -> Vec<Repost> {
        let path = self.path_for(username);

        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                error!(path = %path.display(), error = %e, "snapshot not readable");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Repost>>(&json) {
            Ok(reposts) => {
                info!(count = reposts.len(), path = %path.display(), "snapshot loaded");
                reposts
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "snapshot contains invalid JSON");
                Vec::new()
            }
        }
    }
}
