//! Path-to-mtime snapshot for change detection.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Last-observed modification timestamps for watched files.
///
/// Created empty at poller start, updated in place on every poll cycle,
/// never persisted across restarts.
#[derive(Debug, Default)]
pub struct Snapshot {
    entries: HashMap<PathBuf, SystemTime>,
}

impl Snapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observation of `path` at `mtime`.
    ///
    /// Returns `true` (a change) when the path is new or its timestamp
    /// is strictly newer than the stored value; the stored entry is
    /// updated in the same step. An equal or older timestamp is not a
    /// change and leaves the entry untouched.
    pub fn observe(&mut self, path: &Path, mtime: SystemTime) -> bool {
        match self.entries.get_mut(path) {
            Some(stored) if mtime > *stored => {
                *stored = mtime;
                true
            }
            Some(_) => false,
            None => {
                self.entries.insert(path.to_path_buf(), mtime);
                true
            }
        }
    }

    /// Number of tracked paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no paths are tracked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
