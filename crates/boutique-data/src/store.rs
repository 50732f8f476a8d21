//! File-backed save store: one `<key>.json` per logical store.

use std::path::{Path, PathBuf};

use boutique_core::save::{SaveStore, StoreKey};

/// A [`SaveStore`] that keeps each store as a JSON file in one directory.
///
/// Loading a missing or unreadable file yields `None` (fresh state); saving
/// swallows I/O errors so a full disk or read-only directory can never take
/// the game down mid-wave.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    dir: PathBuf,
}

impl FileSaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.key()))
    }
}

impl SaveStore for FileSaveStore {
    fn load(&self, key: StoreKey) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn save(&mut self, key: StoreKey, blob: &str) {
        let _ = std::fs::create_dir_all(&self.dir);
        let _ = std::fs::write(self.path_for(key), blob);
    }
}
