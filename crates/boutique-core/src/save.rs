//! Persistence seam: named JSON blobs behind a key-value store.
//!
//! The core never touches the filesystem. Embedders provide a [`SaveStore`]
//! (browser storage, a save directory, a test map) and the driver pushes
//! serialized ledgers through it after every mutation batch.

use std::collections::HashMap;

/// One logical store per persisted subsystem. The string form is the
/// storage key, shared by every store implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Game,
    Inventory,
    Achievements,
    Upgrades,
    Tutorials,
}

impl StoreKey {
    pub const ALL: [StoreKey; 5] = [
        StoreKey::Game,
        StoreKey::Inventory,
        StoreKey::Achievements,
        StoreKey::Upgrades,
        StoreKey::Tutorials,
    ];

    /// The stable storage key for this store.
    pub fn key(self) -> &'static str {
        match self {
            StoreKey::Game => "boutique-game",
            StoreKey::Inventory => "boutique-inventory",
            StoreKey::Achievements => "boutique-achievements",
            StoreKey::Upgrades => "boutique-upgrades",
            StoreKey::Tutorials => "boutique-tutorials",
        }
    }
}

/// Synchronous blob storage. `load` returns `None` for a missing or
/// unreadable blob; `save` is fire-and-forget, so a failing backend
/// degrades to "progress not saved" rather than an error the player sees.
pub trait SaveStore {
    fn load(&self, key: StoreKey) -> Option<String>;
    fn save(&mut self, key: StoreKey, blob: &str);
}

/// In-memory store for tests and embedders without durable storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blobs: HashMap<StoreKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: StoreKey) -> bool {
        self.blobs.contains_key(&key)
    }
}

impl SaveStore for MemoryStore {
    fn load(&self, key: StoreKey) -> Option<String> {
        self.blobs.get(&key).cloned()
    }

    fn save(&mut self, key: StoreKey, blob: &str) {
        self.blobs.insert(key, blob.to_string());
    }
}
