//! JSON blob persistence for the driver's ledgers.
//!
//! Every logical store is one serde-JSON blob under one `StoreKey`. A
//! missing or unreadable blob loads as the default value: a corrupted
//! save must never brick the game, that store just starts fresh.

use serde::Serialize;
use serde::de::DeserializeOwned;

use boutique_core::save::{SaveStore, StoreKey};

/// Loads one store, falling back to the default on any failure.
pub(crate) fn load_or_default<T>(store: &impl SaveStore, key: StoreKey) -> T
where
    T: DeserializeOwned + Default,
{
    store
        .load(key)
        .and_then(|blob| serde_json::from_str(&blob).ok())
        .unwrap_or_default()
}

/// Serializes and writes one store. A value that fails to serialize is
/// skipped, leaving the previous blob in place.
pub(crate) fn save<T: Serialize>(store: &mut impl SaveStore, key: StoreKey, value: &T) {
    if let Ok(blob) = serde_json::to_string(value) {
        store.save(key, &blob);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
