//! Whole-state snapshot store.
//!
//! Mutations stay in memory. The full map is written with
//! [`SnapshotStore::save`] and restored with [`SnapshotStore::load`],
//! each a single bincode envelope.

use std::collections::HashMap;
use std::hash::Hash;
use std::io::{Read, Write};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreKey, StoreValue};
use crate::core::error::{Result, SiftError};

/// Envelope layout version. Bump on incompatible changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, K, V> {
    version: u32,
    items: &'a HashMap<K, V>,
}

#[derive(Deserialize)]
struct Envelope<K: Eq + Hash, V> {
    version: u32,
    items: HashMap<K, V>,
}

pub struct SnapshotStore<K, V> {
    items: RwLock<HashMap<K, V>>,
}

impl<K: StoreKey, V: StoreValue> SnapshotStore<K, V> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Every entry, in no particular order.
    pub fn entries(&self) -> Vec<(K, V)> {
        self.items
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Write the whole map in one call.
    pub fn save<W: Write>(&self, writer: W) -> Result<()> {
        let items = self.items.read();
        bincode::serialize_into(
            writer,
            &EnvelopeRef {
                version: SNAPSHOT_VERSION,
                items: &*items,
            },
        )?;
        Ok(())
    }

    /// Replace the whole map with the one read from `reader`. On error the
    /// current contents are left as they were.
    pub fn load<R: Read>(&self, mut reader: R) -> Result<usize> {
        // Decode from memory so corrupt length prefixes fail on bounds
        // instead of driving huge allocations.
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let envelope: Envelope<K, V> = bincode::deserialize(&bytes)?;
        if envelope.version != SNAPSHOT_VERSION {
            return Err(SiftError::CorruptData(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                envelope.version
            )));
        }
        let count = envelope.items.len();
        *self.items.write() = envelope.items;
        Ok(count)
    }
}

impl<K: StoreKey, V: StoreValue> Default for SnapshotStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StoreKey, V: StoreValue> FromIterator<(K, V)> for SnapshotStore<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            items: RwLock::new(iter.into_iter().collect()),
        }
    }
}

impl<K: StoreKey, V: StoreValue> KeyValueStore<K, V> for SnapshotStore<K, V> {
    fn create(&self, key: K, value: V) -> Result<()> {
        let mut items = self.items.write();
        if items.contains_key(&key) {
            return Err(SiftError::AlreadyExists(key.to_string()));
        }
        items.insert(key, value);
        Ok(())
    }

    fn get(&self, key: &K) -> Result<V> {
        self.items
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| SiftError::NotFound(key.to_string()))
    }

    fn delete(&self, key: &K) -> Result<()> {
        self.items
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| SiftError::NotFound(key.to_string()))
    }

    fn all(&self) -> Vec<V> {
        self.items.read().values().cloned().collect()
    }
}
