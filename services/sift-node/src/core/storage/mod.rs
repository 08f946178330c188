//! Durable key/value storage.
//!
//! Two persistence modes share the [`KeyValueStore`] interface:
//!
//! - **AppendLog**: every mutation appended to a JSON-lines log and
//!   replayed at startup
//! - **SnapshotStore**: in-memory map written and restored whole, on
//!   demand, as one bincode envelope
//!
//! A given store instance uses exactly one mode.
//!
//! # Log Layout
//!
//! ```text
//! {data_dir}/
//! └── indexes.dat     # one LogRecord per line
//! ```

mod append_log;
mod record;
mod snapshot;

use std::fmt::Display;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::error::Result;

pub use append_log::{AppendLog, ReplayOutcome};
pub use record::LogRecord;
pub use snapshot::{SnapshotStore, SNAPSHOT_VERSION};

/// Bounds every store key satisfies.
pub trait StoreKey:
    Eq + Hash + Clone + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> StoreKey for T where
    T: Eq + Hash + Clone + Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Bounds every stored value satisfies.
pub trait StoreValue: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> StoreValue for T where T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {}

/// Linearizable key/value operations.
pub trait KeyValueStore<K, V>: Send + Sync {
    /// Insert a new key. Fails with `AlreadyExists` if present.
    fn create(&self, key: K, value: V) -> Result<()>;

    /// Fails with `NotFound` if absent.
    fn get(&self, key: &K) -> Result<V>;

    /// Fails with `NotFound` if absent.
    fn delete(&self, key: &K) -> Result<()>;

    /// Current values, order unspecified.
    fn all(&self) -> Vec<V>;
}
