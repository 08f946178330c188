//! Unified service container for sift
//!
//! The composition root: owns the analyzer registry and the index
//! store, and hands them to every adapter.

use crate::core::analysis::AnalyzerRegistry;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::indexes::{Index, IndexStore};
use crate::core::storage::{AppendLog, ReplayOutcome};
use std::fs;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Index store backed by the on-disk append log
pub type DurableIndexStore = IndexStore<AppendLog<String, Index>>;

/// Unified services container
///
/// All adapters use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Analyzer kinds available to schemas
    pub analyzers: Arc<AnalyzerRegistry>,

    /// Durable index definitions
    pub indexes: Arc<DurableIndexStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Open the index log named by `config`, creating the data
    /// directory if needed. Call [`Services::replay`] before serving.
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.storage.data_dir)?;

        let analyzers = Arc::new(AnalyzerRegistry::builtin());
        let log = AppendLog::open(config.storage.index_log_path())?
            .with_sync_writes(config.storage.sync_writes);
        let indexes = Arc::new(IndexStore::new(log, Arc::clone(&analyzers)));

        Ok(Self {
            analyzers,
            indexes,
            config: Arc::new(config),
        })
    }

    /// Rebuild index state from the log.
    pub fn replay(&self, cancel: &AtomicBool) -> Result<ReplayOutcome> {
        self.indexes.store().replay(cancel)
    }

    /// True once the index log has been fully replayed
    pub fn is_ready(&self) -> bool {
        self.indexes.store().is_ready()
    }
}
