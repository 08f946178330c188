//! Index metadata store.
//!
//! An [`Index`] is a named schema plus its creation time. The
//! [`IndexStore`] validates indexes before they reach durable storage
//! and answers document validation and analysis requests against them.

use std::io::{Read, Write};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::analysis::AnalyzerRegistry;
use crate::core::error::{Result, SiftError, ValidationErrors};
use crate::core::schema::{FieldType, Schema};
use crate::core::storage::{KeyValueStore, SnapshotStore};

/// Pattern index names must match.
pub const INDEX_NAME_PATTERN: &str = "^[A-Za-z0-9_][A-Za-z0-9_.-]*$";

static INDEX_NAME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(INDEX_NAME_PATTERN).unwrap());

/// A named schema and its creation metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub schema: Schema,
}

impl Index {
    /// New index stamped with the current time.
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            schema,
        }
    }

    pub fn validate(&self, registry: &AnalyzerRegistry) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.name.is_empty() {
            errors.push("name", "name is required");
        } else if !INDEX_NAME_REGEX.is_match(&self.name) {
            errors.push(
                "name",
                format!("name {:?} does not match {INDEX_NAME_PATTERN:?}", self.name),
            );
        }

        if let Err(schema_errors) = self.schema.validate(registry) {
            errors.extend_prefixed("schema", schema_errors);
        }

        errors.into_result()
    }
}

/// Request body for index creation: `{"schema": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIndexRequest {
    pub schema: Schema,
}

/// Outcome of restoring indexes from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: Vec<String>,
    /// Names that already existed and were left untouched
    pub skipped: Vec<String>,
}

/// Index definitions keyed by name, over any [`KeyValueStore`].
pub struct IndexStore<S> {
    store: S,
    analyzers: Arc<AnalyzerRegistry>,
}

impl<S: KeyValueStore<String, Index>> IndexStore<S> {
    pub fn new(store: S, analyzers: Arc<AnalyzerRegistry>) -> Self {
        Self { store, analyzers }
    }

    /// Underlying key/value store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn analyzers(&self) -> &AnalyzerRegistry {
        &self.analyzers
    }

    /// Validate `schema` and store it as a new index named `name`.
    pub fn create_index(&self, name: &str, schema: Schema) -> Result<Index> {
        let index = Index::new(name, schema);
        self.create(index.clone())?;
        Ok(index)
    }

    /// Validate and store `index`. Fails with `AlreadyExists` on a name
    /// collision, leaving the stored index unchanged.
    pub fn create(&self, index: Index) -> Result<()> {
        index.validate(&self.analyzers)?;
        let name = index.name.clone();
        self.store.create(name.clone(), index)?;
        tracing::info!(index = %name, "Index created");
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Index> {
        self.store.get(&name.to_string())
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        self.store.delete(&name.to_string())?;
        tracing::info!(index = %name, "Index deleted");
        Ok(())
    }

    /// Every index, sorted by name.
    pub fn list(&self) -> Vec<Index> {
        let mut indexes = self.store.all();
        indexes.sort_by(|a, b| a.name.cmp(&b.name));
        indexes
    }

    /// Check a decoded document against the named index's schema.
    pub fn validate_document(&self, name: &str, doc: &Map<String, Value>) -> Result<()> {
        let index = self.get(name)?;
        index.schema.validate_document(doc)?;
        Ok(())
    }

    /// Run `text` through the analyzer chain of the text field at
    /// `field_path` (dotted for nested fields).
    pub fn analyze(&self, name: &str, field_path: &str, text: &str) -> Result<Vec<String>> {
        let index = self.get(name)?;
        let field = index.schema.field(field_path).ok_or_else(|| {
            SiftError::NotFound(format!("field {field_path:?} in index {name:?}"))
        })?;
        if field.field_type != FieldType::Text {
            return Err(SiftError::InvalidRequest(format!(
                "field {field_path:?} has type {:?}, only text fields are analyzed",
                field.field_type.as_str()
            )));
        }
        let chain_name = field.analyzer.as_deref().unwrap_or_default();
        let chain = index.schema.build_chain(chain_name, &self.analyzers)?;
        Ok(chain.analyze(text))
    }

    /// Write every index to `writer` as one snapshot. Returns the count.
    pub fn export_snapshot<W: Write>(&self, writer: W) -> Result<usize> {
        let snapshot: SnapshotStore<String, Index> = self
            .store
            .all()
            .into_iter()
            .map(|index| (index.name.clone(), index))
            .collect();
        snapshot.save(writer)?;
        tracing::info!(indexes = snapshot.len(), "Snapshot exported");
        Ok(snapshot.len())
    }

    /// Create every index held in the snapshot read from `reader`.
    ///
    /// Existing names are skipped. Creation times are preserved.
    pub fn import_snapshot<R: Read>(&self, reader: R) -> Result<ImportReport> {
        let snapshot: SnapshotStore<String, Index> = SnapshotStore::new();
        snapshot.load(reader)?;

        let mut entries = snapshot.entries();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut report = ImportReport::default();
        for (name, index) in entries {
            match self.create(index) {
                Ok(()) => report.imported.push(name),
                Err(err) if err.is_conflict() => report.skipped.push(name),
                Err(err) => return Err(err),
            }
        }
        tracing::info!(
            imported = report.imported.len(),
            skipped = report.skipped.len(),
            "Snapshot imported"
        );
        Ok(report)
    }
}
