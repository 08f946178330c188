//! Schema: named fields plus named analyzer chains.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::document;
use super::field::Field;
use super::keys::check_keys;
use crate::core::analysis::{AnalyzerChain, AnalyzerChainDef, AnalyzerRegistry};
use crate::core::error::{Result, SiftError, ValidationErrors};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub analyzers: BTreeMap<String, AnalyzerChainDef>,
    #[serde(default)]
    pub fields: BTreeMap<String, Field>,
}

impl Schema {
    pub fn new(
        fields: BTreeMap<String, Field>,
        analyzers: BTreeMap<String, AnalyzerChainDef>,
    ) -> Self {
        Self { analyzers, fields }
    }

    /// Validate structure, key names, analyzer chains and every field.
    ///
    /// All failures are collected; nothing stops at the first problem.
    pub fn validate(&self, registry: &AnalyzerRegistry) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.fields.is_empty() {
            errors.push("fields", "at least one field is required");
        }
        check_keys("fields", self.fields.keys(), &mut errors);
        check_keys("analyzers", self.analyzers.keys(), &mut errors);

        for (name, chain) in &self.analyzers {
            let path = format!("analyzers.{name}.analyzers");
            if chain.analyzers.is_empty() {
                errors.push(path, "chain cannot be empty");
                continue;
            }
            for (i, analyzer) in chain.analyzers.iter().enumerate() {
                if let Err(err) = analyzer.validate(registry) {
                    errors.push(format!("{path}[{i}]"), config_message(err));
                }
            }
        }

        for (name, field) in &self.fields {
            field.validate(&format!("fields.{name}"), self, &mut errors);
        }

        errors.into_result()
    }

    /// Check a decoded document against this schema.
    pub fn validate_document(
        &self,
        doc: &Map<String, Value>,
    ) -> std::result::Result<(), ValidationErrors> {
        document::validate_document(&self.fields, doc)
    }

    /// Resolve a dotted field path (`author.name`) through map and slice
    /// children.
    pub fn field(&self, path: &str) -> Option<&Field> {
        let mut parts = path.split('.');
        let mut field = self.fields.get(parts.next()?)?;
        for part in parts {
            field = field.children.as_ref()?.get(part)?;
        }
        Some(field)
    }

    /// Build the analyzer chain registered under `name`.
    pub fn build_chain(&self, name: &str, registry: &AnalyzerRegistry) -> Result<AnalyzerChain> {
        self.analyzers
            .get(name)
            .ok_or_else(|| SiftError::NotFound(format!("analyzer {name:?}")))?
            .build(registry)
    }
}

fn config_message(err: SiftError) -> String {
    match err {
        SiftError::AnalyzerConfig(message) => message,
        other => other.to_string(),
    }
}
