//! Field types and field descriptors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::keys::check_keys;
use super::Schema;
use crate::core::error::ValidationErrors;

/// Closed set of document value types.
///
/// Unknown tags deserialize into [`FieldType::Other`] so that a bad
/// schema is reported as a validation error instead of a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Bool,
    Keyword,
    Text,
    Slice,
    Map,
    /// unsigned 64-bit
    UnsignedLong,
    /// signed 64-bit
    Long,
    /// signed 32-bit
    Integer,
    /// signed 16-bit
    Short,
    /// signed 8-bit
    Byte,
    /// 64-bit float
    Double,
    /// 32-bit float
    Float,
    /// Internal "every field" sentinel. Never valid in a schema.
    All,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::Bool => "bool",
            FieldType::Keyword => "keyword",
            FieldType::Text => "text",
            FieldType::Slice => "slice",
            FieldType::Map => "map",
            FieldType::UnsignedLong => "unsigned_long",
            FieldType::Long => "long",
            FieldType::Integer => "integer",
            FieldType::Short => "short",
            FieldType::Byte => "byte",
            FieldType::Double => "double",
            FieldType::Float => "float",
            FieldType::All => "all",
            FieldType::Other(tag) => tag,
        }
    }

    /// Membership in the user-assignable set.
    pub fn is_valid(&self) -> bool {
        !matches!(self, FieldType::All | FieldType::Other(_))
    }

    /// Container types hold nested child fields.
    pub fn is_container(&self) -> bool {
        matches!(self, FieldType::Slice | FieldType::Map)
    }
}

impl From<String> for FieldType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "bool" => FieldType::Bool,
            "keyword" => FieldType::Keyword,
            "text" => FieldType::Text,
            "slice" => FieldType::Slice,
            "map" => FieldType::Map,
            "unsigned_long" => FieldType::UnsignedLong,
            "long" => FieldType::Long,
            "integer" => FieldType::Integer,
            "short" => FieldType::Short,
            "byte" => FieldType::Byte,
            "double" => FieldType::Double,
            "float" => FieldType::Float,
            "all" => FieldType::All,
            _ => FieldType::Other(tag),
        }
    }
}

impl From<&str> for FieldType {
    fn from(tag: &str) -> Self {
        FieldType::from(tag.to_string())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed descriptor of one document attribute.
///
/// Children are owned outright, so a field tree never shares nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Name of an analyzer chain in the enclosing schema (text fields only)
    #[serde(default)]
    pub analyzer: Option<String>,
    #[serde(default)]
    pub children: Option<BTreeMap<String, Field>>,
}

impl Field {
    pub fn new(field_type: impl Into<FieldType>, required: bool) -> Self {
        Self {
            field_type: field_type.into(),
            required,
            analyzer: None,
            children: None,
        }
    }

    pub fn text(analyzer: impl Into<String>, required: bool) -> Self {
        Self {
            analyzer: Some(analyzer.into()),
            ..Self::new(FieldType::Text, required)
        }
    }

    pub fn with_children(
        field_type: impl Into<FieldType>,
        required: bool,
        children: BTreeMap<String, Field>,
    ) -> Self {
        Self {
            children: Some(children),
            ..Self::new(field_type, required)
        }
    }

    /// Child fields, empty when none are declared.
    pub fn children(&self) -> impl Iterator<Item = (&String, &Field)> {
        self.children.iter().flat_map(|c| c.iter())
    }

    pub fn has_children(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Check this field (and its subtree) against `schema`, recording
    /// failures under `path`.
    pub fn validate(&self, path: &str, schema: &Schema, errors: &mut ValidationErrors) {
        if let Some(children) = &self.children {
            let children_path = format!("{path}.children");
            check_keys(&children_path, children.keys(), errors);
            for (name, child) in children {
                child.validate(&format!("{children_path}.{name}"), schema, errors);
            }
        }

        if !self.field_type.is_valid() {
            errors.push(
                format!("{path}.type"),
                format!("invalid field type {:?}", self.field_type.as_str()),
            );
        }

        if self.field_type == FieldType::Text {
            match self.analyzer.as_deref() {
                None | Some("") => {
                    errors.push(format!("{path}.analyzer"), "text fields require an analyzer")
                }
                Some(name) if !schema.analyzers.contains_key(name) => {
                    errors.push(format!("{path}.analyzer"), format!("unknown analyzer {name:?}"))
                }
                Some(_) => {}
            }
        }

        if self.field_type.is_container() && !self.has_children() {
            errors.push(
                format!("{path}.children"),
                format!("type {:?} must have children defined", self.field_type.as_str()),
            );
        } else if !self.field_type.is_container() && self.has_children() {
            errors.push(
                format!("{path}.children"),
                format!("type {:?} cannot have children fields", self.field_type.as_str()),
            );
        }
    }
}
