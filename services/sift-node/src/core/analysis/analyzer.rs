//! Declarative analyzer configuration.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::registry::AnalyzerRegistry;
use super::TokenFilter;
use crate::core::error::Result;

/// Tag naming a transformation kind.
///
/// The built-in tags are exposed as constants. Any other tag can be
/// registered on an [`AnalyzerRegistry`] instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalyzerType(String);

impl AnalyzerType {
    /// Returns tokens unchanged
    pub const NOP: &'static str = "nop";
    /// Drops repeated tokens, keeping the first occurrence
    pub const DEDUP: &'static str = "dedup";
    /// Splits every token on whitespace runs
    pub const WHITESPACE: &'static str = "whitespace";
    /// Splits every token on a regular expression
    pub const REGEXP: &'static str = "regexp";

    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnalyzerType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl fmt::Display for AnalyzerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Analyzer settings, opaque until the analyzer is built.
///
/// In JSON the settings are a plain object (`null` reads as empty).
/// Binary formats cannot carry arbitrary JSON values, so there the
/// object is embedded as JSON text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings(BTreeMap<String, Value>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for Settings {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

impl Serialize for Settings {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            self.0.serialize(serializer)
        } else {
            let text = serde_json::to_string(&self.0).map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&text)
        }
    }
}

impl<'de> Deserialize<'de> for Settings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let map = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
            Ok(Self(map.unwrap_or_default()))
        } else {
            let text = String::deserialize(deserializer)?;
            serde_json::from_str(&text).map(Self).map_err(D::Error::custom)
        }
    }
}

/// A named, configurable token transformation step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analyzer {
    #[serde(rename = "type")]
    pub kind: AnalyzerType,
    #[serde(default)]
    pub settings: Settings,
}

impl Analyzer {
    pub fn new(kind: impl Into<AnalyzerType>, settings: Settings) -> Self {
        Self {
            kind: kind.into(),
            settings,
        }
    }

    /// Build the filter this analyzer describes.
    pub fn build(&self, registry: &AnalyzerRegistry) -> Result<Box<dyn TokenFilter>> {
        registry.construct(&self.kind, &self.settings)
    }

    /// Check that the analyzer builds, discarding the filter.
    pub fn validate(&self, registry: &AnalyzerRegistry) -> Result<()> {
        self.build(registry).map(|_| ())
    }
}
