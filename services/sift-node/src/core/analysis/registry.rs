//! Analyzer constructor registry.

use std::collections::HashMap;

use super::filters::{DedupFilter, NopFilter, PatternSplitFilter, WhitespaceFilter};
use super::{AnalyzerType, Settings, TokenFilter};
use crate::core::error::{Result, SiftError};

/// Builds a filter from its settings, or rejects the settings.
pub type FilterConstructor = fn(&Settings) -> Result<Box<dyn TokenFilter>>;

/// Mapping from analyzer type tag to constructor.
///
/// Constructed once by the composition root and shared by reference.
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    constructors: HashMap<AnalyzerType, FilterConstructor>,
}

impl std::fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

impl AnalyzerRegistry {
    /// An empty registry with no kinds at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding every built-in analyzer kind.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(AnalyzerType::NOP, NopFilter::from_settings);
        registry.register(AnalyzerType::DEDUP, DedupFilter::from_settings);
        registry.register(AnalyzerType::WHITESPACE, WhitespaceFilter::from_settings);
        registry.register(AnalyzerType::REGEXP, PatternSplitFilter::from_settings);
        registry
    }

    /// Register (or replace) the constructor for `kind`.
    pub fn register(&mut self, kind: impl Into<AnalyzerType>, constructor: FilterConstructor) {
        self.constructors.insert(kind.into(), constructor);
    }

    pub fn contains(&self, kind: &AnalyzerType) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Registered type tags, sorted.
    pub fn kinds(&self) -> Vec<&AnalyzerType> {
        let mut kinds: Vec<_> = self.constructors.keys().collect();
        kinds.sort();
        kinds
    }

    pub(crate) fn construct(
        &self,
        kind: &AnalyzerType,
        settings: &Settings,
    ) -> Result<Box<dyn TokenFilter>> {
        let constructor = self.constructors.get(kind).ok_or_else(|| {
            SiftError::AnalyzerConfig(format!("unknown analyzer type {:?}", kind.as_str()))
        })?;
        constructor(settings)
    }
}
