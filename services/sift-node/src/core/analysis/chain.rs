//! Ordered composition of analyzers.

use serde::{Deserialize, Serialize};

use super::{Analyzer, AnalyzerRegistry, TokenFilter};
use crate::core::error::{Result, SiftError};

/// A named chain as it appears in a schema: `{"analyzers": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerChainDef {
    #[serde(default)]
    pub analyzers: Vec<Analyzer>,
}

impl AnalyzerChainDef {
    pub fn new(analyzers: Vec<Analyzer>) -> Self {
        Self { analyzers }
    }

    pub fn build(&self, registry: &AnalyzerRegistry) -> Result<AnalyzerChain> {
        AnalyzerChain::build(&self.analyzers, registry)
    }
}

/// Built filters applied left to right; the output of one feeds the next.
pub struct AnalyzerChain {
    filters: Vec<Box<dyn TokenFilter>>,
}

impl AnalyzerChain {
    /// Build every analyzer in order. The chain must not be empty.
    pub fn build(items: &[Analyzer], registry: &AnalyzerRegistry) -> Result<Self> {
        if items.is_empty() {
            return Err(SiftError::AnalyzerConfig(
                "chain cannot be empty".to_string(),
            ));
        }
        let filters = items
            .iter()
            .map(|analyzer| analyzer.build(registry))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { filters })
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run a single piece of text through the chain.
    pub fn analyze(&self, text: &str) -> Vec<String> {
        self.apply(vec![text.to_string()])
    }
}

impl TokenFilter for AnalyzerChain {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        self.filters
            .iter()
            .fold(tokens, |tokens, filter| filter.apply(tokens))
    }
}

impl std::fmt::Debug for AnalyzerChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerChain")
            .field("filters", &self.filters.len())
            .finish()
    }
}
