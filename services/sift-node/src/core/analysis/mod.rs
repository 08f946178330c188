//! Text analysis pipelines.
//!
//! An analyzer turns a sequence of tokens into another sequence of
//! tokens. Analyzers are declared as `{type, settings}` pairs, built
//! through an [`AnalyzerRegistry`], and composed left to right into an
//! [`AnalyzerChain`].
//!
//! # Architecture
//!
//! - **analyzer**: Declarative `Analyzer` and its opaque `Settings`
//! - **filters**: Built-in token filters (nop, dedup, whitespace, regexp)
//! - **registry**: Type tag to constructor mapping
//! - **chain**: Non-empty ordered composition of built filters

mod analyzer;
mod chain;
mod filters;
mod registry;

pub use analyzer::{Analyzer, AnalyzerType, Settings};
pub use chain::{AnalyzerChain, AnalyzerChainDef};
pub use filters::{DedupFilter, NopFilter, PatternSplitFilter, WhitespaceFilter};
pub use registry::{AnalyzerRegistry, FilterConstructor};

/// A single token transformation step.
pub trait TokenFilter: Send + Sync {
    fn apply(&self, tokens: Vec<String>) -> Vec<String>;
}
