//! Built-in token filters.

use std::collections::HashSet;

use regex::Regex;
use serde_json::Value;

use super::{Settings, TokenFilter};
use crate::core::error::{Result, SiftError};

/// Returns the input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopFilter;

impl NopFilter {
    pub fn from_settings(_settings: &Settings) -> Result<Box<dyn TokenFilter>> {
        Ok(Box::new(NopFilter))
    }
}

impl TokenFilter for NopFilter {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
    }
}

/// Keeps the first occurrence of each token, in input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DedupFilter;

impl DedupFilter {
    pub fn from_settings(_settings: &Settings) -> Result<Box<dyn TokenFilter>> {
        Ok(Box::new(DedupFilter))
    }
}

impl TokenFilter for DedupFilter {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        let mut seen = HashSet::with_capacity(tokens.len());
        tokens
            .into_iter()
            .filter(|token| seen.insert(token.clone()))
            .collect()
    }
}

/// Splits every token on runs of Unicode whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceFilter;

impl WhitespaceFilter {
    pub fn from_settings(_settings: &Settings) -> Result<Box<dyn TokenFilter>> {
        Ok(Box::new(WhitespaceFilter))
    }
}

impl TokenFilter for WhitespaceFilter {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .iter()
            .flat_map(|token| token.split_whitespace())
            .map(str::to_string)
            .collect()
    }
}

/// Splits every token on matches of a regular expression.
#[derive(Debug, Clone)]
pub struct PatternSplitFilter {
    pattern: Regex,
}

impl PatternSplitFilter {
    /// The only setting this filter accepts.
    pub const PATTERN_KEY: &'static str = "pattern";

    pub fn new(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(SiftError::AnalyzerConfig(format!(
                "{:?} key must be provided",
                Self::PATTERN_KEY
            )));
        }
        let pattern = Regex::new(pattern)
            .map_err(|e| SiftError::AnalyzerConfig(format!("invalid pattern: {e}")))?;
        Ok(Self { pattern })
    }

    pub fn from_settings(settings: &Settings) -> Result<Box<dyn TokenFilter>> {
        if let Some(key) = settings.keys().find(|k| *k != Self::PATTERN_KEY) {
            return Err(SiftError::AnalyzerConfig(format!(
                "key {key:?} is not allowed"
            )));
        }
        let pattern = match settings.get(Self::PATTERN_KEY) {
            None => "",
            Some(Value::String(pattern)) => pattern.as_str(),
            Some(other) => {
                return Err(SiftError::AnalyzerConfig(format!(
                    "{:?} must be a string, got {other}",
                    Self::PATTERN_KEY
                )))
            }
        };
        Ok(Box::new(Self::new(pattern)?))
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl TokenFilter for PatternSplitFilter {
    fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        tokens
            .iter()
            .flat_map(|token| self.pattern.split(token))
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect()
    }
}
