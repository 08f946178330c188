//! Error types and error handling for the sift node.
//!
//! Every fallible core operation returns [`Result`]. Expected outcomes
//! (duplicate keys, missing keys, validation failures) are ordinary
//! variants; the request-layer status for each variant is available via
//! [`SiftError::status_code`].

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias for sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

/// Main error type for the sift node
#[derive(Error, Debug)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Analyzer configuration error: {0}")]
    AnalyzerConfig(String),

    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Element already exists: {0}")]
    AlreadyExists(String),

    #[error("Element not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Corrupt data: {0}")]
    CorruptData(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Snapshot encoding error: {0}")]
    SnapshotError(#[from] bincode::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl From<ValidationErrors> for SiftError {
    fn from(errors: ValidationErrors) -> Self {
        SiftError::Validation(errors)
    }
}

impl SiftError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        matches!(self, SiftError::NotFound(_))
    }

    /// Check if this is a conflict error (already exists)
    pub fn is_conflict(&self) -> bool {
        matches!(self, SiftError::AlreadyExists(_))
    }

    /// Check if this is a per-field validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, SiftError::Validation(_))
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            SiftError::AnalyzerConfig(_) | SiftError::InvalidRequest(_)
        )
    }

    /// Status code the request layer answers with for this error.
    pub fn status_code(&self) -> u16 {
        if self.is_conflict() {
            409
        } else if self.is_not_found() {
            404
        } else if self.is_validation() {
            422
        } else if self.is_bad_request() {
            400
        } else {
            500
        }
    }

    /// Field-level entries carried by a validation error, empty otherwise.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            SiftError::Validation(errors) => &errors.errors,
            _ => &[],
        }
    }
}

/// One `(path, message)` pair produced by schema or document validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(rename = "field")]
    pub path: String,
    #[serde(rename = "error")]
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Collected validation failures. Validation never stops at the first
/// problem; callers get every failing path at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Append every entry of `other`, prefixing its paths with `prefix`.
    pub fn extend_prefixed(&mut self, prefix: &str, other: ValidationErrors) {
        for err in other.errors {
            let path = if err.path.is_empty() {
                prefix.to_string()
            } else {
                format!("{prefix}.{}", err.path)
            };
            self.errors.push(FieldError {
                path,
                message: err.message,
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// True when some entry is reported against exactly `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.errors.iter().any(|e| e.path == path)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}
