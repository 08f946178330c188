//! Output formatting for CLI commands
//!
//! Provides utilities for formatting command output in human-readable
//! or JSON formats. Supports colored output (respects NO_COLOR env var).

use std::error::Error;

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::error::{FieldError, SiftError};

/// Color scheme for CLI output
pub mod colors {
    use colored::{ColoredString, Colorize};

    /// Style for labels/headers
    pub fn label(s: &str) -> ColoredString {
        s.bold()
    }

    /// Style for index names
    pub fn index_name(s: &str) -> ColoredString {
        s.cyan()
    }

    /// Style for field paths
    pub fn field_path(s: &str) -> ColoredString {
        s.blue()
    }

    /// Style for type tags
    pub fn field_type(s: &str) -> ColoredString {
        s.magenta()
    }

    /// Style for numbers/counts
    pub fn number(s: &str) -> ColoredString {
        s.yellow()
    }

    /// Style for success messages
    pub fn success(s: &str) -> ColoredString {
        s.green()
    }

    /// Style for warning messages
    pub fn warning(s: &str) -> ColoredString {
        s.yellow()
    }

    /// Style for error messages
    pub fn error(s: &str) -> ColoredString {
        s.red().bold()
    }

    /// Style for dim/secondary text
    pub fn dim(s: &str) -> ColoredString {
        s.dimmed()
    }
}

/// Error body shared by every command in JSON mode.
///
/// `status` follows the request-layer mapping (409, 404, 422, 400, 500).
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        match err.downcast_ref::<SiftError>() {
            Some(SiftError::Validation(errors)) => Self {
                message: "Validation error".to_string(),
                status: 422,
                errors: errors.iter().cloned().collect(),
            },
            Some(sift) => Self {
                message: sift.message(),
                status: sift.status_code(),
                errors: Vec::new(),
            },
            None => Self {
                message: err.to_string(),
                status: 500,
                errors: Vec::new(),
            },
        }
    }
}

/// Format bytes into human-readable size
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

/// Format relative time (e.g., "2h ago", "3d ago")
pub fn format_relative_time(timestamp: &chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let duration = now.signed_duration_since(*timestamp);

    let secs = duration.num_seconds();
    if secs < 0 {
        return "in the future".to_string();
    }

    let mins = duration.num_minutes();
    let hours = duration.num_hours();
    let days = duration.num_days();

    if days > 0 {
        format!("{days}d ago")
    } else if hours > 0 {
        format!("{hours}h ago")
    } else if mins > 0 {
        format!("{mins}m ago")
    } else {
        "just now".to_string()
    }
}

/// Print a JSON document to stdout
pub fn print_json<T: Serialize>(data: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Report a failed command in the requested format
pub fn print_failure(err: &(dyn Error + 'static), format: OutputFormat) {
    let response = ErrorResponse::from_error(err);
    match format {
        OutputFormat::Human => {
            print_error(&response.message);
            for field in &response.errors {
                eprintln!(
                    "  {}: {}",
                    colors::field_path(&field.path),
                    field.message
                );
            }
        }
        OutputFormat::Json => {
            if let Err(e) = print_json(&response) {
                print_error(&e.to_string());
            }
        }
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{}: {}", colors::warning("Warning"), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{}: {}", colors::error("Error"), message);
}

/// Print a header/title
pub fn print_header(title: &str) {
    println!("{}", colors::label(title));
}
