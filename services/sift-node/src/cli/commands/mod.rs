//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod analyze;
pub mod completions;
pub mod config;
pub mod document;
pub mod index;
pub mod snapshot;

// Re-export argument types for use in mod.rs
pub use analyze::AnalyzeArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use document::DocumentArgs;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read a whole input file, or stdin when `path` is `-`.
pub fn read_source(path: &Path) -> io::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        fs::read_to_string(path)
    }
}
