//! Validate-document command - check a JSON document against an index schema

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;
use serde_json::{Map, Value};

use super::read_source;
use crate::cli::output::{colors, print_json};
use crate::cli::OutputFormat;
use crate::core::error::SiftError;
use crate::core::services::Services;

#[derive(Args, Debug)]
pub struct DocumentArgs {
    /// Index name
    pub index: String,

    /// JSON document file (`-` reads stdin)
    #[arg(long, short = 'd', value_name = "FILE")]
    pub document: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub index: String,
    pub valid: bool,
}

/// Decode `text` as a JSON object. Anything else is a bad request.
pub fn parse_document(text: &str) -> Result<Map<String, Value>, SiftError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(SiftError::InvalidRequest(format!(
            "document must be a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(SiftError::InvalidRequest(format!("malformed document: {e}"))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

pub async fn execute(
    args: DocumentArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_source(&args.document)?;
    let document = parse_document(&text)?;

    services.indexes.validate_document(&args.index, &document)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} document matches index '{}'",
                colors::success("Valid:"),
                colors::index_name(&args.index)
            );
        }
        OutputFormat::Json => print_json(&DocumentResponse {
            index: args.index,
            valid: true,
        })?,
    }

    Ok(())
}
