//! Analyze command - show the tokens a text field's analyzer chain produces

use std::sync::Arc;

use clap::Args;
use serde::Serialize;

use crate::cli::output::{colors, print_json};
use crate::cli::OutputFormat;
use crate::core::services::Services;

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Index name
    pub index: String,

    /// Text field path (dotted for nested fields, e.g. `author.bio`)
    pub field: String,

    /// Text to analyze
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub index: String,
    pub field: String,
    pub count: usize,
    pub tokens: Vec<String>,
}

pub async fn execute(
    args: AnalyzeArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let tokens = services
        .indexes
        .analyze(&args.index, &args.field, &args.text)?;

    let response = AnalyzeResponse {
        index: args.index,
        field: args.field,
        count: tokens.len(),
        tokens,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} ({}):",
                colors::label("Tokens"),
                colors::number(&response.count.to_string())
            );
            for (position, token) in response.tokens.iter().enumerate() {
                println!("  {:>3}  {}", colors::dim(&position.to_string()), token);
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
