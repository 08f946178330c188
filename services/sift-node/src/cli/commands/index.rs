//! Index commands - list, get, create and delete index definitions
//!
//! - `list-indexes`
//! - `get-index <name>`
//! - `create-index <name> --body <file>` where the file holds `{"schema": {...}}`
//! - `delete-index <name> [--force]`

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;

use super::read_source;
use crate::cli::output::{colors, format_relative_time, print_json};
use crate::cli::OutputFormat;
use crate::core::error::SiftError;
use crate::core::indexes::{CreateIndexRequest, Index};
use crate::core::schema::Field;
use crate::core::services::Services;

#[derive(Args, Debug)]
pub struct ListArgs {}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Index name
    pub name: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Index name
    pub name: String,

    /// JSON request body file (`-` reads stdin)
    #[arg(long, short = 'b', value_name = "FILE")]
    pub body: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Index name
    pub name: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct IndexListItem {
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub fields: usize,
    pub analyzers: usize,
}

#[derive(Debug, Serialize)]
pub struct IndexListResponse {
    pub count: usize,
    pub indexes: Vec<IndexListItem>,
}

impl IndexListResponse {
    pub fn from_indexes(indexes: &[Index]) -> Self {
        Self {
            count: indexes.len(),
            indexes: indexes
                .iter()
                .map(|index| IndexListItem {
                    name: index.name.clone(),
                    created_at: index.created_at.to_rfc3339(),
                    fields: index.schema.fields.len(),
                    analyzers: index.schema.analyzers.len(),
                })
                .collect(),
        }
    }
}

/// Indented lines describing a field tree, one per field.
pub fn render_fields(fields: &BTreeMap<String, Field>, depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, field) in fields {
        let mut line = format!(
            "{}{} {}",
            "  ".repeat(depth),
            colors::field_path(name),
            colors::field_type(field.field_type.as_str())
        );
        if field.required {
            line.push_str(" required");
        }
        if let Some(analyzer) = &field.analyzer {
            line.push_str(&format!(" analyzer={analyzer}"));
        }
        lines.push(line);

        if let Some(children) = &field.children {
            lines.extend(render_fields(children, depth + 1));
        }
    }
    lines
}

pub async fn execute_list(
    _args: ListArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let indexes = services.indexes.list();
    let response = IndexListResponse::from_indexes(&indexes);

    match format {
        OutputFormat::Human => {
            if indexes.is_empty() {
                println!(
                    "No indexes found. Run '{}' to create one.",
                    colors::label("sift create-index <name> --body <file>")
                );
            } else {
                println!(
                    "{} ({}):",
                    colors::label("Indexes"),
                    colors::number(&response.count.to_string())
                );
                for index in &indexes {
                    println!(
                        "  {:<24} {:>4} fields  {:>3} analyzers  {}",
                        colors::index_name(&index.name),
                        colors::number(&index.schema.fields.len().to_string()),
                        colors::number(&index.schema.analyzers.len().to_string()),
                        colors::dim(&format_relative_time(&index.created_at))
                    );
                }
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}

pub async fn execute_get(
    args: GetArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = services.indexes.get(&args.name)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{}: {}",
                colors::label("Index"),
                colors::index_name(&index.name)
            );
            println!(
                "  {}: {}",
                colors::label("Created"),
                colors::dim(&index.created_at.to_rfc3339())
            );
            println!("  {}:", colors::label("Analyzers"));
            for (name, chain) in &index.schema.analyzers {
                let kinds: Vec<&str> = chain.analyzers.iter().map(|a| a.kind.as_str()).collect();
                println!(
                    "    {} [{}]",
                    colors::field_path(name),
                    colors::field_type(&kinds.join(" -> "))
                );
            }
            println!("  {}:", colors::label("Fields"));
            for line in render_fields(&index.schema.fields, 2) {
                println!("{line}");
            }
        }
        OutputFormat::Json => print_json(&index)?,
    }

    Ok(())
}

pub async fn execute_create(
    args: CreateArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = read_source(&args.body)?;
    let request: CreateIndexRequest = serde_json::from_str(&body)
        .map_err(|e| SiftError::InvalidRequest(format!("malformed request body: {e}")))?;

    let index = services.indexes.create_index(&args.name, request.schema)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} index '{}' ({} fields)",
                colors::success("Created"),
                colors::index_name(&index.name),
                colors::number(&index.schema.fields.len().to_string())
            );
        }
        OutputFormat::Json => print_json(&index)?,
    }

    Ok(())
}

pub async fn execute_delete(
    args: DeleteArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // Surface NotFound before prompting
    services.indexes.get(&args.name)?;

    if !args.force {
        print!("Delete index '{}'? [y/N] ", colors::index_name(&args.name));
        io::stdout().flush()?;

        // Off the runtime workers so the Ctrl-C watcher still gets scheduled
        let input = tokio::task::spawn_blocking(|| {
            let mut input = String::new();
            io::stdin().read_line(&mut input).map(|_| input)
        })
        .await??;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    services.indexes.delete(&args.name)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} index '{}'",
                colors::success("Deleted"),
                colors::index_name(&args.name)
            );
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "deleted": true,
                "index": args.name
            });
            print_json(&response)?;
        }
    }

    Ok(())
}
