//! Snapshot commands - export and import every index as one binary file

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use serde::Serialize;

use crate::cli::output::{colors, format_bytes, print_json};
use crate::cli::OutputFormat;
use crate::core::indexes::ImportReport;
use crate::core::services::Services;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Snapshot file to write
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Snapshot file to read
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub path: String,
    pub indexes: usize,
    pub size_bytes: u64,
}

pub async fn execute_export(
    args: ExportArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(File::create(&args.path)?);
    let count = services.indexes.export_snapshot(&mut writer)?;
    writer.flush()?;

    let response = ExportResponse {
        path: args.path.display().to_string(),
        indexes: count,
        size_bytes: fs::metadata(&args.path)?.len(),
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} indexes to {} ({})",
                colors::success("Exported"),
                colors::number(&response.indexes.to_string()),
                response.path,
                colors::number(&format_bytes(response.size_bytes))
            );
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}

pub async fn execute_import(
    args: ImportArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let reader = BufReader::new(File::open(&args.path)?);
    let report: ImportReport = services.indexes.import_snapshot(reader)?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} indexes",
                colors::success("Imported"),
                colors::number(&report.imported.len().to_string())
            );
            for name in &report.imported {
                println!("  {}", colors::index_name(name));
            }
            if !report.skipped.is_empty() {
                println!(
                    "{} {} existing indexes",
                    colors::warning("Skipped"),
                    colors::number(&report.skipped.len().to_string())
                );
                for name in &report.skipped {
                    println!("  {}", colors::dim(name));
                }
            }
        }
        OutputFormat::Json => print_json(&report)?,
    }

    Ok(())
}
