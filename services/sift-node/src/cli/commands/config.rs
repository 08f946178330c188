//! Config command - show the effective configuration and analyzer kinds

use std::sync::Arc;

use clap::Args;
use serde::Serialize;

use crate::cli::output::{colors, print_header, print_json};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::xdg::XdgDirs;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Also show XDG directories and the config file location
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub storage: StorageInfo,
    pub logging: LoggingInfo,
    pub analyzer_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paths: Option<PathsInfo>,
}

#[derive(Debug, Serialize)]
pub struct StorageInfo {
    pub data_dir: String,
    pub index_log: String,
    pub sync_writes: bool,
    pub ready: bool,
}

#[derive(Debug, Serialize)]
pub struct LoggingInfo {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Serialize)]
pub struct PathsInfo {
    pub config_dir: String,
    pub config_file: String,
    pub xdg_data_dir: String,
}

/// Assemble the response shown by `show-config`.
pub fn build_response(services: &Services, all: bool) -> ConfigResponse {
    let config = &services.config;

    let paths = all.then(|| {
        let xdg = XdgDirs::new();
        PathsInfo {
            config_dir: xdg.config_dir.display().to_string(),
            config_file: xdg.config_file().display().to_string(),
            xdg_data_dir: xdg.data_dir.display().to_string(),
        }
    });

    ConfigResponse {
        storage: StorageInfo {
            data_dir: config.storage.data_dir.display().to_string(),
            index_log: config.storage.index_log_path().display().to_string(),
            sync_writes: config.storage.sync_writes,
            ready: services.is_ready(),
        },
        logging: LoggingInfo {
            level: config.logging.level.clone(),
            format: format!("{:?}", config.logging.format).to_lowercase(),
        },
        analyzer_types: services
            .analyzers
            .kinds()
            .into_iter()
            .map(|kind| kind.to_string())
            .collect(),
        paths,
    }
}

pub async fn execute(
    args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = build_response(services, args.all);

    match format {
        OutputFormat::Human => {
            print_header("Configuration:");
            println!("  storage:");
            println!("    data_dir: {}", response.storage.data_dir);
            println!("    index_log: {}", response.storage.index_log);
            println!("    sync_writes: {}", response.storage.sync_writes);
            println!("  logging:");
            println!("    level: {}", response.logging.level);
            println!("    format: {}", response.logging.format);
            println!(
                "  analyzer types: {}",
                colors::field_type(&response.analyzer_types.join(", "))
            );
            if let Some(paths) = &response.paths {
                println!("  paths:");
                println!("    config_dir: {}", colors::dim(&paths.config_dir));
                println!("    config_file: {}", colors::dim(&paths.config_file));
                println!("    xdg_data_dir: {}", colors::dim(&paths.xdg_data_dir));
            }
        }
        OutputFormat::Json => print_json(&response)?,
    }

    Ok(())
}
