//! CLI adapter for sift
//!
//! Exposes index management, document validation and text analysis on
//! the command line. Depends on `core/`; nothing in `core/` depends on it.
//!
//! # Startup
//!
//! Every command except `completions` loads configuration, installs
//! logging, opens the index log and replays it. Ctrl-C during replay
//! cancels it, and a cancelled replay aborts the command. Ctrl-C after
//! replay exits with [`EXIT_INTERRUPTED`].

pub mod commands;
pub mod output;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::task::JoinHandle;

use crate::core::config::Config;
use crate::core::logging;
use crate::core::services::Services;
use crate::core::storage::ReplayOutcome;
use crate::core::xdg::XdgDirs;

/// sift - schema registry for a document-search node
///
/// Define typed index schemas with analyzer chains, validate documents
/// against them, and keep index definitions durable across restarts.
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(version)]
#[command(about = "Schema registry for a document-search node", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all indexes
    #[command(name = "list-indexes")]
    ListIndexes(commands::index::ListArgs),

    /// Show one index and its schema
    #[command(name = "get-index")]
    GetIndex(commands::index::GetArgs),

    /// Create an index from a `{"schema": {...}}` body
    #[command(name = "create-index")]
    CreateIndex(commands::index::CreateArgs),

    /// Delete an index
    #[command(name = "delete-index")]
    DeleteIndex(commands::index::DeleteArgs),

    /// Validate a JSON document against an index schema
    #[command(name = "validate-document")]
    ValidateDocument(commands::DocumentArgs),

    /// Run text through the analyzer chain of a text field
    Analyze(commands::AnalyzeArgs),

    /// Write every index to a binary snapshot file
    #[command(name = "export-snapshot")]
    ExportSnapshot(commands::snapshot::ExportArgs),

    /// Create indexes from a snapshot file, skipping existing names
    #[command(name = "import-snapshot")]
    ImportSnapshot(commands::snapshot::ImportArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  sift completions bash > ~/.local/share/bash-completion/completions/sift
    ///   zsh:   sift completions zsh > ~/.zfunc/_sift
    ///   fish:  sift completions fish > ~/.config/fish/completions/sift.fish
    Completions(commands::CompletionsArgs),
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let config = Config::load()?;
    if let Err(e) = logging::init(&config.logging) {
        output::print_warning(&e.to_string());
    }
    config.log_config();
    XdgDirs::new().log_paths();

    let interrupt = Interrupt::install();
    let services = Arc::new(Services::open(config)?);
    replay_with_interrupt(&services, &interrupt).await?;

    match cli.command {
        Commands::ListIndexes(args) => {
            commands::index::execute_list(args, &services, cli.format).await
        }
        Commands::GetIndex(args) => {
            commands::index::execute_get(args, &services, cli.format).await
        }
        Commands::CreateIndex(args) => {
            commands::index::execute_create(args, &services, cli.format).await
        }
        Commands::DeleteIndex(args) => {
            commands::index::execute_delete(args, &services, cli.format).await
        }
        Commands::ValidateDocument(args) => {
            commands::document::execute(args, &services, cli.format).await
        }
        Commands::Analyze(args) => commands::analyze::execute(args, &services, cli.format).await,
        Commands::ExportSnapshot(args) => {
            commands::snapshot::execute_export(args, &services, cli.format).await
        }
        Commands::ImportSnapshot(args) => {
            commands::snapshot::execute_import(args, &services, cli.format).await
        }
        Commands::ShowConfig(args) => {
            commands::config::execute(args, &services, cli.format).await
        }
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}

/// Exit status after Ctrl-C (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// Ctrl-C handling for the lifetime of one command.
///
/// Until [`Interrupt::replay_finished`] is called, Ctrl-C only raises the
/// cancel flag handed to replay. Afterwards it exits the process with
/// [`EXIT_INTERRUPTED`]. Once tokio owns SIGINT the default handler is gone
/// for good, so the watcher has to stay alive until the command returns.
pub struct Interrupt {
    cancel: Arc<AtomicBool>,
    replayed: Arc<AtomicBool>,
    watcher: JoinHandle<()>,
}

impl Interrupt {
    pub fn install() -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let replayed = Arc::new(AtomicBool::new(false));

        let cancel_flag = Arc::clone(&cancel);
        let replayed_flag = Arc::clone(&replayed);
        let watcher = tokio::spawn(async move {
            loop {
                if tokio::signal::ctrl_c().await.is_err() {
                    return;
                }
                if replayed_flag.load(Ordering::SeqCst) {
                    tracing::info!("Interrupted");
                    std::process::exit(EXIT_INTERRUPTED);
                }
                tracing::info!("Cancelling index log replay");
                cancel_flag.store(true, Ordering::SeqCst);
            }
        });

        Self {
            cancel,
            replayed,
            watcher,
        }
    }

    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::SeqCst)
    }

    /// Switch Ctrl-C from cancelling replay to exiting the process.
    pub fn replay_finished(&self) {
        self.replayed.store(true, Ordering::SeqCst);
    }

    pub fn is_replay_finished(&self) -> bool {
        self.replayed.load(Ordering::SeqCst)
    }
}

impl Drop for Interrupt {
    fn drop(&mut self) {
        self.watcher.abort();
    }
}

/// Replay the index log on a blocking thread while Ctrl-C may cancel it.
pub async fn replay_with_interrupt(
    services: &Arc<Services>,
    interrupt: &Interrupt,
) -> Result<ReplayOutcome, Box<dyn std::error::Error>> {
    let replay_services = Arc::clone(services);
    let replay_flag = interrupt.cancel_flag();
    let outcome =
        tokio::task::spawn_blocking(move || replay_services.replay(&replay_flag)).await??;

    match outcome {
        ReplayOutcome::Cancelled { records } => Err(format!(
            "Index log replay interrupted after {records} records; not ready to serve"
        )
        .into()),
        completed => {
            interrupt.replay_finished();
            Ok(completed)
        }
    }
}
