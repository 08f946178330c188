//! sift CLI - schema registry for a document-search node
//!
//! # Examples
//!
//! ```bash
//! # Create an index from a request body
//! sift create-index articles --body articles.json
//!
//! # Validate a document
//! sift validate-document articles --document doc.json
//!
//! # See what the title field's analyzer chain produces
//! sift analyze articles title "the quick brown fox"
//!
//! # Machine-readable output
//! sift --format json list-indexes
//! ```

use clap::Parser;
use sift::cli::{output, run, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    if let Err(e) = run(cli).await {
        output::print_failure(&*e, format);
        std::process::exit(1);
    }
}
