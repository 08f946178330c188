//! sift - schema registry for a document-search node
//!
//! Lets a caller define named, typed document schemas (nested field
//! types plus text analyzer chains), validates schemas and documents
//! against them, and keeps index definitions durable across restarts.
//!
//! # Architecture
//!
//! - **core**: Domain logic (transport-agnostic)
//!   - analysis (analyzer registry, token filter chains)
//!   - schema (field types, schema and document validation)
//!   - storage (append-only log, snapshots)
//!   - indexes (index metadata store)
//!   - config, error, logging, xdg, services
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Durability
//!
//! Index creation and deletion are appended to a JSON-lines log before
//! memory changes. Startup replays the log; a torn final record left by
//! a crash is discarded.

// Core domain logic (transport-agnostic)
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, SiftError, ValidationErrors};
pub use core::indexes::{Index, IndexStore};
pub use core::schema::{Field, FieldType, Schema};
pub use core::services::Services;
