//! Core domain logic (transport-agnostic)
//!
//! # Architecture
//!
//! - **analysis**: Analyzer registry and token filter chains
//! - **schema**: Field type system, schema and document validation
//! - **storage**: Append-log and snapshot key/value stores
//! - **indexes**: Index definitions over a key/value store
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **logging**: Tracing subscriber setup
//! - **xdg**: XDG directory handling
//! - **services**: Unified service container

pub mod analysis;
pub mod config;
pub mod error;
pub mod indexes;
pub mod logging;
pub mod schema;
pub mod services;
pub mod storage;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, SiftError};
pub use services::Services;
