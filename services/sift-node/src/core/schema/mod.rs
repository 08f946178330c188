//! Schema type system and validation.
//!
//! # Architecture
//!
//! - **field**: `FieldType` (closed) and recursive `Field` descriptors
//! - **definition**: `Schema`, its self-validation and path lookup
//! - **document**: Validation of decoded documents against a schema
//! - **keys**: Identifier rules for map keys
//!
//! Validation never short-circuits; callers receive the full set of
//! `(path, message)` pairs.

mod definition;
mod document;
mod field;
mod keys;

pub use definition::Schema;
pub use document::validate_document;
pub use field::{Field, FieldType};
pub use keys::{is_valid_key, KEY_PATTERN};
