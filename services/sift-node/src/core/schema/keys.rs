//! Identifier rules for schema map keys.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::error::ValidationErrors;

/// Pattern every field, child and analyzer name must match.
pub const KEY_PATTERN: &str = "^[A-Za-z0-9_]+$";

static KEY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(KEY_PATTERN).unwrap());

pub fn is_valid_key(key: &str) -> bool {
    KEY_REGEX.is_match(key)
}

/// Record one error under `path` for every key that is empty or does
/// not match [`KEY_PATTERN`].
pub(crate) fn check_keys<'a>(
    path: &str,
    keys: impl IntoIterator<Item = &'a String>,
    errors: &mut ValidationErrors,
) {
    for key in keys {
        if key.is_empty() {
            errors.push(path, "empty keys not allowed");
        } else if !is_valid_key(key) {
            errors.push(path, format!("key {key:?} does not match {KEY_PATTERN:?}"));
        }
    }
}
