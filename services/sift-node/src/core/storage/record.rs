//! Log record format.
//!
//! One JSON object per line:
//!
//! ```text
//! {"key":"products","value":{...}}
//! {"key":"products","isDeleted":true}
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord<K, V> {
    pub key: K,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<V>,
    #[serde(rename = "isDeleted", default, skip_serializing_if = "is_false")]
    pub is_deleted: bool,
}

impl<K, V> LogRecord<K, V> {
    pub fn upsert(key: K, value: V) -> Self {
        Self {
            key,
            value: Some(value),
            is_deleted: false,
        }
    }

    pub fn tombstone(key: K) -> Self {
        Self {
            key,
            value: None,
            is_deleted: true,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
