//! Decoded attribute values and item snapshots.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;

use super::secret::SecretBytes;

/// A decoded attribute value.
///
/// Built by the coercion rules only; getters unwrap it into plain Rust types.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    /// Attribute missing, or set to the all-zero sentinel
    Absent,

    /// UTF-8 text (e.g. `label`, `account`)
    Text(String),

    /// Uninterpreted bytes (e.g. `creator`, `type`)
    Binary(Vec<u8>),

    /// Decimal integer (`port`)
    Integer(u32),

    /// Store date (`creation_date`, `modified_date`)
    Timestamp(DateTime<Utc>),

    /// The protected payload
    Secret(SecretBytes),
}

impl DecodedValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, DecodedValue::Absent)
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            DecodedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_binary(self) -> Option<Vec<u8>> {
        match self {
            DecodedValue::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn into_integer(self) -> Option<u32> {
        match self {
            DecodedValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_timestamp(self) -> Option<DateTime<Utc>> {
        match self {
            DecodedValue::Timestamp(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DecodedValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Every attribute of an item plus its secret, in export order.
///
/// Built fresh on each request and detached from the native item.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    entries: IndexMap<&'static str, DecodedValue>,
}

impl Snapshot {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, key: &'static str, value: DecodedValue) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&DecodedValue> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &DecodedValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<&'static str, DecodedValue> {
        self.entries
    }
}
