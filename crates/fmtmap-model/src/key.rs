use std::fmt;

use serde::{Deserialize, Serialize};

/// Key of a lookup table entry.
///
/// Text and integer keys never compare equal: `Int(1)` does not match `Text("1")`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupKey {
    Int(i64),
    Text(String),
}

impl LookupKey {
    /// Upper-cases text keys; integer keys are returned unchanged.
    pub fn folded(&self) -> LookupKey {
        match self {
            LookupKey::Int(n) => LookupKey::Int(*n),
            LookupKey::Text(s) => LookupKey::Text(s.to_uppercase()),
        }
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupKey::Int(n) => write!(f, "{n}"),
            LookupKey::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for LookupKey {
    fn from(value: &str) -> Self {
        LookupKey::Text(value.to_string())
    }
}

impl From<String> for LookupKey {
    fn from(value: String) -> Self {
        LookupKey::Text(value)
    }
}

impl From<&String> for LookupKey {
    fn from(value: &String) -> Self {
        LookupKey::Text(value.clone())
    }
}

impl From<i64> for LookupKey {
    fn from(value: i64) -> Self {
        LookupKey::Int(value)
    }
}

impl From<i32> for LookupKey {
    fn from(value: i32) -> Self {
        LookupKey::Int(i64::from(value))
    }
}
