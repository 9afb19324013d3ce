//! Serialized catalog of lookup tables and bin specs.
//!
//! A catalog plays the role of a SAS format library: one JSON document that
//! names every value mapping a job needs. Validation of the contents happens
//! when the catalog is built in `fmtmap-core`; this module only describes the
//! shape of the document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::key::LookupKey;

/// Which side of each interval is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Closed {
    /// Intervals `[a, b)`.
    Left,
    /// Intervals `(a, b]`.
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    #[serde(default)]
    pub lookups: Vec<LookupConfig>,
    #[serde(default)]
    pub bins: Vec<BinConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupConfig {
    pub name: String,
    /// Entries in declaration order. Kept as a list so duplicates reach validation.
    pub entries: Vec<LookupEntry>,
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub case_insensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LookupEntry {
    pub key: LookupKey,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BinConfig {
    pub name: String,
    pub boundaries: Boundaries,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    pub closed: Closed,
    pub include_outer: bool,
    /// Prepend a `-inf` sentinel.
    #[serde(default)]
    pub open_below: bool,
    /// Append a `+inf` sentinel.
    #[serde(default)]
    pub open_above: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Boundaries {
    Numbers(Vec<f64>),
    Dates(Vec<NaiveDate>),
}

impl CatalogConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn is_empty(&self) -> bool {
        self.lookups.is_empty() && self.bins.is_empty()
    }
}
