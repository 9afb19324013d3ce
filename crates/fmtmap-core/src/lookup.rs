//! Key to display value tables with an explicit default.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use fmtmap_model::{FormatError, LookupKey, Result};

/// Immutable mapping from discrete keys to display values.
///
/// Built once through [`LookupTable::builder`], queried many times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    entries: BTreeMap<LookupKey, String>,
    default: Option<String>,
    case_insensitive: bool,
}

impl LookupTable {
    pub fn builder() -> LookupTableBuilder {
        LookupTableBuilder::default()
    }

    /// Returns the mapped value, falling back to the default.
    ///
    /// # Errors
    ///
    /// [`FormatError::MissingDefault`] when the key is absent and no default was
    /// configured.
    pub fn get(&self, key: impl Into<LookupKey>) -> Result<&str> {
        let key = key.into();
        self.find(&key)
            .or(self.default.as_deref())
            .ok_or_else(|| FormatError::MissingDefault {
                key: key.to_string(),
            })
    }

    /// Returns the mapped value without consulting the default.
    pub fn try_get(&self, key: impl Into<LookupKey>) -> Option<&str> {
        self.find(&key.into())
    }

    pub fn contains(&self, key: impl Into<LookupKey>) -> bool {
        self.find(&key.into()).is_some()
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order. Case-insensitive tables yield upper-cased text keys.
    pub fn iter(&self) -> impl Iterator<Item = (&LookupKey, &str)> {
        self.entries.iter().map(|(key, value)| (key, value.as_str()))
    }

    fn find(&self, key: &LookupKey) -> Option<&str> {
        let found = if self.case_insensitive {
            self.entries.get(&key.folded())
        } else {
            self.entries.get(key)
        };
        found.map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LookupTableBuilder {
    entries: Vec<(LookupKey, String)>,
    default: Option<String>,
    case_insensitive: bool,
}

impl LookupTableBuilder {
    #[must_use]
    pub fn entry(mut self, key: impl Into<LookupKey>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<LookupKey>,
        V: Into<String>,
    {
        self.entries.extend(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into())),
        );
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Match text keys ignoring case. Integer keys are unaffected.
    #[must_use]
    pub fn case_insensitive(mut self, enable: bool) -> Self {
        self.case_insensitive = enable;
        self
    }

    /// Builds the table.
    ///
    /// A key repeated with the same value is collapsed into one entry.
    ///
    /// # Errors
    ///
    /// [`FormatError::DuplicateKey`] when a key is repeated with a different value.
    pub fn build(self) -> Result<LookupTable> {
        let mut entries = BTreeMap::new();
        for (key, value) in self.entries {
            let key = if self.case_insensitive {
                key.folded()
            } else {
                key
            };
            match entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
                Entry::Occupied(slot) if *slot.get() == value => {}
                Entry::Occupied(slot) => {
                    return Err(FormatError::DuplicateKey {
                        key: slot.key().to_string(),
                        existing: slot.get().clone(),
                        incoming: value,
                    });
                }
            }
        }
        Ok(LookupTable {
            entries,
            default: self.default,
            case_insensitive: self.case_insensitive,
        })
    }
}
