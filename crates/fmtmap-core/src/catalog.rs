//! Validated collection of named lookup tables and bin specs.

use std::collections::BTreeMap;

use fmtmap_model::{BinConfig, Boundaries, CatalogConfig, FormatError, LookupConfig, Result};
use tracing::debug;

use crate::binning::{BinPolicy, BinSpec};
use crate::lookup::LookupTable;
use crate::registry::normalize_name;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatCatalog {
    lookups: BTreeMap<String, LookupTable>,
    bins: BTreeMap<String, BinSpec>,
}

impl FormatCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_config(&CatalogConfig::from_json_str(text)?)
    }

    /// Builds and validates every table and spec in `config`.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        let mut catalog = Self::new();
        for lookup in &config.lookups {
            catalog.insert_lookup(&lookup.name, build_lookup(lookup)?)?;
        }
        for bins in &config.bins {
            catalog.insert_bins(&bins.name, build_bins(bins)?)?;
        }
        debug!(
            lookups = catalog.lookups.len(),
            bins = catalog.bins.len(),
            "loaded format catalog"
        );
        Ok(catalog)
    }

    pub fn insert_lookup(&mut self, name: &str, table: LookupTable) -> Result<()> {
        let key = normalize_name(name)?;
        if self.lookups.contains_key(&key) {
            return Err(FormatError::DuplicateFormat { name: key });
        }
        self.lookups.insert(key, table);
        Ok(())
    }

    pub fn insert_bins(&mut self, name: &str, spec: BinSpec) -> Result<()> {
        let key = normalize_name(name)?;
        if self.bins.contains_key(&key) {
            return Err(FormatError::DuplicateFormat { name: key });
        }
        self.bins.insert(key, spec);
        Ok(())
    }

    pub fn lookup_table(&self, name: &str) -> Result<&LookupTable> {
        let key = normalize_name(name)?;
        self.lookups
            .get(&key)
            .ok_or(FormatError::UnknownFormat { name: key })
    }

    pub fn bin_spec(&self, name: &str) -> Result<&BinSpec> {
        let key = normalize_name(name)?;
        self.bins
            .get(&key)
            .ok_or(FormatError::UnknownFormat { name: key })
    }

    pub fn lookup_names(&self) -> impl Iterator<Item = &str> {
        self.lookups.keys().map(String::as_str)
    }

    pub fn bin_names(&self) -> impl Iterator<Item = &str> {
        self.bins.keys().map(String::as_str)
    }
}

fn build_lookup(config: &LookupConfig) -> Result<LookupTable> {
    let mut builder = LookupTable::builder()
        .entries(
            config
                .entries
                .iter()
                .map(|entry| (entry.key.clone(), entry.value.clone())),
        )
        .case_insensitive(config.case_insensitive);
    if let Some(default) = &config.default {
        builder = builder.default_value(default.clone());
    }
    builder.build()
}

fn build_bins(config: &BinConfig) -> Result<BinSpec> {
    let policy = BinPolicy {
        closed: config.closed,
        include_outer: config.include_outer,
    };
    let labels = config.labels.clone();
    match &config.boundaries {
        Boundaries::Numbers(numbers) => {
            let mut boundaries = Vec::with_capacity(numbers.len() + 2);
            if config.open_below {
                boundaries.push(f64::NEG_INFINITY);
            }
            boundaries.extend_from_slice(numbers);
            if config.open_above {
                boundaries.push(f64::INFINITY);
            }
            BinSpec::new(boundaries, labels, policy)
        }
        Boundaries::Dates(dates) => {
            if config.open_below || config.open_above {
                return Err(FormatError::invalid_boundaries(
                    "date boundaries cannot be open-ended",
                ));
            }
            BinSpec::from_dates(dates, labels, policy)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tables_from_json() {
        let catalog = FormatCatalog::from_json_str(
            r#"{
                "lookups": [{
                    "name": "Region",
                    "entries": [
                        {"key": "E", "value": "Europe"},
                        {"key": "SA", "value": "South America"}
                    ],
                    "default": "Unknown"
                }],
                "bins": [{
                    "name": "age_group",
                    "boundaries": [0, 40, 60, 100],
                    "labels": ["Young", "Middle-Aged", "Old"],
                    "closed": "right",
                    "include_outer": false
                }, {
                    "name": "score",
                    "boundaries": [0],
                    "closed": "right",
                    "include_outer": false,
                    "open_below": true,
                    "open_above": true
                }]
            }"#,
        )
        .expect("catalog");
        let region = catalog.lookup_table("region").unwrap();
        assert_eq!(region.get("AS").unwrap(), "Unknown");
        let ages = catalog.bin_spec("AGE_GROUP").unwrap();
        assert_eq!(ages.bin(59.0).unwrap(), "Middle-Aged");
        let score = catalog.bin_spec("score").unwrap();
        assert_eq!(score.bin(-3.0).unwrap(), "(-Inf, 0]");
        assert!(catalog.bin_spec("region").is_err());
    }

    #[test]
    fn duplicate_table_names_fail() {
        let error = FormatCatalog::from_json_str(
            r#"{"lookups": [
                {"name": "a", "entries": []},
                {"name": "A", "entries": []}
            ]}"#,
        )
        .unwrap_err();
        assert_eq!(
            error,
            FormatError::DuplicateFormat {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn invalid_entries_surface_construction_errors() {
        let error = FormatCatalog::from_json_str(
            r#"{"lookups": [{"name": "a", "entries": [
                {"key": 1, "value": "x"},
                {"key": 1, "value": "y"}
            ]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(error, FormatError::DuplicateKey { .. }));
    }
}
