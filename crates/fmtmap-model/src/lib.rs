pub mod catalog;
pub mod error;
pub mod key;
pub mod value;

pub use catalog::{BinConfig, Boundaries, CatalogConfig, Closed, LookupConfig, LookupEntry};
pub use error::{FormatError, Result};
pub use key::LookupKey;
pub use value::{SAS_EPOCH, Value, date_to_ordinal, format_numeric, ordinal_to_date};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_parses_mixed_keys_and_dates() {
        let json = r#"{
            "lookups": [{
                "name": "region",
                "entries": [
                    {"key": "E", "value": "Europe"},
                    {"key": 3, "value": "Three"}
                ],
                "default": "Unknown"
            }],
            "bins": [{
                "name": "visit_window",
                "boundaries": ["2024-01-01", "2024-02-01"],
                "closed": "left",
                "include_outer": true
            }]
        }"#;
        let catalog = CatalogConfig::from_json_str(json).expect("parse catalog");
        let region = &catalog.lookups[0];
        assert_eq!(region.entries[0].key, LookupKey::Text("E".to_string()));
        assert_eq!(region.entries[1].key, LookupKey::Int(3));
        assert!(!region.case_insensitive);
        let window = &catalog.bins[0];
        assert!(matches!(window.boundaries, Boundaries::Dates(ref d) if d.len() == 2));
        assert_eq!(window.closed, Closed::Left);
        assert!(!window.open_below);
    }

    #[test]
    fn catalog_requires_explicit_bin_policy() {
        let json = r#"{"bins": [{"name": "age", "boundaries": [0, 40]}]}"#;
        let error = CatalogConfig::from_json_str(json).unwrap_err();
        assert!(matches!(error, FormatError::Catalog(_)));
    }

    #[test]
    fn catalog_rejects_unknown_fields() {
        let json = r#"{"lookups": [], "formats": []}"#;
        assert!(CatalogConfig::from_json_str(json).is_err());
    }
}
