//! Named format definitions with copy-on-write registration.
//!
//! Readers take an `Arc` snapshot of the current map and never hold the lock
//! while rendering or parsing. Writers clone the map only when a snapshot is
//! still alive, so in-flight lookups keep seeing the map they started with.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use fmtmap_model::{FormatError, Result, Value};
use tracing::debug;

use crate::definition::{FnFormat, FormatDefinition};
use crate::formats::builtin_formats;
use crate::mask::MaskedValue;

pub type FormatMap = BTreeMap<String, Arc<dyn FormatDefinition>>;

static GLOBAL: LazyLock<FormatRegistry> = LazyLock::new(FormatRegistry::with_builtins);

/// Registry keys are trimmed and ASCII lower-cased.
pub(crate) fn normalize_name(name: &str) -> Result<String> {
    let key = name.trim().to_ascii_lowercase();
    if key.is_empty() {
        return Err(FormatError::InvalidFormatName {
            name: name.to_string(),
        });
    }
    Ok(key)
}

#[derive(Debug, Default)]
pub struct FormatRegistry {
    formats: RwLock<Arc<FormatMap>>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let registry = Self::new();
        let mut map = FormatMap::new();
        for definition in builtin_formats() {
            map.insert(definition.name().to_ascii_lowercase(), definition);
        }
        *registry.write_guard() = Arc::new(map);
        registry
    }

    /// The process-wide registry, seeded with the built-in formats.
    pub fn global() -> &'static FormatRegistry {
        &GLOBAL
    }

    /// Adds a definition.
    ///
    /// # Errors
    ///
    /// [`FormatError::DuplicateFormat`] if the name is taken; use
    /// [`FormatRegistry::replace`] to overwrite deliberately.
    pub fn register(&self, definition: Arc<dyn FormatDefinition>) -> Result<()> {
        let key = normalize_name(definition.name())?;
        let mut guard = self.write_guard();
        if guard.contains_key(&key) {
            return Err(FormatError::DuplicateFormat { name: key });
        }
        Arc::make_mut(&mut *guard).insert(key.clone(), definition);
        debug!(format = %key, "registered format");
        Ok(())
    }

    /// Adds a definition built from a render and a parse closure.
    pub fn register_fn<R, P>(&self, name: &str, render: R, parse: P) -> Result<()>
    where
        R: Fn(&Value) -> Result<String> + Send + Sync + 'static,
        P: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        self.register(Arc::new(FnFormat::new(name, render, parse)))
    }

    /// Inserts or overwrites a definition, returning the one it displaced.
    pub fn replace(
        &self,
        definition: Arc<dyn FormatDefinition>,
    ) -> Result<Option<Arc<dyn FormatDefinition>>> {
        let key = normalize_name(definition.name())?;
        let mut guard = self.write_guard();
        let previous = Arc::make_mut(&mut *guard).insert(key.clone(), definition);
        debug!(format = %key, replaced = previous.is_some(), "replaced format");
        Ok(previous)
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn FormatDefinition>> {
        let key = normalize_name(name)?;
        self.snapshot()
            .get(&key)
            .cloned()
            .ok_or(FormatError::UnknownFormat { name: key })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.snapshot().keys().cloned().collect()
    }

    /// The map as of this call; later registrations are not visible in it.
    pub fn snapshot(&self) -> Arc<FormatMap> {
        Arc::clone(&self.formats.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn parse(&self, text: &str, name: &str) -> Result<Value> {
        self.get(name)?.parse(text)
    }

    pub fn render(&self, value: &Value, name: &str) -> Result<String> {
        self.get(name)?.render(value)
    }

    pub fn mask<T>(&self, raw: T, name: &str) -> Result<MaskedValue<T>>
    where
        T: Clone + Into<Value>,
    {
        MaskedValue::new(raw, self.get(name)?)
    }

    fn write_guard(&self) -> std::sync::RwLockWriteGuard<'_, Arc<FormatMap>> {
        // The map is swapped or mutated in a single call, so a poisoned lock
        // still guards a consistent map.
        self.formats.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        let registry = FormatRegistry::with_builtins();
        assert!(registry.contains("DOLLAR"));
        assert!(registry.contains("  Date9 "));
        assert!(matches!(
            registry.get("nope"),
            Err(FormatError::UnknownFormat { .. })
        ));
        assert!(matches!(
            registry.get("  "),
            Err(FormatError::InvalidFormatName { .. })
        ));
    }

    #[test]
    fn duplicate_registration_fails() {
        let registry = FormatRegistry::with_builtins();
        let error = registry
            .register_fn("Percent", |v| Ok(v.to_string()), |t| Ok(Value::from(t)))
            .unwrap_err();
        assert_eq!(
            error,
            FormatError::DuplicateFormat {
                name: "percent".to_string()
            }
        );
    }

    #[test]
    fn replace_overwrites_explicitly() {
        let registry = FormatRegistry::new();
        registry
            .register_fn("id", |v| Ok(v.to_string()), |t| Ok(Value::from(t)))
            .unwrap();
        let previous = registry
            .replace(Arc::new(FnFormat::new(
                "id",
                |_| Ok("x".to_string()),
                |t| Ok(Value::from(t)),
            )))
            .unwrap();
        assert!(previous.is_some());
        assert_eq!(registry.render(&Value::from(1), "id").unwrap(), "x");
    }

    #[test]
    fn snapshots_ignore_later_registrations() {
        let registry = FormatRegistry::new();
        let before = registry.snapshot();
        registry
            .register_fn("late", |v| Ok(v.to_string()), |t| Ok(Value::from(t)))
            .unwrap();
        assert!(before.is_empty());
        assert_eq!(registry.names(), vec!["late".to_string()]);
    }
}
