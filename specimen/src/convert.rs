//! Caller-supplied converter overrides, consulted before any built-in rule.

use std::any::{Any, TypeId};

type ConverterFn<T> = Box<dyn Fn() -> T + Send + Sync>;

struct ConverterEntry {
    type_id: TypeId,
    type_name: &'static str,
    factory: Box<dyn Any + Send + Sync>,
}

/// Insertion-ordered table of zero-argument factories keyed by target type.
///
/// Lookup scans entries in registration order and the first match wins, so
/// callers must register most-specific types first. A converter registered
/// for a concrete type short-circuits every built-in rule, including
/// abstract-binding resolution that would otherwise reach that type.
///
/// Once handed to a provider the table is immutable for the provider's
/// lifetime.
#[derive(Default)]
pub struct ConverterRegistry {
    entries: Vec<ConverterEntry>,
}

impl ConverterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a factory for a specific type
    pub fn register<T, F>(&mut self, factory: F)
    where
        T: 'static,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.entries.push(ConverterEntry {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            factory: Box::new(Box::new(factory) as ConverterFn<T>),
        });
    }

    /// Find the first registered factory for `T`, in insertion order
    pub fn lookup<T: 'static>(&self) -> Option<&(dyn Fn() -> T + Send + Sync)> {
        let type_id = TypeId::of::<T>();
        self.entries
            .iter()
            .find(|entry| entry.type_id == type_id)
            .and_then(|entry| entry.factory.downcast_ref::<ConverterFn<T>>())
            .map(|boxed| boxed.as_ref())
    }

    /// Check whether a factory is registered for `T`
    pub fn contains<T: 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.entries.iter().any(|entry| entry.type_id == type_id)
    }

    /// Names of registered target types, in insertion order
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.type_name)
    }

    /// Number of registered factories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("types", &self.type_names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_basic_operations() {
        let mut registry = ConverterRegistry::new();

        assert!(registry.is_empty());
        assert!(!registry.contains::<i32>());

        registry.register::<i32, _>(|| 42);

        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<i32>());
        assert!(!registry.contains::<String>());

        let factory = registry.lookup::<i32>().expect("factory registered");
        assert_eq!(factory(), 42);
    }

    #[test]
    fn test_first_registration_wins() {
        let mut registry = ConverterRegistry::new();
        registry.register::<u8, _>(|| 1);
        registry.register::<u8, _>(|| 2);

        let factory = registry.lookup::<u8>().expect("factory registered");
        assert_eq!(factory(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_registry_type_safety() {
        let mut registry = ConverterRegistry::new();
        registry.register::<i32, _>(|| 7);
        registry.register::<String, _>(|| "hello".to_string());

        assert_eq!(registry.lookup::<String>().map(|f| f()).as_deref(), Some("hello"));
        assert!(registry.lookup::<f64>().is_none());
    }
}
