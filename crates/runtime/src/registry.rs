//! Name-indexed collection of native functions.

use crate::function::NativeFunction;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RegistryError {
    #[error("function `{0}` is already registered")]
    Duplicate(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Functions keyed by name. Iteration is in name order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    functions: BTreeMap<String, Arc<NativeFunction>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `function`, returning the shared handle stored in the registry.
    pub fn register(&mut self, function: NativeFunction) -> RegistryResult<Arc<NativeFunction>> {
        if self.functions.contains_key(function.name()) {
            return Err(RegistryError::Duplicate(function.name().to_owned()));
        }
        let function = Arc::new(function);
        self.functions
            .insert(function.name().to_owned(), Arc::clone(&function));
        tracing::debug!(name = function.name(), "registered function");
        Ok(function)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<NativeFunction>> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<NativeFunction>> {
        self.functions.values()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signature::Signature;
    use serde_json::Value;

    fn noop(name: &str) -> NativeFunction {
        NativeFunction::new(name, Signature::new(), |_| Ok(Value::Null))
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = Registry::new();
        let stored = registry.register(noop("b")).unwrap();
        registry.register(noop("a")).unwrap();

        assert!(Arc::ptr_eq(registry.get("b").unwrap(), &stored));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = Registry::new();
        registry.register(noop("f")).unwrap();
        let err = registry.register(noop("f")).unwrap_err();
        assert_eq!(err.to_string(), "function `f` is already registered");
    }
}
