//! Compute registry
//!
//! Named compute functions that mapping documents reach with `op: call`.

use objmap::{Compute, Error, Value};
use std::collections::HashMap;

/// Registry of named compute functions
#[derive(Debug, Default, Clone)]
pub struct ComputeRegistry {
    functions: HashMap<String, Compute>,
}

impl ComputeRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, replacing any earlier one with the same name
    pub fn register(&mut self, name: impl Into<String>, compute: impl Into<Compute>) -> &mut Self {
        let name = name.into();
        tracing::debug!(function = %name, "Registering compute function");
        self.functions.insert(name, compute.into());
        self
    }

    /// Remove a function, returning it if it was registered
    pub fn unregister(&mut self, name: &str) -> Option<Compute> {
        self.functions.remove(name)
    }

    /// Move every function of `other` into this registry
    pub fn extend(&mut self, other: ComputeRegistry) -> &mut Self {
        self.functions.extend(other.functions);
        self
    }

    /// Get a function by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Compute> {
        self.functions.get(name).cloned()
    }

    /// Check if a function exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered functions
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Built-in string utilities: `reverse` and `initials`
#[must_use]
pub fn string_utils() -> ComputeRegistry {
    let mut registry = ComputeRegistry::new();

    registry
        .register("reverse", |value: Value| match value {
            Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
            Value::Null => Ok(Value::Null),
            other => Err(Error::type_mismatch("string", &other)),
        })
        .register("initials", |value: Value| {
            let words: Vec<String> = match &value {
                Value::String(s) => s.split_whitespace().map(str::to_string).collect(),
                Value::Array(items) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                Value::Null => return Ok(Value::Null),
                other => return Err(Error::type_mismatch("string or array", other)),
            };
            let initials: String = words
                .iter()
                .filter_map(|word| word.chars().next())
                .flat_map(char::to_uppercase)
                .collect();
            Ok(Value::String(initials))
        });

    registry
}
