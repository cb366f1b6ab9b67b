//! Field mapper
//!
//! Applies a [`MappingConfig`] to a source value, producing an object with
//! exactly the configuration's keys.

use std::collections::BTreeMap;

use serde_json::Map;
use tracing::{debug, trace};

use crate::compute::Compute;
use crate::descriptor::{Descriptor, PathSpec};
use crate::{Result, Value};

/// Output key to descriptor.
#[derive(Debug, Clone, Default)]
pub struct MappingConfig {
    fields: BTreeMap<String, Descriptor>,
}

impl MappingConfig {
    /// Create an empty configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the descriptor for `key`, replacing any earlier one.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, descriptor: impl Into<Descriptor>) -> Self {
        self.insert(key, descriptor);
        self
    }

    /// Map `key` from a single path.
    #[must_use]
    pub fn path(self, key: impl Into<String>, path: impl Into<String>) -> Self {
        self.field(key, Descriptor::path(path))
    }

    /// Map `key` from a list of paths.
    #[must_use]
    pub fn paths<I, S>(self, key: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field(key, Descriptor::path_list(paths))
    }

    /// Map `key` from a pick with no compute step.
    #[must_use]
    pub fn pick(self, key: impl Into<String>, pick: impl Into<PathSpec>) -> Self {
        self.field(key, Descriptor::pick_only(pick))
    }

    /// Map `key` from a pick followed by `compute`.
    #[must_use]
    pub fn compute(
        self,
        key: impl Into<String>,
        pick: impl Into<PathSpec>,
        compute: impl Into<Compute>,
    ) -> Self {
        self.field(key, Descriptor::pick_compute(pick, compute))
    }

    /// Set the descriptor for `key` in place.
    pub fn insert(&mut self, key: impl Into<String>, descriptor: impl Into<Descriptor>) {
        self.fields.insert(key.into(), descriptor.into());
    }

    /// Build a configuration from an untyped JSON object.
    ///
    /// Each entry is classified with [`Descriptor::from_value`]. A value that
    /// is not an object yields an empty configuration.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let fields = value
            .as_object()
            .into_iter()
            .flatten()
            .map(|(key, entry)| (key.clone(), Descriptor::from_value(entry)))
            .collect();
        Self { fields }
    }

    /// Descriptor for `key`, if configured.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Descriptor> {
        self.fields.get(key)
    }

    /// Iterate over output keys and their descriptors.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Descriptor)> {
        self.fields.iter().map(|(key, descriptor)| (key.as_str(), descriptor))
    }

    /// Output keys in iteration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of output fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the configuration has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, D: Into<Descriptor>> FromIterator<(K, D)> for MappingConfig {
    fn from_iter<T: IntoIterator<Item = (K, D)>>(iter: T) -> Self {
        let mut config = Self::new();
        for (key, descriptor) in iter {
            config.insert(key, descriptor);
        }
        config
    }
}

/// Apply `config` to `source`.
///
/// Every configured key is present in the result. Missing data resolves to
/// [`crate::ABSENT`].
///
/// # Errors
///
/// Returns the first compute failure unchanged.
pub fn map_object(config: &MappingConfig, source: &Value) -> Result<Value> {
    debug!(fields = config.len(), "Mapping object");

    let mut output = Map::new();
    for (key, descriptor) in config.iter() {
        let value = descriptor.resolve(source).inspect_err(|error| {
            debug!(field = %key, kind = descriptor.kind(), %error, "Compute failed");
        })?;
        trace!(field = %key, kind = descriptor.kind(), absent = value.is_null(), "Resolved field");
        output.insert(key.to_string(), value);
    }

    debug!(fields = output.len(), "Mapped object");
    Ok(Value::Object(output))
}

/// Capture `config` for later application.
///
/// The returned mapper converts into a [`Compute`], so it can be the compute
/// step of an outer field, or wrapped in [`crate::compute::each`] to reshape
/// every element of a picked array.
#[must_use]
pub fn mapper(config: MappingConfig) -> ObjectMapper {
    ObjectMapper { config }
}

/// A mapping configuration bound as a unary function of the source.
#[derive(Debug, Clone)]
pub struct ObjectMapper {
    config: MappingConfig,
}

impl ObjectMapper {
    /// Apply the captured configuration.
    ///
    /// # Errors
    ///
    /// Returns the first compute failure unchanged.
    pub fn apply(&self, source: &Value) -> Result<Value> {
        map_object(&self.config, source)
    }

    /// The captured configuration.
    #[must_use]
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Use this mapper as a compute step.
    #[must_use]
    pub fn into_compute(self) -> Compute {
        Compute::new(move |value| self.apply(&value))
    }
}

impl From<ObjectMapper> for Compute {
    fn from(mapper: ObjectMapper) -> Self {
        mapper.into_compute()
    }
}
