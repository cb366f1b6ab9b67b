//! Document compilation
//!
//! Turns the serde model of a mapping document into an
//! [`objmap::MappingConfig`], resolving `call` operations against a
//! [`ComputeRegistry`] up front.

use std::collections::BTreeMap;

use objmap::compute::{chain, each};
use objmap::{Compute, Descriptor, MappingConfig, PathSpec, mapper};
use tracing::debug;

use crate::dsl::{ComputeSpec, FieldSpec, MappingDocument, PickSpec, PickTarget};
use crate::registry::ComputeRegistry;
use crate::transforms::{
    transform_default, transform_find, transform_join, transform_lowercase,
    transform_number_format, transform_pluck, transform_sort_by, transform_split, transform_trim,
    transform_uppercase,
};
use crate::{Error, Result};

impl MappingDocument {
    /// Compile this document into a mapping configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownFunction`] when a `call` names a function that
    /// is not in `registry`.
    pub fn compile(&self, registry: &ComputeRegistry) -> Result<MappingConfig> {
        debug!(mapping = %self.name, fields = self.fields.len(), "Compiling mapping document");
        compile_fields(&self.fields, registry)
    }
}

/// Compile a set of field specs.
///
/// # Errors
///
/// Returns an error if any field fails to compile.
pub fn compile_fields(
    fields: &BTreeMap<String, FieldSpec>,
    registry: &ComputeRegistry,
) -> Result<MappingConfig> {
    let mut config = MappingConfig::new();
    for (key, spec) in fields {
        config.insert(key.clone(), compile_field(spec, registry)?);
    }
    Ok(config)
}

/// Compile one field spec into a descriptor.
///
/// # Errors
///
/// Returns an error if the compute step fails to compile.
pub fn compile_field(spec: &FieldSpec, registry: &ComputeRegistry) -> Result<Descriptor> {
    let descriptor = match spec {
        FieldSpec::Path(path) => Descriptor::Path(path.clone()),
        FieldSpec::PathList(paths) => Descriptor::PathList(paths.clone()),
        FieldSpec::PickCompute(PickSpec { pick, compute }) => {
            let pick = match pick {
                PickTarget::Path(path) if path.is_empty() => return Ok(Descriptor::Unmatched),
                PickTarget::Path(path) => PathSpec::Path(path.clone()),
                PickTarget::List(paths) => PathSpec::List(paths.clone()),
            };
            let compute = compute
                .as_ref()
                .map(|op| compile_compute(op, registry))
                .transpose()?;
            Descriptor::PickCompute { pick, compute }
        }
        FieldSpec::Other(_) => Descriptor::Unmatched,
    };
    Ok(descriptor)
}

/// Compile a compute operation.
///
/// # Errors
///
/// Returns [`Error::UnknownFunction`] for a `call` to an unregistered name,
/// here or in any nested operation.
pub fn compile_compute(spec: &ComputeSpec, registry: &ComputeRegistry) -> Result<Compute> {
    let compute = match spec {
        ComputeSpec::Uppercase => Compute::new(|value| transform_uppercase(&value)),
        ComputeSpec::Lowercase => Compute::new(|value| transform_lowercase(&value)),
        ComputeSpec::Trim => Compute::new(|value| transform_trim(&value)),
        ComputeSpec::Split { delimiter, index } => {
            let (delimiter, index) = (delimiter.clone(), *index);
            Compute::new(move |value| transform_split(&value, &delimiter, index))
        }
        ComputeSpec::Default { value: default } => {
            let default = default.clone();
            Compute::new(move |value| Ok(transform_default(&value, &default)))
        }
        ComputeSpec::NumberFormat {
            decimals,
            thousands_sep,
        } => {
            let (decimals, thousands_sep) = (*decimals, thousands_sep.clone());
            Compute::new(move |value| {
                transform_number_format(&value, decimals, thousands_sep.as_deref())
            })
        }
        ComputeSpec::Join { separator } => {
            let separator = separator.clone();
            Compute::new(move |value| transform_join(&value, &separator))
        }
        ComputeSpec::Find { key, value: expected } => {
            let (key, expected) = (key.clone(), expected.clone());
            Compute::new(move |value| transform_find(&value, &key, &expected))
        }
        ComputeSpec::Pluck { key } => {
            let key = key.clone();
            Compute::new(move |value| transform_pluck(&value, &key))
        }
        ComputeSpec::SortBy { key } => {
            let key = key.clone();
            Compute::new(move |value| transform_sort_by(&value, &key))
        }
        ComputeSpec::Each { mapping } => each(mapper(compile_fields(mapping, registry)?)),
        ComputeSpec::Chain { ops } => chain(
            ops.iter()
                .map(|op| compile_compute(op, registry))
                .collect::<Result<Vec<_>>>()?,
        ),
        ComputeSpec::Call { function } => {
            registry
                .get(function)
                .ok_or_else(|| Error::UnknownFunction {
                    name: function.clone(),
                })?
        }
    };
    Ok(compute)
}
