#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # objmap
//!
//! Declarative object mapping over JSON values.
//!
//! A [`MappingConfig`] names the output keys and, for each key, how to derive
//! its value from a source object: a dot-delimited path, a list of paths, or a
//! pick with an optional compute step. [`map_object`] applies a configuration
//! once; [`mapper`] captures a configuration and can itself be used as a
//! compute, which is how nested objects and arrays of objects are reshaped.
//!
//! ```
//! use objmap::{Compute, MappingConfig, PathSpec, map_object};
//! use serde_json::json;
//!
//! let join = Compute::new(|value| {
//!     let parts: Vec<String> = value
//!         .as_array()
//!         .into_iter()
//!         .flatten()
//!         .filter_map(|v| v.as_str().map(str::to_string))
//!         .collect();
//!     Ok(json!(parts.join(" ")))
//! });
//! let config = MappingConfig::new()
//!     .compute("fullName", PathSpec::list(["name", "lastName"]), join);
//!
//! let profile = json!({ "name": "Prabu", "lastName": "Rajan" });
//! let view = map_object(&config, &profile).unwrap();
//! assert_eq!(view, json!({ "fullName": "Prabu Rajan" }));
//! ```

/// Unary compute functions and combinators.
pub mod compute;
/// Field descriptors and the pick/compute interpreter.
pub mod descriptor;
/// Mapping configurations and the field mapper entry points.
pub mod mapper;
/// Dot-path resolution over nested values.
pub mod path;

pub use compute::Compute;
pub use descriptor::{Descriptor, PathSpec};
pub use mapper::{MappingConfig, ObjectMapper, map_object, mapper};
pub use serde_json::Value;

use thiserror::Error;

/// Value produced when a path or descriptor resolves to nothing.
///
/// Missing data is not an error: the output key is kept and carries this
/// marker. JSON has no `undefined`, so it is the same value as a present
/// `null`.
pub const ABSENT: Value = Value::Null;

/// Errors raised by compute functions during mapping.
///
/// The mapper itself never fails; these come from computes and reach the
/// caller of [`map_object`] unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Compute error: {0}")]
    Compute(String),

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
}

impl Error {
    /// Build a generic compute failure.
    pub fn compute(message: impl Into<String>) -> Self {
        Self::Compute(message.into())
    }

    /// Build a type mismatch describing the JSON type actually received.
    pub fn type_mismatch(expected: impl Into<String>, found: &Value) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: type_name(found).to_string(),
        }
    }
}

/// Short JSON type name used in error messages.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Crate-local result type for compute and mapping operations.
pub type Result<T> = std::result::Result<T, Error>;
