//! # objmap-dsl
//!
//! Declarative mapping documents for `objmap`.
//!
//! A mapping document is a YAML or JSON file naming the output fields and how
//! each is derived. Compute steps are written as tagged operations
//! (`op: join`, `op: each`, ...) or as calls to functions registered in a
//! [`ComputeRegistry`]. Compiling a document yields an
//! [`objmap::MappingConfig`].

pub mod compile;
pub mod dsl;
pub mod registry;
pub mod transforms;

mod numeric;

pub use dsl::{ComputeSpec, FieldSpec, MappingDocument, MappingDsl, ParseError, PickSpec, PickTarget};
pub use registry::ComputeRegistry;

use thiserror::Error;

/// Errors that can occur while loading or compiling a mapping document
#[derive(Error, Debug)]
pub enum Error {
    #[error("DSL parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Unknown compute function '{name}'")]
    UnknownFunction { name: String },
}

pub type Result<T> = std::result::Result<T, Error>;
