//! Field descriptors
//!
//! A descriptor says how one output field is derived from the source. It is
//! classified once, either through the typed constructors or from an untyped
//! JSON value with [`Descriptor::from_value`], and then resolved by matching
//! on the variant.

use crate::compute::Compute;
use crate::path::{resolve_path, resolve_paths};
use crate::{ABSENT, Result, Value};

/// What a pick reads: one path or an ordered list of paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSpec {
    /// A single dot-delimited path, resolving to one value
    Path(String),

    /// Several paths, resolving to an array parallel to the list
    List(Vec<String>),
}

impl PathSpec {
    /// Single path.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Ordered list of paths.
    pub fn list<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(paths.into_iter().map(Into::into).collect())
    }

    /// Read the value(s) addressed by this spec.
    #[must_use]
    pub fn pick(&self, source: &Value) -> Value {
        match self {
            Self::Path(path) => resolve_path(path, source),
            Self::List(paths) => Value::Array(resolve_paths(paths, source)),
        }
    }

    /// Classify an untyped `pick` value. Only strings and arrays qualify.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(path) => Some(Self::Path(path.clone())),
            Value::Array(items) => Some(Self::List(items.iter().map(path_text).collect())),
            _ => None,
        }
    }
}

impl From<&str> for PathSpec {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<String> for PathSpec {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<Vec<String>> for PathSpec {
    fn from(paths: Vec<String>) -> Self {
        Self::List(paths)
    }
}

impl<const N: usize> From<[&str; N]> for PathSpec {
    fn from(paths: [&str; N]) -> Self {
        Self::list(paths)
    }
}

/// How one output field is derived.
#[derive(Debug, Clone)]
pub enum Descriptor {
    /// A single path
    Path(String),

    /// A list of paths, producing an array
    PathList(Vec<String>),

    /// A pick followed by an optional compute
    PickCompute {
        pick: PathSpec,
        compute: Option<Compute>,
    },

    /// A configuration value of no recognised shape; always absent
    Unmatched,
}

impl Descriptor {
    /// Single path descriptor.
    pub fn path(path: impl Into<String>) -> Self {
        Self::Path(path.into())
    }

    /// Path list descriptor.
    pub fn path_list<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::PathList(paths.into_iter().map(Into::into).collect())
    }

    /// Pick without a compute step.
    pub fn pick_only(pick: impl Into<PathSpec>) -> Self {
        Self::PickCompute {
            pick: pick.into(),
            compute: None,
        }
    }

    /// Pick followed by a compute step.
    pub fn pick_compute(pick: impl Into<PathSpec>, compute: impl Into<Compute>) -> Self {
        Self::PickCompute {
            pick: pick.into(),
            compute: Some(compute.into()),
        }
    }

    /// Classify an untyped configuration value.
    ///
    /// Shapes are tried in order: string, array, object with a truthy `pick`
    /// that is itself a string or array. Anything else is [`Self::Unmatched`].
    /// JSON cannot carry functions, so a classified pick has no compute and
    /// any `compute` entry is ignored, whatever it holds. The mapping document
    /// loader in `objmap-dsl` is stricter and rejects a `compute` that is not a
    /// known operation.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(path) => Self::Path(path.clone()),
            Value::Array(items) => Self::PathList(items.iter().map(path_text).collect()),
            Value::Object(fields) => match fields.get("pick") {
                Some(pick) if is_truthy(pick) => PathSpec::from_value(pick)
                    .map_or(Self::Unmatched, |pick| Self::PickCompute {
                        pick,
                        compute: None,
                    }),
                _ => Self::Unmatched,
            },
            _ => Self::Unmatched,
        }
    }

    /// Read the raw value(s) for this descriptor, before any compute.
    #[must_use]
    pub fn pick(&self, source: &Value) -> Value {
        match self {
            Self::Path(path) => resolve_path(path, source),
            Self::PathList(paths) => Value::Array(resolve_paths(paths, source)),
            Self::PickCompute { pick, .. } => pick.pick(source),
            Self::Unmatched => ABSENT,
        }
    }

    /// Pick, then run the compute step if there is one.
    ///
    /// # Errors
    ///
    /// Returns the compute's error unchanged.
    pub fn resolve(&self, source: &Value) -> Result<Value> {
        let picked = self.pick(source);
        match self {
            Self::PickCompute {
                compute: Some(compute),
                ..
            } => compute.apply(picked),
            _ => Ok(picked),
        }
    }

    /// Short name of the variant, as shown by tooling.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Path(_) => "path",
            Self::PathList(_) => "path_list",
            Self::PickCompute { .. } => "pick_compute",
            Self::Unmatched => "unmatched",
        }
    }
}

impl From<&str> for Descriptor {
    fn from(path: &str) -> Self {
        Self::path(path)
    }
}

impl From<String> for Descriptor {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl<const N: usize> From<[&str; N]> for Descriptor {
    fn from(paths: [&str; N]) -> Self {
        Self::path_list(paths)
    }
}

impl From<PathSpec> for Descriptor {
    fn from(spec: PathSpec) -> Self {
        match spec {
            PathSpec::Path(path) => Self::Path(path),
            PathSpec::List(paths) => Self::PathList(paths),
        }
    }
}

/// Non-string entries of a path list are read as their JSON text.
fn path_text(item: &Value) -> String {
    match item {
        Value::String(path) => path.clone(),
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
