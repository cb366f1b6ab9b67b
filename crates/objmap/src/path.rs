//! Path resolution for nested values
//!
//! A path is a dot-delimited list of segments. Each segment is looked up as a
//! key of the current object, or as a canonical index when the current value
//! is an array. Anything that cannot be descended resolves to [`ABSENT`].

use crate::{ABSENT, Value};

/// Resolve a single dot-delimited path against `source`.
///
/// Returns a clone of the value found at the end of the path, or [`ABSENT`]
/// when any segment is missing or the walk hits a scalar or `null` early.
#[must_use]
pub fn resolve_path(path: &str, source: &Value) -> Value {
    lookup(path, source).cloned().unwrap_or(ABSENT)
}

/// Resolve every path independently, preserving input order.
#[must_use]
pub fn resolve_paths<S: AsRef<str>>(paths: &[S], source: &Value) -> Vec<Value> {
    paths
        .iter()
        .map(|path| resolve_path(path.as_ref(), source))
        .collect()
}

/// Borrowing variant of [`resolve_path`].
#[must_use]
pub fn lookup<'a>(path: &str, source: &'a Value) -> Option<&'a Value> {
    path.split('.').try_fold(source, step)
}

fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    match current {
        Value::Object(fields) => fields.get(segment),
        Value::Array(items) => array_index(segment).and_then(|index| items.get(index)),
        _ => None,
    }
}

/// Only canonical decimal indices address array elements: `"0"`, `"12"`, not
/// `"+1"`, `"01"` or `"-1"`.
fn array_index(segment: &str) -> Option<usize> {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical { segment.parse().ok() } else { None }
}
