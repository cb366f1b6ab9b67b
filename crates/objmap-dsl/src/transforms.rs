//! Built-in compute operations
//!
//! String operations pass `null` through untouched. Collection operations
//! require an array and report anything else, including `null`, as a type
//! mismatch.

use std::cmp::Ordering;

use objmap::path::resolve_path;
use objmap::{ABSENT, Error, Result, Value};

use crate::numeric::value_to_f64;

/// Convert string to uppercase
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn transform_uppercase(value: &Value) -> Result<Value> {
    map_text(value, |s| s.to_uppercase())
}

/// Convert string to lowercase
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn transform_lowercase(value: &Value) -> Result<Value> {
    map_text(value, |s| s.to_lowercase())
}

/// Trim whitespace from string
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn transform_trim(value: &Value) -> Result<Value> {
    map_text(value, |s| s.trim().to_string())
}

fn map_text(value: &Value, op: impl Fn(&str) -> String) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Null),
        Value::String(s) => Ok(Value::String(op(s))),
        Value::Number(_) | Value::Bool(_) => Ok(Value::String(op(&value.to_string()))),
        other => Err(Error::type_mismatch("string", other)),
    }
}

/// Split string by delimiter and get indexed part
///
/// # Errors
///
/// Returns an error if the value is not text or the index is out of bounds.
pub fn transform_split(value: &Value, delimiter: &str, index: usize) -> Result<Value> {
    let input = match value {
        Value::Null => return Ok(Value::Null),
        Value::String(s) => s.clone(),
        Value::Number(_) | Value::Bool(_) => value.to_string(),
        other => return Err(Error::type_mismatch("string", other)),
    };

    let parts: Vec<&str> = input.split(delimiter).collect();
    parts
        .get(index)
        .map(|part| Value::String((*part).to_string()))
        .ok_or_else(|| {
            Error::compute(format!(
                "Split index {index} out of bounds ({} parts)",
                parts.len()
            ))
        })
}

/// Return default value if input is null or empty
#[must_use]
pub fn transform_default(value: &Value, default: &Value) -> Value {
    match value {
        Value::Null => default.clone(),
        Value::String(s) if s.is_empty() => default.clone(),
        _ => value.clone(),
    }
}

/// Largest `decimals` accepted by [`transform_number_format`].
pub const MAX_DECIMALS: u32 = 100;

/// Format number with specified decimals and thousands separator
///
/// # Errors
///
/// Returns an error if the value cannot be read as a number, or if
/// `decimals` exceeds [`MAX_DECIMALS`].
pub fn transform_number_format(
    value: &Value,
    decimals: u32,
    thousands_sep: Option<&str>,
) -> Result<Value> {
    let num = match value {
        Value::Null => return Ok(Value::Null),
        _ => value_to_f64(value)?,
    };
    if decimals > MAX_DECIMALS {
        return Err(Error::compute(format!(
            "Unsupported decimal precision {decimals} (at most {MAX_DECIMALS})"
        )));
    }
    let precision = usize::try_from(decimals)
        .map_err(|_| Error::compute("Unsupported decimal precision"))?;
    let rounded = format!("{num:.precision$}");
    let formatted = match thousands_sep {
        Some(sep) => format_with_thousands_sep(&rounded, sep),
        None => rounded,
    };

    Ok(Value::String(formatted))
}

/// Format numeric string with thousands separator.
fn format_with_thousands_sep(number: &str, sep: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(stripped) => ("-", stripped),
        None => ("", number),
    };
    let (integer_part, fractional_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped_reversed = String::new();
    for (index, ch) in integer_part.chars().rev().enumerate() {
        if index > 0 && index % 3 == 0 {
            grouped_reversed.push_str(&sep.chars().rev().collect::<String>());
        }
        grouped_reversed.push(ch);
    }
    let grouped_integer: String = grouped_reversed.chars().rev().collect();

    match fractional_part {
        Some(frac) => format!("{sign}{grouped_integer}.{frac}"),
        None => format!("{sign}{grouped_integer}"),
    }
}

/// Join array elements into one string
///
/// Strings are joined as-is, `null` as the empty string, anything else as
/// its JSON text.
///
/// # Errors
///
/// Returns an error if the value is not an array.
pub fn transform_join(value: &Value, separator: &str) -> Result<Value> {
    let parts: Vec<String> = expect_array(value)?
        .iter()
        .map(|item| match item {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect();
    Ok(Value::String(parts.join(separator)))
}

/// First element whose `key` path equals `expected`, else absent
///
/// # Errors
///
/// Returns an error if the value is not an array.
pub fn transform_find(value: &Value, key: &str, expected: &Value) -> Result<Value> {
    Ok(expect_array(value)?
        .iter()
        .find(|item| resolve_path(key, item) == *expected)
        .cloned()
        .unwrap_or(ABSENT))
}

/// Each element's `key` path, absent where missing
///
/// # Errors
///
/// Returns an error if the value is not an array.
pub fn transform_pluck(value: &Value, key: &str) -> Result<Value> {
    Ok(Value::Array(
        expect_array(value)?
            .iter()
            .map(|item| resolve_path(key, item))
            .collect(),
    ))
}

/// Stable ascending sort by the `key` path of each element
///
/// Numbers sort before strings; elements whose key is missing or of another
/// type sort last, keeping their relative order.
///
/// # Errors
///
/// Returns an error if the value is not an array.
pub fn transform_sort_by(value: &Value, key: &str) -> Result<Value> {
    let mut keyed: Vec<(Value, Value)> = expect_array(value)?
        .iter()
        .map(|item| (resolve_path(key, item), item.clone()))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b));
    Ok(Value::Array(keyed.into_iter().map(|(_, item)| item).collect()))
}

fn compare_keys(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => key_rank(a).cmp(&key_rank(b)),
    }
}

fn key_rank(key: &Value) -> u8 {
    match key {
        Value::Number(_) => 0,
        Value::String(_) => 1,
        _ => 2,
    }
}

fn expect_array(value: &Value) -> Result<&Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| Error::type_mismatch("array", value))
}
