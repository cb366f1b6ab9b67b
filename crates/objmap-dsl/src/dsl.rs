//! Mapping DSL
//!
//! Serde model of mapping documents and the YAML/JSON loader.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// A complete mapping document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MappingDocument {
    /// Mapping name
    pub name: String,

    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Output key to field spec
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,
}

/// How one output field is derived
///
/// Classified by shape, in order: string, sequence, mapping with a truthy
/// `pick` that is a string or sequence. Anything else is kept as
/// [`FieldSpec::Other`] and resolves to nothing.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum FieldSpec {
    /// Single dot-delimited path
    Path(String),

    /// List of paths
    PathList(Vec<String>),

    /// Pick with an optional compute
    PickCompute(PickSpec),

    /// Unrecognised shape
    Other(Value),
}

/// `pick` plus optional `compute`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PickSpec {
    pub pick: PickTarget,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compute: Option<ComputeSpec>,
}

/// Target of a pick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum PickTarget {
    Path(String),
    List(Vec<String>),
}

/// Compute operation applied to a picked value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ComputeSpec {
    /// Convert to uppercase
    Uppercase,

    /// Convert to lowercase
    Lowercase,

    /// Trim whitespace
    Trim,

    /// Split string and take one part
    Split { delimiter: String, index: usize },

    /// Replace null or empty string
    Default { value: Value },

    /// Format number
    NumberFormat {
        decimals: u32,
        #[serde(default)]
        thousands_sep: Option<String>,
    },

    /// Join array elements
    Join {
        #[serde(default)]
        separator: String,
    },

    /// First array element whose `key` equals `value`
    Find { key: String, value: Value },

    /// Each array element's `key`
    Pluck { key: String },

    /// Stable sort of an array by element `key`
    SortBy { key: String },

    /// Apply a nested mapping to each array element
    Each { mapping: BTreeMap<String, FieldSpec> },

    /// Apply operations left to right
    Chain { ops: Vec<ComputeSpec> },

    /// Call a registered compute function
    Call { function: String },
}

impl<'de> Deserialize<'de> for FieldSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::classify(raw).map_err(D::Error::custom)
    }
}

impl FieldSpec {
    /// Classify a raw value.
    ///
    /// Only a malformed `compute` under a well-formed `pick` is an error, so
    /// a misspelt operation is reported instead of silently dropping the
    /// field.
    fn classify(raw: Value) -> Result<Self, serde_json::Error> {
        match raw {
            Value::String(path) => Ok(Self::Path(path)),
            Value::Array(items) => Ok(Self::PathList(items.iter().map(path_text).collect())),
            Value::Object(mut fields) => {
                let pick = match fields.get("pick") {
                    Some(Value::String(path)) if !path.is_empty() => PickTarget::Path(path.clone()),
                    Some(Value::Array(items)) => {
                        PickTarget::List(items.iter().map(path_text).collect())
                    }
                    _ => return Ok(Self::Other(Value::Object(fields))),
                };
                let compute = fields
                    .remove("compute")
                    .filter(|compute| !compute.is_null())
                    .map(ComputeSpec::deserialize)
                    .transpose()?;
                Ok(Self::PickCompute(PickSpec { pick, compute }))
            }
            other => Ok(Self::Other(other)),
        }
    }
}

fn path_text(item: &Value) -> String {
    match item {
        Value::String(path) => path.clone(),
        other => other.to_string(),
    }
}

/// DSL Parser
pub struct MappingDsl;

/// Parse error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl ParseError {
    fn without_location(message: String) -> Self {
        Self {
            message,
            line: None,
            column: None,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, " at line {line}, column {col}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl MappingDsl {
    /// Parse a mapping document from YAML
    ///
    /// # Errors
    ///
    /// Returns an error when YAML parsing fails.
    pub fn parse(yaml: &str) -> Result<MappingDocument, ParseError> {
        serde_yaml::from_str(yaml).map_err(|e| ParseError {
            message: format!("Failed to parse DSL: {e}"),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
        })
    }

    /// Parse a mapping document from JSON
    ///
    /// # Errors
    ///
    /// Returns an error when JSON parsing fails.
    pub fn parse_json(json: &str) -> Result<MappingDocument, ParseError> {
        serde_json::from_str(json).map_err(|e| ParseError {
            message: format!("Failed to parse DSL: {e}"),
            line: Some(e.line()),
            column: Some(e.column()),
        })
    }

    /// Parse a mapping document from a file
    ///
    /// Files ending in `.json` are read as JSON, everything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn parse_file(path: &Path) -> Result<MappingDocument, ParseError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ParseError::without_location(format!("Failed to read file: {e}"))
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), json = is_json, "Loading mapping document");
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse(&content)
        }
    }

    /// Serialize a mapping document to YAML
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn to_yaml(document: &MappingDocument) -> Result<String, ParseError> {
        serde_yaml::to_string(document)
            .map_err(|e| ParseError::without_location(format!("Failed to serialize: {e}")))
    }
}
