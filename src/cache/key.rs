//! Cache Key Builder
//!
//! Derives a stable key from an operation name and an unordered parameter map.
//! The output alphabet is `[A-Za-z0-9_]`. Encoding is lossy and not
//! reversible; equal inputs always give equal keys.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Characters of free text kept when it is used as a key parameter.
pub const FREE_TEXT_KEY_CHARS: usize = 100;

// == Param Value ==
/// Scalar parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(n) => write!(f, "{n}"),
            ParamValue::Float(n) => write!(f, "{n}"),
            ParamValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Str(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

// == Cache Key ==
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// == Build Key ==
/// Builds `{operation}_{k1}:{v1}_{k2}:{v2}…` with keys sorted, then replaces
/// every character outside `[A-Za-z0-9_]` with `_`.
///
/// Insertion order of `params` never affects the result. A repeated name
/// keeps its last value.
pub fn build_key<I, K, V>(operation: &str, params: I) -> CacheKey
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ParamValue>,
{
    let sorted: BTreeMap<String, ParamValue> = params
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}:{v}"))
        .collect::<Vec<_>>()
        .join("_");

    let raw = format!("{operation}_{joined}");
    CacheKey(
        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect(),
    )
}

/// First `FREE_TEXT_KEY_CHARS` characters of `text`.
///
/// Inputs sharing that prefix share a cache entry.
pub fn truncate_for_key(text: &str) -> String {
    text.chars().take(FREE_TEXT_KEY_CHARS).collect()
}
