//! Language catalogs and dotted key-path lookup.
//!
//! A catalog is a JSON object whose values nest arbitrarily through objects
//! and arrays. Leaves are strings, numbers or booleans; anything else
//! (`null`, or a path that stops on a container) does not resolve.

use crate::error::{json_kind, I18nError, Result};
use crate::i18n::Language;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator between key-path segments.
pub const KEY_SEPARATOR: char = '.';

/// The translations for one language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Map<String, Value>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a JSON value, which must be an object.
    ///
    /// # Example
    /// ```
    /// use mini_i18n::{Catalog, Language};
    /// use serde_json::json;
    ///
    /// let catalog = Catalog::from_value(&Language::new("en"), json!({ "hello": "Hello" }))?;
    /// assert_eq!(catalog.lookup("hello"), Some("Hello".to_string()));
    /// # Ok::<(), mini_i18n::I18nError>(())
    /// ```
    pub fn from_value(language: &Language, value: Value) -> Result<Self> {
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(I18nError::InvalidCatalog {
                language: language.clone(),
                found: json_kind(&other),
            }),
        }
    }

    /// Insert or replace a top-level entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Builder form of [`Catalog::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Whether the catalog has no top-level entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a dotted key path to its stringified leaf.
    ///
    /// Returns `None` for an absent key, an out-of-range or non-numeric array
    /// index, a path that descends into a scalar, or a path ending on a
    /// container or `null`.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut segments = key.split(KEY_SEPARATOR);
        let first = segments.next()?;
        let mut node = self.entries.get(first)?;

        for segment in segments {
            node = descend(node, segment)?;
        }

        stringify_leaf(node)
    }

    /// Every leaf key path in the catalog, in map iteration order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for (key, value) in &self.entries {
            collect_leaf_paths(value, key.clone(), &mut paths);
        }
        paths
    }
}

impl From<Map<String, Value>> for Catalog {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

fn descend<'a>(node: &'a Value, segment: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(parse_index(segment)?),
        _ => None,
    }
}

/// Parse an array index segment: plain decimal digits, no sign, no leading zeros.
fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if segment.len() > 1 && segment.starts_with('0') {
        return None;
    }
    segment.parse().ok()
}

fn stringify_leaf(value: &Value) -> Option<String> {
    match value {
        // Empty strings count as present, not as missing
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn collect_leaf_paths(value: &Value, prefix: String, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                collect_leaf_paths(child, format!("{}{}{}", prefix, KEY_SEPARATOR, key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect_leaf_paths(child, format!("{}{}{}", prefix, KEY_SEPARATOR, index), out);
            }
        }
        Value::Null => {}
        _ => out.push(prefix),
    }
}
