//! Frontmatter types and data structures.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Represents parsed YAML frontmatter from a markdown document.
///
/// Fields are held in a [`Mapping`], so keys keep the order they were
/// written in across a parse/serialize round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter {
    /// Fields as key-value pairs, in document order.
    pub fields: Mapping,
}

impl Frontmatter {
    /// Look up a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Set a top-level field.
    ///
    /// An existing key is overwritten in place; a new key is appended last.
    pub fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(Value::String(key.to_string()), value);
    }

    /// Top-level string keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().filter_map(Value::as_str)
    }
}

/// Raw location of a frontmatter block inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrontmatterBlock<'a> {
    /// YAML text between the fences (fences excluded).
    pub yaml: &'a str,
    /// Byte offset just past the closing fence and the blank lines after it.
    pub end: usize,
}

/// Result of splitting frontmatter from markdown.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Parsed frontmatter (if present).
    pub frontmatter: Option<Frontmatter>,
    /// The markdown body (everything after frontmatter).
    pub body: String,
}
