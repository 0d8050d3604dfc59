//! The quote collection and its on-disk form
//!
//! Serialized as a flat JSON object of label → quote, nothing else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label → quote mapping
///
/// Kept sorted so the serialized file is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteCollection(BTreeMap<String, String>);

impl QuoteCollection {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the raw backing file content.
    ///
    /// Returns `None` for anything that is not a JSON object of strings:
    /// empty input, invalid UTF-8, malformed JSON, or non-string values.
    pub fn parse(content: &[u8]) -> Option<Self> {
        serde_json::from_slice(content).ok()
    }

    /// Serialize to the compact backing file form
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Insert or overwrite a quote, returning the previous one
    pub fn set(&mut self, label: String, quote: String) -> Option<String> {
        self.0.insert(label, quote)
    }

    /// Remove a quote, returning it if it was present
    pub fn remove(&mut self, label: &str) -> Option<String> {
        self.0.remove(label)
    }

    /// Look up a quote by exact label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(label, quote)` pairs in label order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for QuoteCollection {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
