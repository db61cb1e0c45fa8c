//! Normalized document produced by every loader

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata attached to a loaded document
pub type DocumentMetadata = Map<String, Value>;

/// A unit of extracted content with its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text content
    pub page_content: String,
    /// Loader-specific metadata (always carries `source`)
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Create a document with empty metadata
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Map::new(),
        }
    }

    /// Set the `source` metadata entry
    pub fn with_source(self, source: impl Into<String>) -> Self {
        self.with_metadata("source", Value::String(source.into()))
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The `source` metadata entry, if any
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(Value::as_str)
    }

    pub fn is_blank(&self) -> bool {
        self.page_content.trim().is_empty()
    }
}
