//! JSON document loader

use async_trait::async_trait;
use serde_json::Value;

use super::jq::{type_name, JqFilter};
use crate::domain::{Document, DocumentLoader, DomainError, LoaderInput};

/// Loader for JSON files.
///
/// Every value selected by the jq filter becomes one document, numbered by
/// `seq_num` starting at 1.
#[derive(Debug, Clone, Default)]
pub struct JsonLoader {
    filter: JqFilter,
    text_content: bool,
}

impl JsonLoader {
    /// Create a loader using the identity filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a jq-style filter to select content
    pub fn with_jq_schema(mut self, jq_schema: &str) -> Result<Self, DomainError> {
        self.filter = JqFilter::parse(jq_schema)?;
        Ok(self)
    }

    /// Require every selected value to be a string
    pub fn with_text_content(mut self, text_content: bool) -> Self {
        self.text_content = text_content;
        self
    }

    pub fn filter(&self) -> &JqFilter {
        &self.filter
    }

    /// Load documents from raw JSON text
    pub fn load_str(&self, raw: &str, source: &str) -> Result<Vec<Document>, DomainError> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| DomainError::parse("json", format!("Invalid JSON: {}", e)))?;

        self.filter
            .apply(&value)?
            .into_iter()
            .enumerate()
            .map(|(i, selected)| {
                let content = self.page_content(selected)?;

                Ok(Document::new(content)
                    .with_source(source)
                    .with_metadata("seq_num", i + 1))
            })
            .collect()
    }

    fn page_content(&self, value: Value) -> Result<String, DomainError> {
        match value {
            Value::String(s) => Ok(s),
            other if self.text_content => Err(DomainError::parse(
                "json",
                format!(
                    "Expected page_content to be a string, got {} instead; \
                     disable text_content to load non-string values",
                    type_name(&other)
                ),
            )),
            Value::Null => Ok(String::new()),
            Value::Object(map) if map.is_empty() => Ok(String::new()),
            other => serde_json::to_string(&other)
                .map_err(|e| DomainError::parse("json", format!("Failed to serialize JSON: {}", e))),
        }
    }
}

#[async_trait]
impl DocumentLoader for JsonLoader {
    fn name(&self) -> &'static str {
        "json"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    async fn load(&self, input: LoaderInput) -> Result<Vec<Document>, DomainError> {
        let raw = input.read_text("json").await?;

        self.load_str(&raw, &input.source)
    }
}
