//! Plain text document loader

use async_trait::async_trait;

use crate::domain::{Document, DocumentLoader, DomainError, LoaderInput};

/// Loader for plain text files
#[derive(Debug, Clone, Default)]
pub struct TextLoader;

impl TextLoader {
    /// Create a new text loader
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentLoader for TextLoader {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["txt"]
    }

    async fn load(&self, input: LoaderInput) -> Result<Vec<Document>, DomainError> {
        let content = input.read_text("text").await?;

        Ok(vec![Document::new(content).with_source(input.source)])
    }
}
