//! Word (.docx) document loader

use std::io::{Cursor, Read};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::domain::{Document, DocumentLoader, DomainError, LoaderInput};

const DOCUMENT_PART: &str = "word/document.xml";

/// Loader for Word documents, producing a single document.
///
/// Legacy binary `.doc` files are routed here too and fail to parse.
#[derive(Debug, Clone, Default)]
pub struct WordLoader;

impl WordLoader {
    /// Create a new Word loader
    pub fn new() -> Self {
        Self
    }

    /// Extract the body text of a `.docx` archive
    pub fn extract_text(raw: &[u8]) -> Result<String, DomainError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(raw))
            .map_err(|e| DomainError::parse("word", format!("Invalid Word archive: {}", e)))?;

        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(|e| DomainError::parse("word", format!("Missing {}: {}", DOCUMENT_PART, e)))?
            .read_to_string(&mut xml)
            .map_err(|e| DomainError::parse("word", format!("Failed to read {}: {}", DOCUMENT_PART, e)))?;

        Self::xml_to_text(&xml)
    }

    fn xml_to_text(xml: &str) -> Result<String, DomainError> {
        let mut reader = Reader::from_str(xml);
        let mut text = String::new();
        let mut in_text_run = false;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| DomainError::parse("word", format!("Malformed document XML: {}", e)))?;

            match event {
                Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
                Event::End(e) => match e.local_name().as_ref() {
                    b"t" => in_text_run = false,
                    b"p" => text.push('\n'),
                    _ => {}
                },
                Event::Empty(e) => match e.local_name().as_ref() {
                    b"tab" => text.push('\t'),
                    b"br" | b"cr" => text.push('\n'),
                    _ => {}
                },
                Event::Text(e) if in_text_run => {
                    let chunk = e
                        .unescape()
                        .map_err(|e| DomainError::parse("word", e.to_string()))?;
                    text.push_str(&chunk);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(text.trim().to_string())
    }
}

#[async_trait]
impl DocumentLoader for WordLoader {
    fn name(&self) -> &'static str {
        "word"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["docx", "doc"]
    }

    async fn load(&self, input: LoaderInput) -> Result<Vec<Document>, DomainError> {
        let raw = input.read_bytes().await?;

        let text = tokio::task::spawn_blocking(move || Self::extract_text(&raw))
            .await
            .map_err(|e| DomainError::internal(format!("Word extraction task failed: {}", e)))??;

        Ok(vec![Document::new(text).with_source(input.source)])
    }
}
