//! CSV document loader

use async_trait::async_trait;

use crate::domain::{Document, DocumentLoader, DomainError, LoaderInput};

/// Loader for CSV files.
///
/// Each data row becomes one document made of `header: value` lines, with the
/// zero-based `row` index in its metadata.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    delimiter: u8,
}

impl CsvLoader {
    /// Create a comma-delimited loader
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load documents from CSV bytes
    pub fn load_bytes(&self, raw: &[u8], source: &str) -> Result<Vec<Document>, DomainError> {
        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(raw);

        let headers = reader
            .headers()
            .map_err(|e| DomainError::parse("csv", e.to_string()))?
            .clone();

        let mut documents = Vec::new();

        for (row, record) in reader.records().enumerate() {
            let record = record.map_err(|e| DomainError::parse("csv", e.to_string()))?;

            let content = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| format!("{}: {}", header.trim(), value.trim()))
                .collect::<Vec<_>>()
                .join("\n");

            documents.push(
                Document::new(content)
                    .with_source(source)
                    .with_metadata("row", row),
            );
        }

        Ok(documents)
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentLoader for CsvLoader {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn supported_extensions(&self) -> &[&str] {
        &["csv"]
    }

    async fn load(&self, input: LoaderInput) -> Result<Vec<Document>, DomainError> {
        let raw = input.read_bytes().await?;

        self.load_bytes(&raw, &input.source)
    }
}
