//! Factory for creating document loaders

use std::collections::HashMap;
use std::sync::Arc;

use super::{CsvLoader, HtmlLoader, JsonLoader, PdfLoader, TextLoader, WordLoader};
use crate::config::LoaderConfig;
use crate::domain::{DocumentLoader, DomainError, LoaderType};

/// Factory for creating document loaders
#[derive(Debug, Default)]
pub struct LoaderFactory;

impl LoaderFactory {
    /// Create a loader for the given type
    pub fn create(
        loader_type: LoaderType,
        config: &LoaderConfig,
    ) -> Result<Arc<dyn DocumentLoader>, DomainError> {
        match loader_type {
            LoaderType::Pdf => Ok(Arc::new(PdfLoader::new())),
            LoaderType::Word => Ok(Arc::new(WordLoader::new())),
            LoaderType::Json => Ok(Arc::new(
                JsonLoader::new()
                    .with_jq_schema(&config.jq_schema)?
                    .with_text_content(config.text_content),
            )),
            LoaderType::Csv => {
                let delimiter = u8::try_from(config.csv_delimiter)
                    .ok()
                    .filter(u8::is_ascii)
                    .ok_or_else(|| {
                        DomainError::validation(format!(
                            "CSV delimiter must be a single ASCII character, got '{}'",
                            config.csv_delimiter
                        ))
                    })?;
                Ok(Arc::new(CsvLoader::new().with_delimiter(delimiter)))
            }
            LoaderType::Text => Ok(Arc::new(TextLoader::new())),
            LoaderType::Html => Ok(Arc::new(HtmlLoader::new())),
        }
    }

    /// Create one loader per type
    pub fn create_all(
        config: &LoaderConfig,
    ) -> Result<HashMap<LoaderType, Arc<dyn DocumentLoader>>, DomainError> {
        LoaderType::ALL
            .iter()
            .map(|&loader_type| Ok((loader_type, Self::create(loader_type, config)?)))
            .collect()
    }

    /// Get a list of all supported file extensions
    pub fn supported_extensions() -> Vec<&'static str> {
        LoaderType::ALL
            .iter()
            .flat_map(|t| t.extensions().iter().copied())
            .collect()
    }
}
