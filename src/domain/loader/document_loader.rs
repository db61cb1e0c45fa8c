//! Document loader trait and types

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::domain::{Document, DomainError};

/// Input for a document loader
#[derive(Debug, Clone)]
pub struct LoaderInput {
    /// Local file to read (possibly a staged copy of remote content)
    pub path: PathBuf,
    /// Reference reported as `source` metadata
    pub source: String,
}

impl LoaderInput {
    /// Create input for a local file that is its own source
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let source = path.to_string_lossy().into_owned();

        Self { path, source }
    }

    /// Override the reported source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file
    pub async fn read_bytes(&self) -> Result<Vec<u8>, DomainError> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            DomainError::io(format!("Failed to read '{}': {}", self.path.display(), e))
        })
    }

    /// Read the whole file as UTF-8
    pub async fn read_text(&self, format: &str) -> Result<String, DomainError> {
        let bytes = self.read_bytes().await?;

        String::from_utf8(bytes)
            .map_err(|e| DomainError::parse(format, format!("Invalid UTF-8: {}", e)))
    }
}

/// Trait for document loaders
#[async_trait]
pub trait DocumentLoader: Send + Sync + Debug {
    /// Short name used in logs and metrics
    fn name(&self) -> &'static str;

    /// Get supported file extensions (e.g., ["csv"])
    fn supported_extensions(&self) -> &[&str];

    /// Load a file into documents
    async fn load(&self, input: LoaderInput) -> Result<Vec<Document>, DomainError>;

    /// Check if this loader supports a given filename
    fn supports_file(&self, filename: &str) -> bool {
        let ext = match filename.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => return false,
        };

        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(&ext))
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Mock document loader for testing
    #[derive(Debug)]
    pub struct MockDocumentLoader {
        extensions: Vec<&'static str>,
        result: Mutex<Option<Result<Vec<Document>, String>>>,
        calls: AtomicUsize,
        last_input: Mutex<Option<LoaderInput>>,
    }

    impl MockDocumentLoader {
        pub fn new() -> Self {
            Self {
                extensions: vec!["txt"],
                result: Mutex::new(None),
                calls: AtomicUsize::new(0),
                last_input: Mutex::new(None),
            }
        }

        pub fn with_result(self, documents: Vec<Document>) -> Self {
            *self.result.lock().unwrap() = Some(Ok(documents));
            self
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.result.lock().unwrap() = Some(Err(error.into()));
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_input(&self) -> Option<LoaderInput> {
            self.last_input.lock().unwrap().clone()
        }
    }

    impl Default for MockDocumentLoader {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl DocumentLoader for MockDocumentLoader {
        fn name(&self) -> &'static str {
            "mock"
        }

        fn supported_extensions(&self) -> &[&str] {
            &self.extensions
        }

        async fn load(&self, input: LoaderInput) -> Result<Vec<Document>, DomainError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_input.lock().unwrap() = Some(input.clone());

            if let Some(result) = self.result.lock().unwrap().clone() {
                return result.map_err(|e| DomainError::parse("mock", e));
            }

            let content = input.read_text("mock").await?;
            Ok(vec![Document::new(content).with_source(input.source)])
        }
    }
}
