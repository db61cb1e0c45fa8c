//! Load requests and typed load outcomes

use serde::{Deserialize, Serialize};

use super::Document;
use crate::domain::DomainError;

/// A reference to content: a local path or a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadRequest {
    pub url: String,
}

impl LoadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Reject blank references; everything else is accepted as-is
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.url.trim().is_empty() {
            return Err(DomainError::validation("url cannot be empty"));
        }

        Ok(())
    }
}

/// Result of dispatching a reference to a loader
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// A loader ran and produced these documents (possibly none)
    Loaded(Vec<Document>),
    /// No loader is registered for this extension
    Unsupported { extension: String },
}

impl LoadOutcome {
    /// Documents produced, empty for unsupported references
    pub fn documents(&self) -> &[Document] {
        match self {
            Self::Loaded(docs) => docs,
            Self::Unsupported { .. } => &[],
        }
    }

    /// True when no documents were produced for whatever reason
    pub fn is_empty(&self) -> bool {
        self.documents().is_empty()
    }

    /// Convert into documents, treating an empty outcome as unsupported
    pub fn into_documents(self) -> Result<Vec<Document>, DomainError> {
        match self {
            Self::Loaded(docs) if !docs.is_empty() => Ok(docs),
            Self::Loaded(_) => Err(DomainError::unsupported("")),
            Self::Unsupported { extension } => Err(DomainError::unsupported(extension)),
        }
    }
}
