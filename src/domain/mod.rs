//! Domain layer - Core types, traits and errors

pub mod document;
pub mod error;
pub mod loader;

pub use document::{Document, DocumentMetadata, LoadOutcome, LoadRequest};
pub use error::DomainError;
pub use loader::{
    extension_of, CrawlStrategy, Crawler, DocumentLoader, LoaderInput, LoaderType,
};

#[cfg(test)]
pub use loader::{MockCrawler, MockDocumentLoader};
