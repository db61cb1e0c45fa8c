//! Document loading domain types and traits
//!
//! This module provides:
//! - `LoaderType`, the extension dispatch table
//! - `DocumentLoader` trait for reading a local file into documents
//! - `Crawler` trait for turning web pages into documents

pub mod crawler;
pub mod document_loader;
pub mod loader_type;

pub use crawler::{CrawlStrategy, Crawler};
pub use document_loader::{DocumentLoader, LoaderInput};
pub use loader_type::{extension_of, LoaderType};

#[cfg(test)]
pub use crawler::MockCrawler;
#[cfg(test)]
pub use document_loader::mock::MockDocumentLoader;
