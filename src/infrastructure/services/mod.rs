//! Infrastructure services

mod document_service;

pub use document_service::{DocumentService, DocumentServiceTrait};

#[cfg(test)]
pub use document_service::MockDocumentServiceTrait;
