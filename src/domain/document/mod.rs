//! Document domain types

mod entity;
mod request;

pub use entity::{Document, DocumentMetadata};
pub use request::{LoadOutcome, LoadRequest};
