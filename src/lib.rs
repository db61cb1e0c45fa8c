//! Document Loader API
//!
//! Turns uploaded files, local paths, remote URLs and crawled web pages into
//! normalized documents. Supported formats:
//! - PDF (one document per page)
//! - Word (.docx)
//! - plain text (.txt)
//! - JSON (jq-style filter)
//! - CSV (one document per row)
//! - HTML

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::services::DocumentService;

/// Build application state from configuration
pub fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let document_service = DocumentService::from_config(config)?;

    Ok(AppState::new(Arc::new(document_service), config.clone()))
}
