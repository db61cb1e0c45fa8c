//! Application state for shared services

use std::sync::Arc;

use crate::config::AppConfig;
use crate::infrastructure::services::DocumentServiceTrait;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub document_service: Arc<dyn DocumentServiceTrait>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(document_service: Arc<dyn DocumentServiceTrait>, config: AppConfig) -> Self {
        Self {
            document_service,
            config: Arc::new(config),
        }
    }
}
