//! v1 API endpoints

pub mod load;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/load/", post(load::load_document))
        .route("/load", post(load::load_document))
        .route("/load/remote", post(load::load_remote_document))
        .route("/load/crawl", post(load::crawl_website))
}
