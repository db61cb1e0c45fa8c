//! Infrastructure layer - External service implementations

pub mod crawl;
pub mod http_client;
pub mod loaders;
pub mod logging;
pub mod observability;
pub mod resource;
pub mod services;
