//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CrawlConfig, LoaderConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
};
