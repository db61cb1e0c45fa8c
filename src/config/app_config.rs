use std::time::Duration;

use serde::Deserialize;

use crate::domain::CrawlStrategy;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Prefix the load endpoints are mounted under
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings shared by the resource resolver and the format loaders
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    /// jq-style filter applied to JSON documents
    #[serde(default = "default_jq_schema")]
    pub jq_schema: String,
    /// Require JSON filter results to be strings and use them verbatim
    #[serde(default)]
    pub text_content: bool,
    #[serde(default = "default_csv_delimiter")]
    pub csv_delimiter: char,
    /// Timeout for remote fetches; unset means wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Accept local filesystem paths in remote load requests
    #[serde(default = "default_true")]
    pub allow_local_paths: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    #[serde(default)]
    pub strategy: CrawlStrategy,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

/// Prometheus metrics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_jq_schema() -> String {
    ".".to_string()
}

fn default_csv_delimiter() -> char {
    ','
}

fn default_user_agent() -> String {
    format!("document-loader-connector/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_max_depth() -> usize {
    2
}

fn default_max_pages() -> usize {
    100
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_prefix: default_api_prefix(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            jq_schema: default_jq_schema(),
            text_content: false,
            csv_delimiter: default_csv_delimiter(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
            max_upload_bytes: default_max_upload_bytes(),
            allow_local_paths: true,
        }
    }
}

impl LoaderConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            strategy: CrawlStrategy::default(),
            max_depth: default_max_depth(),
            max_pages: default_max_pages(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_metrics_path(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.api_prefix, "/api/v1");
        assert_eq!(config.loader.jq_schema, ".");
        assert_eq!(config.loader.csv_delimiter, ',');
        assert!(config.loader.request_timeout().is_none());
        assert!(config.loader.allow_local_paths);
        assert_eq!(config.crawl.strategy, CrawlStrategy::Recursive);
        assert_eq!(config.crawl.max_depth, 2);
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "server": { "port": 9000 },
            "crawl": { "strategy": "single_page" },
            "loader": { "request_timeout_secs": 15 }
        }))
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.crawl.strategy, CrawlStrategy::SinglePage);
        assert_eq!(config.crawl.max_pages, 100);
        assert_eq!(config.loader.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.loader.jq_schema, ".");
    }

    #[test]
    fn test_log_format_parsing() {
        let format: LogFormat = serde_json::from_str("\"json\"").unwrap();
        assert!(matches!(format, LogFormat::Json));
    }
}
