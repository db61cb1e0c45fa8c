use async_trait::async_trait;
use bytes::Bytes;

use crate::config::LoaderConfig;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Body and content type of a successful fetch
#[derive(Debug, Clone)]
pub struct FetchedContent {
    /// Final URL after redirects
    pub url: String,
    pub content_type: Option<String>,
    pub body: Bytes,
}

impl FetchedContent {
    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_html(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ct.to_lowercase().starts_with("text/html"))
            .unwrap_or(false)
    }
}

/// Trait for remote GET operations (for mocking)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteFetcher: Send + Sync + std::fmt::Debug {
    /// GET a URL; any status other than 200 is an error
    async fn get(&self, url: &str) -> Result<FetchedContent, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Build a client honouring the loader's user agent and timeout
    pub fn from_config(config: &LoaderConfig) -> Result<Self, DomainError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());

        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteFetcher for HttpClient {
    async fn get(&self, url: &str) -> Result<FetchedContent, DomainError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::fetch(url, format!("Request failed: {}", e)))?;

        let status = response.status();

        if status != reqwest::StatusCode::OK {
            return Err(DomainError::fetch_status(url, status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::fetch(url, format!("Failed to read body: {}", e)))?;

        Ok(FetchedContent {
            url: final_url,
            content_type,
            body,
        })
    }
}
