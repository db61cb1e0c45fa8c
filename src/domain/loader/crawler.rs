//! Web crawl strategy trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Document, DomainError};

#[cfg(test)]
use mockall::automock;

/// Available crawl strategies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStrategy {
    /// Follow same-site links breadth-first up to a maximum depth
    #[default]
    Recursive,
    /// Fetch only the requested page
    SinglePage,
}

impl CrawlStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recursive => "recursive",
            Self::SinglePage => "single_page",
        }
    }
}

/// Crawls a web page (and possibly its neighbours) into documents
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Crawler: Send + Sync + std::fmt::Debug {
    /// Strategy implemented by this crawler
    fn strategy(&self) -> CrawlStrategy;

    /// Crawl starting at `url`
    async fn crawl(&self, url: &str) -> Result<Vec<Document>, DomainError>;
}
