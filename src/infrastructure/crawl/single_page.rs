//! Single page reader

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{CrawlStrategy, Crawler, Document, DomainError};
use crate::infrastructure::http_client::RemoteFetcher;
use crate::infrastructure::loaders::HtmlLoader;

/// Fetches only the requested page
#[derive(Debug, Clone)]
pub struct SinglePageCrawler {
    fetcher: Arc<dyn RemoteFetcher>,
}

impl SinglePageCrawler {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl Crawler for SinglePageCrawler {
    fn strategy(&self) -> CrawlStrategy {
        CrawlStrategy::SinglePage
    }

    async fn crawl(&self, url: &str) -> Result<Vec<Document>, DomainError> {
        debug!(url = %url, "Reading page");

        let content = self.fetcher.get(url).await?;
        let extracted = HtmlLoader::extract(&content.text());

        Ok(vec![extracted.into_document(url)])
    }
}
