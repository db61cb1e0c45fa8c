//! Web crawl strategies

mod recursive;
mod single_page;

use std::sync::Arc;

pub use recursive::RecursiveCrawler;
pub use single_page::SinglePageCrawler;

use crate::config::CrawlConfig;
use crate::domain::{CrawlStrategy, Crawler};
use crate::infrastructure::http_client::RemoteFetcher;

/// Factory for creating crawlers
#[derive(Debug, Default)]
pub struct CrawlerFactory;

impl CrawlerFactory {
    /// Create the crawler selected by configuration
    pub fn create(config: &CrawlConfig, fetcher: Arc<dyn RemoteFetcher>) -> Arc<dyn Crawler> {
        match config.strategy {
            CrawlStrategy::Recursive => Arc::new(RecursiveCrawler::new(
                fetcher,
                config.max_depth,
                config.max_pages,
            )),
            CrawlStrategy::SinglePage => Arc::new(SinglePageCrawler::new(fetcher)),
        }
    }
}
