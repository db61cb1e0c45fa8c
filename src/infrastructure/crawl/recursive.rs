//! Recursive same-site crawler

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::{CrawlStrategy, Crawler, Document, DomainError};
use crate::infrastructure::http_client::{FetchedContent, RemoteFetcher};
use crate::infrastructure::loaders::HtmlLoader;

/// Maximum concurrent requests during crawl
const MAX_CONCURRENT_REQUESTS: usize = 5;

/// Breadth-first crawler following links under the start URL.
///
/// The start page is depth 0; links are followed while the next depth is
/// below `max_depth`, so the default of 2 loads the start page and the pages
/// it links to. Linked pages not served as `text/html` are skipped.
#[derive(Debug, Clone)]
pub struct RecursiveCrawler {
    fetcher: Arc<dyn RemoteFetcher>,
    max_depth: usize,
    max_pages: usize,
}

impl RecursiveCrawler {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>, max_depth: usize, max_pages: usize) -> Self {
        Self {
            fetcher,
            max_depth: max_depth.max(1),
            max_pages: max_pages.max(1),
        }
    }

    /// Links on a page that stay under `prefix`, fragments stripped
    fn extract_links(document: &Html, page_url: &Url, prefix: &str) -> Vec<String> {
        let link_selector = match Selector::parse("a[href]") {
            Ok(s) => s,
            Err(_) => return vec![],
        };

        document
            .select(&link_selector)
            .filter_map(|el| el.value().attr("href"))
            .filter_map(|href| page_url.join(href).ok())
            .filter(|url| url.scheme() == "http" || url.scheme() == "https")
            .map(|mut url| {
                url.set_fragment(None);
                url.to_string()
            })
            .filter(|url| url.starts_with(prefix))
            .collect()
    }

    async fn fetch_level(
        &self,
        urls: &[String],
    ) -> Vec<(String, Result<FetchedContent, DomainError>)> {
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_REQUESTS));
        let mut tasks = JoinSet::new();

        for (index, url) in urls.iter().cloned().enumerate() {
            let fetcher = self.fetcher.clone();
            let sem = semaphore.clone();

            tasks.spawn(async move {
                let _permit = sem.acquire_owned().await;
                debug!(url = %url, "Fetching page");
                let result = fetcher.get(&url).await;
                (index, url, result)
            });
        }

        let mut results = Vec::with_capacity(urls.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => warn!(error = %e, "Crawl task failed"),
            }
        }

        results.sort_by_key(|(index, _, _)| *index);
        results
            .into_iter()
            .map(|(_, url, result)| (url, result))
            .collect()
    }
}

#[async_trait]
impl Crawler for RecursiveCrawler {
    fn strategy(&self) -> CrawlStrategy {
        CrawlStrategy::Recursive
    }

    async fn crawl(&self, url: &str) -> Result<Vec<Document>, DomainError> {
        let mut start = Url::parse(url)
            .map_err(|e| DomainError::validation(format!("Invalid crawl URL '{}': {}", url, e)))?;
        start.set_fragment(None);
        let prefix = start.to_string();

        info!(
            url = %prefix,
            max_depth = self.max_depth,
            max_pages = self.max_pages,
            "Starting crawl"
        );

        let mut visited: HashSet<String> = HashSet::new();
        let mut documents = Vec::new();
        let mut current_level = vec![prefix.clone()];
        visited.insert(prefix.clone());

        for depth in 0..self.max_depth {
            if current_level.is_empty() || documents.len() >= self.max_pages {
                break;
            }

            current_level.truncate(self.max_pages - documents.len());
            debug!(depth, urls_at_level = current_level.len(), "Processing depth level");

            let mut next_level = Vec::new();

            for (page_url, result) in self.fetch_level(&current_level).await {
                let content = match result {
                    Ok(content) => content,
                    Err(e) if depth == 0 => return Err(e),
                    Err(e) => {
                        warn!(url = %page_url, error = %e, "Skipping page");
                        continue;
                    }
                };

                if depth > 0 && !content.is_html() {
                    debug!(
                        url = %page_url,
                        content_type = ?content.content_type,
                        "Skipping non-HTML page"
                    );
                    continue;
                }

                let raw = content.text();
                documents.push(HtmlLoader::extract(&raw).into_document(page_url.as_str()));

                if depth + 1 >= self.max_depth {
                    continue;
                }

                let Ok(base) = Url::parse(&content.url).or_else(|_| Url::parse(&page_url)) else {
                    continue;
                };
                let html = Html::parse_document(&raw);

                for link in Self::extract_links(&html, &base, &prefix) {
                    if visited.insert(link.clone()) {
                        next_level.push(link);
                    }
                }
            }

            current_level = next_level;
        }

        info!(url = %prefix, pages = documents.len(), "Crawl complete");

        Ok(documents)
    }
}
