//! Document loading service: extension dispatch, remote fallback and crawl

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::config::AppConfig;
use crate::domain::{
    extension_of, Crawler, Document, DocumentLoader, DomainError, LoadOutcome, LoadRequest,
    LoaderInput, LoaderType,
};
use crate::infrastructure::crawl::CrawlerFactory;
use crate::infrastructure::http_client::{HttpClient, RemoteFetcher};
use crate::infrastructure::loaders::{JsonLoader, LoaderFactory};
use crate::infrastructure::observability::{record_crawl, record_document_load, LoadOutcomeLabel};
use crate::infrastructure::resource::{is_valid_url, ResolvedResource, StagedUpload, UrlLoader};

#[cfg(test)]
use mockall::automock;

/// Trait for the document service (for dependency injection)
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait DocumentServiceTrait: Send + Sync + std::fmt::Debug {
    /// Dispatch a path or URL to the loader for its extension
    async fn load_file(&self, request: &LoadRequest) -> Result<LoadOutcome, DomainError>;

    /// Dispatch a staged upload by its original file name
    async fn load_upload(&self, upload: &StagedUpload) -> Result<LoadOutcome, DomainError>;

    /// Dispatch, falling back to the JSON API reader for empty remote results
    async fn load_remote(&self, request: &LoadRequest) -> Result<Vec<Document>, DomainError>;

    /// Read a URL as a JSON API response
    async fn fetch_from_api_endpoint(
        &self,
        request: &LoadRequest,
    ) -> Result<Vec<Document>, DomainError>;

    /// Crawl a web page with the configured strategy
    async fn web_crawl(&self, request: &LoadRequest) -> Result<Vec<Document>, DomainError>;
}

/// Document service implementation
#[derive(Debug)]
pub struct DocumentService {
    url_loader: UrlLoader,
    loaders: HashMap<LoaderType, Arc<dyn DocumentLoader>>,
    api_loader: JsonLoader,
    crawler: Arc<dyn Crawler>,
}

impl DocumentService {
    pub fn new(
        url_loader: UrlLoader,
        loaders: HashMap<LoaderType, Arc<dyn DocumentLoader>>,
        crawler: Arc<dyn Crawler>,
    ) -> Self {
        Self {
            url_loader,
            loaders,
            api_loader: JsonLoader::new(),
            crawler,
        }
    }

    /// Wire the HTTP client, loaders and crawler from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let fetcher: Arc<dyn RemoteFetcher> = Arc::new(HttpClient::from_config(&config.loader)?);

        let url_loader =
            UrlLoader::new(fetcher.clone()).with_local_paths(config.loader.allow_local_paths);
        let loaders = LoaderFactory::create_all(&config.loader)?;
        let crawler = CrawlerFactory::create(&config.crawl, fetcher);

        info!(
            extensions = ?LoaderFactory::supported_extensions(),
            crawl_strategy = crawler.strategy().as_str(),
            "Document service initialized"
        );

        Ok(Self::new(url_loader, loaders, crawler))
    }

    fn loader_for(&self, reference: &str) -> Option<Arc<dyn DocumentLoader>> {
        LoaderType::from_reference(reference).and_then(|t| self.loaders.get(&t).cloned())
    }

    fn unsupported(reference: &str) -> LoadOutcome {
        let extension = extension_of(reference).unwrap_or_default();
        info!(reference = %reference, extension = %extension, "File type not supported");
        record_document_load("none", LoadOutcomeLabel::Unsupported, 0, Duration::ZERO);

        LoadOutcome::Unsupported { extension }
    }

    fn finish(
        loader: &dyn DocumentLoader,
        reference: &str,
        result: Result<Vec<Document>, DomainError>,
        started: Instant,
    ) -> Result<LoadOutcome, DomainError> {
        match result {
            Ok(documents) => {
                let label = if documents.is_empty() {
                    LoadOutcomeLabel::Unsupported
                } else {
                    LoadOutcomeLabel::Success
                };
                record_document_load(loader.name(), label, documents.len(), started.elapsed());
                info!(
                    reference = %reference,
                    loader = loader.name(),
                    documents = documents.len(),
                    "Document loaded"
                );

                Ok(LoadOutcome::Loaded(documents))
            }
            Err(e) => {
                record_document_load(loader.name(), LoadOutcomeLabel::Error, 0, started.elapsed());
                error!(reference = %reference, loader = loader.name(), error = %e, "Error loading file");

                Err(e)
            }
        }
    }
}

fn release(resource: ResolvedResource, reference: &str) {
    if let Err(e) = resource.close() {
        warn!(reference = %reference, error = %e, "Failed to clean up temporary file");
    }
}

#[async_trait::async_trait]
impl DocumentServiceTrait for DocumentService {
    async fn load_file(&self, request: &LoadRequest) -> Result<LoadOutcome, DomainError> {
        request.validate()?;
        let reference = request.url.trim();

        let Some(loader) = self.loader_for(reference) else {
            return Ok(Self::unsupported(reference));
        };

        let started = Instant::now();
        let resource = match self.url_loader.resolve(reference).await {
            Ok(resource) => resource,
            Err(e) => return Self::finish(loader.as_ref(), reference, Err(e), started),
        };

        debug!(loader = loader.name(), path = %resource.path().display(), "Dispatching to loader");
        let input = LoaderInput::from_path(resource.path()).with_source(reference);
        let result = loader.load(input).await;
        release(resource, reference);

        Self::finish(loader.as_ref(), reference, result, started)
    }

    async fn load_upload(&self, upload: &StagedUpload) -> Result<LoadOutcome, DomainError> {
        let filename = upload.filename();

        let Some(loader) = self.loader_for(filename) else {
            return Ok(Self::unsupported(filename));
        };

        let started = Instant::now();
        let input = LoaderInput::from_path(upload.path()).with_source(filename);
        let result = loader.load(input).await;

        Self::finish(loader.as_ref(), filename, result, started)
    }

    async fn load_remote(&self, request: &LoadRequest) -> Result<Vec<Document>, DomainError> {
        let outcome = self.load_file(request).await?;

        if !outcome.is_empty() {
            return outcome.into_documents();
        }

        let reference = request.url.trim();
        if !is_valid_url(reference) {
            return outcome.into_documents();
        }

        info!(url = %reference, "No documents from dispatch, trying JSON API fallback");

        match self.fetch_from_api_endpoint(request).await {
            Ok(documents) if !documents.is_empty() => Ok(documents),
            Ok(_) => outcome.into_documents(),
            Err(e) => {
                warn!(url = %reference, error = %e, "JSON API fallback failed");
                outcome.into_documents()
            }
        }
    }

    async fn fetch_from_api_endpoint(
        &self,
        request: &LoadRequest,
    ) -> Result<Vec<Document>, DomainError> {
        request.validate()?;
        let reference = request.url.trim();
        let started = Instant::now();

        let resource = self.url_loader.resolve(reference).await?;
        let input = LoaderInput::from_path(resource.path()).with_source(reference);
        let result = self.api_loader.load(input).await;
        release(resource, reference);

        let label = match &result {
            Ok(docs) if docs.is_empty() => LoadOutcomeLabel::Unsupported,
            Ok(_) => LoadOutcomeLabel::Success,
            Err(_) => LoadOutcomeLabel::Error,
        };
        let count = result.as_ref().map(Vec::len).unwrap_or(0);
        record_document_load("json_api", label, count, started.elapsed());

        result
    }

    async fn web_crawl(&self, request: &LoadRequest) -> Result<Vec<Document>, DomainError> {
        request.validate()?;
        let reference = request.url.trim();
        let started = Instant::now();
        let strategy = self.crawler.strategy();

        let result = self.crawler.crawl(reference).await;

        match &result {
            Ok(documents) => {
                record_crawl(strategy.as_str(), true, documents.len(), started.elapsed());
                info!(url = %reference, pages = documents.len(), "Crawl finished");
            }
            Err(e) => {
                record_crawl(strategy.as_str(), false, 0, started.elapsed());
                error!(url = %reference, error = %e, "Crawl failed");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CrawlStrategy, MockCrawler, MockDocumentLoader};
    use crate::infrastructure::loaders::{build_docx, build_pdf};
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_with(
        loaders: Vec<(LoaderType, Arc<dyn DocumentLoader>)>,
        crawler: MockCrawler,
    ) -> DocumentService {
        DocumentService::new(
            UrlLoader::new(Arc::new(HttpClient::new())),
            loaders.into_iter().collect(),
            Arc::new(crawler),
        )
    }

    fn dyn_loader(loader: &Arc<MockDocumentLoader>) -> Arc<dyn DocumentLoader> {
        loader.clone()
    }

    fn real_service() -> DocumentService {
        DocumentService::from_config(&AppConfig::default()).unwrap()
    }

    fn fixture(suffix: &str, contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    fn request_for(file: &tempfile::NamedTempFile) -> LoadRequest {
        LoadRequest::new(file.path().to_string_lossy())
    }

    #[tokio::test]
    async fn test_each_extension_dispatches_to_its_loader_unchanged() {
        for loader_type in LoaderType::ALL {
            for ext in loader_type.extensions() {
                let expected = vec![
                    Document::new("first").with_metadata("k", 1),
                    Document::new("second"),
                ];
                let loader = Arc::new(MockDocumentLoader::new().with_result(expected.clone()));
                let service = service_with(vec![(loader_type, dyn_loader(&loader))], MockCrawler::new());

                let file = fixture(&format!(".{}", ext), b"ignored");
                let outcome = service.load_file(&request_for(&file)).await.unwrap();

                assert_eq!(outcome, LoadOutcome::Loaded(expected), "extension {}", ext);
                assert_eq!(loader.calls(), 1);
                assert_eq!(
                    loader.last_input().unwrap().source,
                    file.path().to_string_lossy()
                );
            }
        }
    }

    #[tokio::test]
    async fn test_extension_match_is_case_insensitive() {
        let loader = Arc::new(MockDocumentLoader::new().with_result(vec![Document::new("x")]));
        let service = service_with(vec![(LoaderType::Csv, dyn_loader(&loader))], MockCrawler::new());

        let file = fixture(".CSV", b"a\n1\n");
        let outcome = service.load_file(&request_for(&file)).await.unwrap();

        assert_eq!(outcome.documents().len(), 1);
        assert_eq!(loader.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_extension_is_unsupported_without_error() {
        let loader = Arc::new(MockDocumentLoader::new());
        let service = service_with(vec![(LoaderType::Text, dyn_loader(&loader))], MockCrawler::new());

        let file = fixture(".xyz", b"data");
        let outcome = service.load_file(&request_for(&file)).await.unwrap();

        assert_eq!(
            outcome,
            LoadOutcome::Unsupported {
                extension: ".xyz".to_string()
            }
        );
        assert!(outcome.is_empty());
        assert_eq!(loader.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_reference_is_rejected() {
        let service = service_with(vec![], MockCrawler::new());

        let result = service.load_file(&LoadRequest::new("   ")).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_missing_local_path_is_not_found() {
        let loader = Arc::new(MockDocumentLoader::new());
        let service = service_with(vec![(LoaderType::Text, dyn_loader(&loader))], MockCrawler::new());

        let result = service
            .load_file(&LoadRequest::new("/definitely/not/here.txt"))
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert_eq!(loader.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_404_aborts_before_loader() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing.txt"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let loader = Arc::new(MockDocumentLoader::new());
        let service = service_with(vec![(LoaderType::Text, dyn_loader(&loader))], MockCrawler::new());

        let result = service
            .load_file(&LoadRequest::new(format!("{}/missing.txt", server.uri())))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::FetchStatus { status: 404, .. })
        ));
        assert_eq!(loader.calls(), 0);
    }

    #[tokio::test]
    async fn test_remote_temp_file_is_removed_after_load() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes.txt"))
            .respond_with(ResponseTemplate::new(200).set_body_string("remote notes"))
            .mount(&server)
            .await;

        let loader = Arc::new(MockDocumentLoader::new());
        let service = service_with(vec![(LoaderType::Text, dyn_loader(&loader))], MockCrawler::new());
        let url = format!("{}/notes.txt", server.uri());

        let outcome = service.load_file(&LoadRequest::new(&url)).await.unwrap();

        let docs = outcome.into_documents().unwrap();
        assert_eq!(docs[0].page_content, "remote notes");
        assert_eq!(docs[0].source(), Some(url.as_str()));

        let staged = loader.last_input().unwrap().path;
        assert!(staged.to_string_lossy().ends_with(".txt"));
        assert!(!staged.exists());
    }

    #[tokio::test]
    async fn test_remote_temp_file_is_removed_when_loader_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/broken.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{"))
            .mount(&server)
            .await;

        let loader = Arc::new(MockDocumentLoader::new().with_error("boom"));
        let service = service_with(vec![(LoaderType::Json, dyn_loader(&loader))], MockCrawler::new());

        let result = service
            .load_file(&LoadRequest::new(format!("{}/broken.json", server.uri())))
            .await;

        assert!(matches!(result, Err(DomainError::Parse { .. })));
        assert!(!loader.last_input().unwrap().path.exists());
    }

    #[tokio::test]
    async fn test_real_loaders_end_to_end() {
        let service = real_service();

        let csv = fixture(".csv", b"name,age\nAda,36\n");
        let docs = service.load_file(&request_for(&csv)).await.unwrap().into_documents().unwrap();
        assert_eq!(docs[0].page_content, "name: Ada\nage: 36");
        assert_eq!(docs[0].metadata["row"], 0);

        let json = fixture(".json", br#"{"a": 1}"#);
        let docs = service.load_file(&request_for(&json)).await.unwrap().into_documents().unwrap();
        assert_eq!(docs[0].page_content, r#"{"a":1}"#);
        assert_eq!(docs[0].metadata["seq_num"], 1);

        let html = fixture(".html", b"<html><head><title>T</title></head><body><p>Hi</p></body></html>");
        let docs = service.load_file(&request_for(&html)).await.unwrap().into_documents().unwrap();
        assert_eq!(docs[0].page_content, "Hi");
        assert_eq!(docs[0].metadata["title"], "T");

        let pdf = fixture(".pdf", &build_pdf(&["Page one", "Page two"]));
        let docs = service.load_file(&request_for(&pdf)).await.unwrap().into_documents().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[1].metadata["page"], 1);

        let docx = fixture(".docx", &build_docx("<w:p><w:r><w:t>Memo</w:t></w:r></w:p>"));
        let docs = service.load_file(&request_for(&docx)).await.unwrap().into_documents().unwrap();
        assert_eq!(docs[0].page_content, "Memo");
    }

    #[tokio::test]
    async fn test_upload_matches_direct_local_load() {
        let service = real_service();
        let contents = b"city,country\nLima,Peru\nOslo,Norway\n".to_vec();

        let local = fixture(".csv", &contents);
        let direct = service.load_file(&request_for(&local)).await.unwrap();

        let upload = StagedUpload::stage("cities.csv", contents).await.unwrap();
        let uploaded = service.load_upload(&upload).await.unwrap();

        let strip = |outcome: &LoadOutcome| -> Vec<Document> {
            outcome
                .documents()
                .iter()
                .cloned()
                .map(|mut d| {
                    d.metadata.remove("source");
                    d
                })
                .collect()
        };

        assert_eq!(strip(&direct), strip(&uploaded));
        assert_eq!(uploaded.documents()[0].source(), Some("cities.csv"));
    }

    #[tokio::test]
    async fn test_upload_with_unknown_extension() {
        let service = real_service();
        let upload = StagedUpload::stage("image.png", vec![0x89, 0x50]).await.unwrap();

        let outcome = service.load_upload(&upload).await.unwrap();

        assert!(matches!(outcome, LoadOutcome::Unsupported { .. }));
    }

    #[tokio::test]
    async fn test_load_remote_falls_back_to_json_api() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"[{"id":1},{"id":2}]"#, "application/json"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/api/users", server.uri());
        let docs = real_service()
            .load_remote(&LoadRequest::new(&url))
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].page_content, r#"[{"id":1},{"id":2}]"#);
        assert_eq!(docs[0].source(), Some(url.as_str()));
        assert_eq!(docs[0].metadata["seq_num"], 1);
    }

    #[tokio::test]
    async fn test_load_remote_fallback_failure_is_unsupported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let result = real_service()
            .load_remote(&LoadRequest::new(format!("{}/page", server.uri())))
            .await;

        assert!(matches!(result, Err(DomainError::Unsupported { .. })));
    }

    #[tokio::test]
    async fn test_load_remote_keeps_dispatch_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/gone.pdf"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let result = real_service()
            .load_remote(&LoadRequest::new(format!("{}/gone.pdf", server.uri())))
            .await;

        assert!(matches!(result, Err(DomainError::FetchStatus { .. })));
    }

    #[tokio::test]
    async fn test_load_remote_local_unsupported_skips_fallback() {
        let file = fixture(".md", b"# title");

        let result = real_service().load_remote(&request_for(&file)).await;

        assert!(matches!(result, Err(DomainError::Unsupported { extension }) if extension == ".md"));
    }

    #[tokio::test]
    async fn test_fetch_from_api_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/status"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .mount(&server)
            .await;

        let docs = real_service()
            .fetch_from_api_endpoint(&LoadRequest::new(format!("{}/status", server.uri())))
            .await
            .unwrap();

        assert_eq!(docs[0].page_content, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_web_crawl_delegates_to_crawler() {
        let mut crawler = MockCrawler::new();
        crawler
            .expect_strategy()
            .returning(|| CrawlStrategy::SinglePage);
        crawler
            .expect_crawl()
            .times(1)
            .returning(|url| Ok(vec![Document::new("page").with_source(url)]));

        let service = service_with(vec![], crawler);
        let docs = service
            .web_crawl(&LoadRequest::new(" https://example.com "))
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].source(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn test_web_crawl_rejects_blank_url() {
        let mut crawler = MockCrawler::new();
        crawler.expect_crawl().times(0);

        let service = service_with(vec![], crawler);
        let result = service.web_crawl(&LoadRequest::new("")).await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }
}
