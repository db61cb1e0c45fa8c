//! Resolves a path or URL into a readable local file

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::domain::{extension_of, DomainError};
use crate::infrastructure::http_client::RemoteFetcher;

const TEMP_PREFIX: &str = "doc-loader-";

/// A local file backing one load, either the caller's own file or a
/// temporary copy of remote content.
///
/// Temporary copies are removed when the resource is closed or dropped,
/// whichever happens first.
#[derive(Debug)]
pub enum ResolvedResource {
    Local { path: PathBuf },
    Remote { url: String, file: NamedTempFile },
}

impl ResolvedResource {
    /// Path a loader should read
    pub fn path(&self) -> &Path {
        match self {
            Self::Local { path } => path,
            Self::Remote { file, .. } => file.path(),
        }
    }

    /// Release the resource now, reporting deletion failures
    pub fn close(self) -> Result<(), DomainError> {
        match self {
            Self::Local { .. } => Ok(()),
            Self::Remote { url, file } => {
                let path = file.path().to_path_buf();
                file.close().map_err(|e| {
                    DomainError::io(format!(
                        "Failed to remove temporary file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                debug!(url = %url, path = %path.display(), "Temporary file removed");
                Ok(())
            }
        }
    }
}

/// Resolves references to local files, downloading remote content
#[derive(Debug, Clone)]
pub struct UrlLoader {
    fetcher: Arc<dyn RemoteFetcher>,
    allow_local_paths: bool,
}

impl UrlLoader {
    pub fn new(fetcher: Arc<dyn RemoteFetcher>) -> Self {
        Self {
            fetcher,
            allow_local_paths: true,
        }
    }

    pub fn with_local_paths(mut self, allow: bool) -> Self {
        self.allow_local_paths = allow;
        self
    }

    /// Resolve a reference.
    ///
    /// An existing local file always wins; otherwise a reference with both a
    /// scheme and a host is downloaded. A non-2xx response aborts resolution.
    pub async fn resolve(&self, reference: &str) -> Result<ResolvedResource, DomainError> {
        let expanded = expand_home(reference.trim());

        if is_file(&expanded).await {
            if !self.allow_local_paths {
                return Err(DomainError::validation(
                    "Local file paths are not accepted by this server",
                ));
            }

            return Ok(ResolvedResource::Local { path: expanded });
        }

        if is_valid_url(reference.trim()) {
            return self.download(reference.trim()).await;
        }

        Err(DomainError::not_found(expanded.to_string_lossy()))
    }

    async fn download(&self, url: &str) -> Result<ResolvedResource, DomainError> {
        debug!(url = %url, "Downloading remote document");

        let fetched = self.fetcher.get(url).await.map_err(|e| {
            warn!(url = %url, error = %e, "Remote fetch failed");
            e
        })?;

        let suffix = extension_of(url).unwrap_or_default();
        let file = write_temp_file(suffix, fetched.body.to_vec()).await?;

        debug!(
            url = %url,
            path = %file.path().display(),
            bytes = fetched.body.len(),
            "Remote document staged"
        );

        Ok(ResolvedResource::Remote {
            url: url.to_string(),
            file,
        })
    }
}

/// Write bytes to a fresh temporary file whose name ends with `suffix`
pub(crate) async fn write_temp_file(
    suffix: String,
    contents: Vec<u8>,
) -> Result<NamedTempFile, DomainError> {
    tokio::task::spawn_blocking(move || {
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&contents)?;
        file.flush()?;
        Ok::<_, std::io::Error>(file)
    })
    .await
    .map_err(|e| DomainError::internal(format!("Staging task failed: {}", e)))?
    .map_err(|e| DomainError::io(format!("Failed to write temporary file: {}", e)))
}

/// A reference is a URL when it has both a scheme and a host
pub fn is_valid_url(reference: &str) -> bool {
    url::Url::parse(reference)
        .map(|u| !u.scheme().is_empty() && u.has_host() && !u.host_str().unwrap_or("").is_empty())
        .unwrap_or(false)
}

fn expand_home(reference: &str) -> PathBuf {
    if let Some(rest) = reference.strip_prefix('~') {
        if rest.is_empty() || rest.starts_with('/') {
            if let Ok(home) = std::env::var("HOME") {
                return PathBuf::from(format!("{}{}", home, rest));
            }
        }
    }

    PathBuf::from(reference)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http_client::{FetchedContent, HttpClient, MockRemoteFetcher};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn http_loader() -> UrlLoader {
        UrlLoader::new(Arc::new(HttpClient::new()))
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com/a.pdf"));
        assert!(is_valid_url("http://localhost:8080/data.json"));
        assert!(!is_valid_url("notes.txt"));
        assert!(!is_valid_url("/tmp/notes.txt"));
        assert!(!is_valid_url("file:///tmp/notes.txt"));
        assert!(!is_valid_url("mailto:someone@example.com"));
    }

    #[test]
    fn test_expand_home() {
        if let Ok(home) = std::env::var("HOME") {
            assert_eq!(expand_home("~/a.txt"), PathBuf::from(format!("{}/a.txt", home)));
        }
        assert_eq!(expand_home("a~b.txt"), PathBuf::from("a~b.txt"));
        assert_eq!(expand_home("~user/a.txt"), PathBuf::from("~user/a.txt"));
    }

    #[tokio::test]
    async fn test_resolve_local_file() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let reference = file.path().to_string_lossy().into_owned();

        let resource = http_loader().resolve(&reference).await.unwrap();

        assert!(matches!(resource, ResolvedResource::Local { .. }));
        assert_eq!(resource.path(), file.path());
        resource.close().unwrap();
        assert!(file.path().exists(), "local files are never deleted");
    }

    #[tokio::test]
    async fn test_resolve_local_file_rejected_when_disabled() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let reference = file.path().to_string_lossy().into_owned();

        let result = http_loader()
            .with_local_paths(false)
            .resolve(&reference)
            .await;

        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_resolve_missing_path() {
        let result = http_loader().resolve("no/such/file.csv").await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_resolve_remote_stages_and_closes_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/data.csv"))
            .respond_with(ResponseTemplate::new(200).set_body_string("a,b\n1,2\n"))
            .mount(&server)
            .await;

        let url = format!("{}/files/data.csv", server.uri());
        let resource = http_loader().resolve(&url).await.unwrap();

        assert!(matches!(&resource, ResolvedResource::Remote { url: fetched, .. } if *fetched == url));

        let staged = resource.path().to_path_buf();
        assert!(staged.exists());
        assert!(staged.to_string_lossy().ends_with(".csv"));
        assert_eq!(std::fs::read_to_string(&staged).unwrap(), "a,b\n1,2\n");

        resource.close().unwrap();
        assert!(!staged.exists());
    }

    #[tokio::test]
    async fn test_remote_temp_file_removed_on_drop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let staged = {
            let resource = http_loader()
                .resolve(&format!("{}/a.txt", server.uri()))
                .await
                .unwrap();
            resource.path().to_path_buf()
        };

        assert!(!staged.exists());
    }

    #[tokio::test]
    async fn test_remote_204_aborts_resolution() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/notes.txt"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let result = http_loader()
            .resolve(&format!("{}/notes.txt", server.uri()))
            .await;

        assert!(matches!(result, Err(DomainError::FetchStatus { status: 204, .. })));
    }

    #[tokio::test]
    async fn test_remote_404_aborts_resolution() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let result = http_loader()
            .resolve(&format!("{}/missing.pdf", server.uri()))
            .await;

        assert!(matches!(
            result,
            Err(DomainError::FetchStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_uses_fetcher() {
        let mut fetcher = MockRemoteFetcher::new();
        fetcher.expect_get().times(1).returning(|url| {
            Ok(FetchedContent {
                url: url.to_string(),
                content_type: Some("application/json".to_string()),
                body: bytes::Bytes::from_static(b"{}"),
            })
        });

        let loader = UrlLoader::new(Arc::new(fetcher));
        let resource = loader
            .resolve("https://api.example.com/items.json")
            .await
            .unwrap();

        assert_eq!(std::fs::read(resource.path()).unwrap(), b"{}");
    }
}
