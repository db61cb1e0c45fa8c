//! Temporary resource lifecycle: remote downloads and staged uploads

mod upload;
mod url_loader;

pub use upload::{sanitize_filename, StagedUpload};
pub use url_loader::{is_valid_url, ResolvedResource, UrlLoader};
