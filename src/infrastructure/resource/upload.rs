//! Staging of uploaded files

use std::path::Path;

use tempfile::NamedTempFile;

use super::url_loader::write_temp_file;
use crate::domain::{extension_of, DomainError};

/// An uploaded file written to a temporary location.
///
/// The temporary name keeps the upload's extension so dispatch sees the same
/// suffix the client sent. The file is removed on drop.
#[derive(Debug)]
pub struct StagedUpload {
    filename: String,
    file: NamedTempFile,
}

impl StagedUpload {
    /// Write `contents` to a temporary file named after `filename`
    pub async fn stage(filename: &str, contents: Vec<u8>) -> Result<Self, DomainError> {
        let filename = sanitize_filename(filename);
        let suffix = extension_of(&filename).unwrap_or_default();
        let file = write_temp_file(suffix, contents).await?;

        Ok(Self { filename, file })
    }

    /// Sanitized client-side file name
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Remove the staged file now
    pub fn close(self) -> Result<(), DomainError> {
        self.file
            .close()
            .map_err(|e| DomainError::io(format!("Failed to remove staged upload: {}", e)))
    }
}

/// Sanitize a filename to prevent path traversal
pub fn sanitize_filename(name: &str) -> String {
    let name = name.replace(['/', '\\'], "").replace("..", "");

    Path::new(&name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("unnamed")
        .to_string()
}
