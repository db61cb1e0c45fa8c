//! Extension dispatch table

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Loading strategy selected from a file extension
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LoaderType {
    /// PDF files, one document per page
    Pdf,
    /// Word documents (.docx, .doc)
    Word,
    /// JSON files filtered through a jq-style path
    Json,
    /// CSV files, one document per row
    Csv,
    /// Plain text files
    Text,
    /// HTML files, body text only
    Html,
}

impl LoaderType {
    /// Every loader kind, in dispatch-table order
    pub const ALL: [LoaderType; 6] = [
        Self::Pdf,
        Self::Word,
        Self::Json,
        Self::Csv,
        Self::Text,
        Self::Html,
    ];

    /// Get file extensions associated with this loader type
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Pdf => &["pdf"],
            Self::Word => &["docx", "doc"],
            Self::Json => &["json"],
            Self::Csv => &["csv"],
            Self::Text => &["txt"],
            Self::Html => &["html"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "text",
            Self::Html => "html",
        }
    }

    /// Look up a loader by extension, with or without the leading dot
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_lowercase();

        Self::ALL
            .into_iter()
            .find(|loader| loader.extensions().contains(&ext.as_str()))
    }

    /// Detect the loader for a path or URL reference
    pub fn from_reference(reference: &str) -> Option<Self> {
        extension_of(reference).and_then(|ext| Self::from_extension(&ext))
    }
}

impl fmt::Display for LoaderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension of a path or URL, lowercased and including the leading dot.
///
/// For URLs only the path component is considered, so query strings and
/// fragments never leak into the extension.
pub fn extension_of(reference: &str) -> Option<String> {
    let reference = reference.trim();
    let path = match url::Url::parse(reference) {
        Ok(parsed) if parsed.has_host() => parsed.path().to_string(),
        _ => reference.to_string(),
    };

    Path::new(&path)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
        .map(|e| format!(".{}", e.to_lowercase()))
}
