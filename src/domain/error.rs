use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("File path {path} is not a valid file or url")]
    NotFound { path: String },

    #[error("Check the url of your file; returned status code {status}")]
    FetchStatus { url: String, status: u16 },

    #[error("Fetch error: {url} - {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to parse {format} document: {message}")]
    Parse { format: String, message: String },

    #[error("File type not supported: {extension}")]
    Unsupported { extension: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn fetch_status(url: impl Into<String>, status: u16) -> Self {
        Self::FetchStatus {
            url: url.into(),
            status,
        }
    }

    pub fn fetch(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::Unsupported {
            extension: extension.into(),
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
