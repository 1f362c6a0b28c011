use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NcliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Could not determine the home directory")]
    HomeDirNotFound,

    #[error("Failed to read API key: {0}")]
    Prompt(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error(transparent)]
    Tinify(#[from] TinifyClientError),

    #[error(transparent)]
    Svg(#[from] SvgError),
}

/// Failures of the SVG parse/reify stages.
#[derive(Debug, Error)]
pub enum SvgError {
    #[error("XML error: {0}")]
    Xml(String),

    #[error("Document has no root element")]
    NoRootElement,

    #[error("Unbalanced markup: {0}")]
    UnbalancedMarkup(String),

    #[error("Malformed style declaration: {0:?}")]
    MalformedStyle(String),
}

/// Errors reported by the Tinify service, classified by HTTP status the way
/// the official clients do it.
#[derive(Debug, Error)]
pub enum TinifyClientError {
    #[error("{message} (HTTP {status}/{kind})")]
    Account { status: u16, kind: String, message: String },

    #[error("{message} (HTTP {status}/{kind})")]
    Client { status: u16, kind: String, message: String },

    #[error("{message} (HTTP {status}/{kind})")]
    Server { status: u16, kind: String, message: String },

    #[error("Error while connecting: {0}")]
    Connection(String),

    #[error("Unexpected response from Tinify: {0}")]
    InvalidResponse(String),
}

impl TinifyClientError {
    pub fn from_status(status: u16, kind: String, message: String) -> Self {
        match status {
            401 | 429 => TinifyClientError::Account { status, kind, message },
            400..=499 => TinifyClientError::Client { status, kind, message },
            _ => TinifyClientError::Server { status, kind, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TinifyClientError::Account { status, .. }
            | TinifyClientError::Client { status, .. }
            | TinifyClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A single SVG file that could not be turned into a component.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConversionError {
    pub file: PathBuf,
    pub message: String,
}

impl ConversionError {
    pub fn new(file: impl Into<PathBuf>, cause: impl ToString) -> Self {
        Self {
            file: file.into(),
            message: cause.to_string(),
        }
    }
}

/// A single image that could not be minified.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TinifyError {
    pub file: PathBuf,
    pub message: String,
}

impl TinifyError {
    pub fn new(file: impl Into<PathBuf>, cause: impl ToString) -> Self {
        Self {
            file: file.into(),
            message: cause.to_string(),
        }
    }
}

/// Per-file errors share this shape so the batch report can list them.
pub trait FileError: std::fmt::Display {
    fn file(&self) -> &std::path::Path;
}

impl FileError for ConversionError {
    fn file(&self) -> &std::path::Path {
        &self.file
    }
}

impl FileError for TinifyError {
    fn file(&self) -> &std::path::Path {
        &self.file
    }
}

pub type Result<T> = std::result::Result<T, NcliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tinify_error_classification() {
        let err = TinifyClientError::from_status(401, "Unauthorized".into(), "Credentials are invalid.".into());
        assert!(matches!(err, TinifyClientError::Account { status: 401, .. }));

        let err = TinifyClientError::from_status(429, "TooManyRequests".into(), "Limit".into());
        assert!(matches!(err, TinifyClientError::Account { status: 429, .. }));

        let err = TinifyClientError::from_status(400, "InputMissing".into(), "Input is missing".into());
        assert!(matches!(err, TinifyClientError::Client { status: 400, .. }));

        let err = TinifyClientError::from_status(503, "ServiceUnavailable".into(), "Down".into());
        assert!(matches!(err, TinifyClientError::Server { status: 503, .. }));
        assert_eq!(err.status(), Some(503));

        assert_eq!(TinifyClientError::Connection("refused".into()).status(), None);
    }

    #[test]
    fn test_tinify_error_display() {
        let err = TinifyClientError::from_status(401, "Unauthorized".into(), "Credentials are invalid.".into());
        assert_eq!(err.to_string(), "Credentials are invalid. (HTTP 401/Unauthorized)");
    }

    #[test]
    fn test_file_errors_keep_path_and_message() {
        let err = ConversionError::new("/tmp/icon.svg", SvgError::NoRootElement);
        assert_eq!(err.file(), std::path::Path::new("/tmp/icon.svg"));
        assert_eq!(err.to_string(), "Document has no root element");

        let err = TinifyError::new("/tmp/photo.png", "boom");
        assert_eq!(err.file(), std::path::Path::new("/tmp/photo.png"));
        assert_eq!(err.to_string(), "boom");
    }
}
