//! Error types for linktext

use std::io;
use thiserror::Error;

/// Main error type for linktext
#[derive(Error, Debug)]
pub enum LinkTextError {
    #[error("DOM error: {0}")]
    Dom(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for linktext operations
pub type Result<T> = std::result::Result<T, LinkTextError>;

impl From<String> for LinkTextError {
    fn from(s: String) -> Self {
        LinkTextError::Other(s)
    }
}

impl From<&str> for LinkTextError {
    fn from(s: &str) -> Self {
        LinkTextError::Other(s.to_string())
    }
}
