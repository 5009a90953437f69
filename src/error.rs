use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an uploaded file into text.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Unsupported file format: {0}")]
    Unsupported(String),
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("PDF parse error: {0}")]
    Pdf(String),
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("DOCX parse error: {0}")]
    Docx(String),
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("embedding API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("embedding count mismatch: expected {expected}, got {actual}")]
    CountMismatch { expected: usize, actual: usize },
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("invalid index in embedding response: {0:?}")]
    BadIndex(Option<usize>),
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("completion API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("completion response contained no message content")]
    EmptyResponse,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
