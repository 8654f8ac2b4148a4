//! Error taxonomy of the feed export pipeline

use thiserror::Error;

/// Errors raised while building or delivering a product feed
#[derive(Error, Debug)]
pub enum ExportError {
    /// Delivery credentials or other operator-supplied settings are missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported feed format: {0} (expected one of csv, tsv, xml, json)")]
    UnsupportedFormat(String),

    /// Network, authentication or remote write failure
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Product records could not be acquired
    #[error("Product source error: {0}")]
    Source(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExportError {
    /// Stable tag for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::Configuration(_) => "configuration",
            ExportError::UnsupportedFormat(_) => "unsupported_format",
            ExportError::Transport(_) => "transport",
            ExportError::Mapping(_) => "mapping",
            ExportError::Source(_) => "source",
            ExportError::Serialization(_) => "serialization",
            ExportError::Io(_) => "io",
        }
    }

    /// Whether running the job again can succeed without operator action
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExportError::Transport(_) | ExportError::Source(_) | ExportError::Io(_)
        )
    }
}

impl From<sqlx::Error> for ExportError {
    fn from(err: sqlx::Error) -> Self {
        ExportError::Source(err.to_string())
    }
}

impl From<feed_common::FeedError> for ExportError {
    fn from(err: feed_common::FeedError) -> Self {
        match err {
            feed_common::FeedError::Io(e) => ExportError::Io(e),
            other => ExportError::Serialization(other.to_string()),
        }
    }
}
