//! Feed wire formats

use serde::{Deserialize, Serialize};

use super::error::ExportError;

/// Supported feed encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeedFormat {
    Csv,
    /// Tab separated values, the default for pushed feeds
    #[default]
    Tsv,
    Xml,
    Json,
}

impl FeedFormat {
    pub const ALL: [FeedFormat; 4] = [FeedFormat::Csv, FeedFormat::Tsv, FeedFormat::Xml, FeedFormat::Json];

    /// File extension, also used for the temporary artifact suffix
    pub fn extension(&self) -> &'static str {
        self.as_str()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedFormat::Csv => "csv",
            FeedFormat::Tsv => "tsv",
            FeedFormat::Xml => "xml",
            FeedFormat::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            FeedFormat::Csv => "text/csv",
            FeedFormat::Tsv => "text/tab-separated-values",
            FeedFormat::Xml => "application/xml",
            FeedFormat::Json => "application/json",
        }
    }
}

impl std::fmt::Display for FeedFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FeedFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(FeedFormat::Csv),
            "tsv" => Ok(FeedFormat::Tsv),
            "xml" => Ok(FeedFormat::Xml),
            "json" => Ok(FeedFormat::Json),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}
