//! arXiv API configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArxivConfig {
    /// Atom query endpoint
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout for searches and PDF downloads
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub sort_by: SortBy,
}

/// Result ordering accepted by the arXiv API
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    Relevance,
    LastUpdated,
    Submitted,
}

impl SortBy {
    pub const OPTIONS: [&'static str; 3] = ["relevance", "last_updated", "submitted"];

    /// Value of the `sortBy` query parameter
    pub fn as_query_value(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::LastUpdated => "lastUpdatedDate",
            SortBy::Submitted => "submittedDate",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "relevance" => Some(SortBy::Relevance),
            "last_updated" | "lastupdated" | "lastupdateddate" => Some(SortBy::LastUpdated),
            "submitted" | "submitteddate" => Some(SortBy::Submitted),
            _ => None,
        }
    }
}

impl Default for ArxivConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
            sort_by: SortBy::default(),
        }
    }
}

impl crate::validation::Validate for ArxivConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_url("arxiv.api_base", &self.api_base)?;
        if self.timeout_secs == 0 {
            return Err(crate::error::ConfigError::validation(
                "arxiv.timeout_secs",
                "timeout_secs must be > 0",
            ));
        }
        Ok(())
    }
}

fn default_api_base() -> String {
    "http://export.arxiv.org/api/query".to_string()
}

fn default_timeout() -> u64 {
    60
}
