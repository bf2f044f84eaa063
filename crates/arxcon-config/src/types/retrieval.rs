//! Tool retrieval configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Paper tools kept after reranking
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Chunks retrieved by each paper's vector tool
    #[serde(default = "default_similarity_top_k")]
    pub similarity_top_k: usize,

    /// Chunks retrieved by the cross-paper base engine
    #[serde(default = "default_base_similarity_top_k")]
    pub base_similarity_top_k: usize,

    #[serde(default)]
    pub rerank: RerankMode,
}

/// How candidate tools are reordered before the agent sees them
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RerankMode {
    /// Ask the chat model to score each candidate
    #[default]
    Llm,
    /// Keep embedding similarity order
    None,
}

impl RerankMode {
    pub const OPTIONS: [&'static str; 2] = ["llm", "none"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "llm" => Some(RerankMode::Llm),
            "none" | "off" => Some(RerankMode::None),
            _ => None,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            similarity_top_k: default_similarity_top_k(),
            base_similarity_top_k: default_base_similarity_top_k(),
            rerank: RerankMode::default(),
        }
    }
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::validation::validate_positive;
        validate_positive("retrieval.top_n", self.top_n, 0)?;
        validate_positive("retrieval.similarity_top_k", self.similarity_top_k, 0)?;
        validate_positive(
            "retrieval.base_similarity_top_k",
            self.base_similarity_top_k,
            0,
        )?;
        Ok(())
    }
}

fn default_top_n() -> usize {
    5
}

fn default_similarity_top_k() -> usize {
    2
}

fn default_base_similarity_top_k() -> usize {
    4
}
