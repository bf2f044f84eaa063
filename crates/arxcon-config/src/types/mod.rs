//! Configuration type definitions
//!
//! One module per concern. Each type carries its own defaults and validation.

pub mod agent;
pub mod arxiv;
pub mod chunking;
pub mod core;
pub mod embedding;
pub mod llm;
pub mod retrieval;
pub mod summary;

pub use agent::AgentConfig;
pub use arxiv::{ArxivConfig, SortBy};
pub use chunking::ChunkingConfig;
pub use core::CoreConfig;
pub use embedding::EmbeddingConfig;
pub use llm::LlmConfig;
pub use retrieval::{RerankMode, RetrievalConfig};
pub use summary::SummaryConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration, organized by functional area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Paths, persistence and credentials
    #[serde(default)]
    pub core: CoreConfig,

    /// arXiv API access
    #[serde(default)]
    pub arxiv: ArxivConfig,

    /// Chat completion model
    #[serde(default)]
    pub llm: LlmConfig,

    /// Embedding model
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Sentence splitting of paper text
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Tool retrieval and reranking
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Response synthesis and paper summaries
    #[serde(default)]
    pub summary: SummaryConfig,

    /// Agent loop limits
    #[serde(default)]
    pub agent: AgentConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.core.validate()?;
        self.arxiv.validate()?;
        self.llm.validate()?;
        self.embedding.validate()?;
        self.chunking.validate()?;
        self.retrieval.validate()?;
        self.summary.validate()?;
        self.agent.validate()?;

        // Packing needs room for at least one full chunk per prompt.
        if self.summary.context_budget_tokens <= self.chunking.chunk_size {
            return Err(crate::error::ConfigError::validation(
                "summary.context_budget_tokens",
                format!(
                    "context_budget_tokens ({}) must be > chunking.chunk_size ({})",
                    self.summary.context_budget_tokens, self.chunking.chunk_size
                ),
            ));
        }

        Ok(())
    }
}
