use crate::engines::ResponseSynthesizer;
use crate::paper_agent::PaperAgentBuilder;
use crate::rerank::{LlmReranker, NoopReranker, Reranker};
use anyhow::{Context, Result};
use arxcon_arxiv::{ArxivClient, PaperSource};
use arxcon_config::{Config, RerankMode};
use arxcon_core::credentials::load_api_key;
use arxcon_core::loader::{DocumentLoader, PdfLoader};
use arxcon_core::{Embedder, ModelProvider, OpenAIEmbedder, OpenAIProvider};
use std::path::Path;
use std::sync::Arc;

/// Shared handles a consultant session is built from.
pub struct ConsultantContext {
    pub config: Config,
    pub llm: Arc<dyn ModelProvider>,
    pub embedder: Arc<dyn Embedder>,
    pub source: Arc<dyn PaperSource>,
    pub loader: Arc<dyn DocumentLoader>,
    pub reranker: Arc<dyn Reranker>,
}

impl ConsultantContext {
    /// Build a context against hosted OpenAI and arXiv.
    pub fn from_config(config: Config) -> Result<Self> {
        let api_key = load_api_key(&config.core.api_key_file)?;

        let llm: Arc<dyn ModelProvider> = Arc::new(
            OpenAIProvider::from_config(&config.llm, api_key.clone())
                .context("failed to build LLM client")?,
        );
        let embedder: Arc<dyn Embedder> =
            Arc::new(OpenAIEmbedder::from_config(&config.embedding, api_key));
        let source: Arc<dyn PaperSource> =
            Arc::new(ArxivClient::new(&config.arxiv).context("failed to build arXiv client")?);

        Ok(Self::new(config, llm, embedder, source, Arc::new(PdfLoader)))
    }

    /// Load config from `config_path`, or the default locations, then build
    pub fn from_env(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::from_file(path)?,
            None => Config::load()?,
        };
        Self::from_config(config)
    }

    /// Assemble a context from explicit parts; the reranker follows `config`
    pub fn new(
        config: Config,
        llm: Arc<dyn ModelProvider>,
        embedder: Arc<dyn Embedder>,
        source: Arc<dyn PaperSource>,
        loader: Arc<dyn DocumentLoader>,
    ) -> Self {
        let reranker: Arc<dyn Reranker> = match config.retrieval.rerank {
            RerankMode::Llm => Arc::new(LlmReranker::new(llm.clone())),
            RerankMode::None => Arc::new(NoopReranker),
        };
        Self {
            config,
            llm,
            embedder,
            source,
            loader,
            reranker,
        }
    }

    pub fn synthesizer(&self) -> Arc<ResponseSynthesizer> {
        Arc::new(ResponseSynthesizer::new(
            self.llm.clone(),
            self.config.summary.context_budget_tokens,
        ))
    }

    /// Builder for per-paper agents, configured from this context
    pub fn paper_agent_builder(&self, synthesizer: Arc<ResponseSynthesizer>) -> PaperAgentBuilder {
        PaperAgentBuilder::new(
            self.llm.clone(),
            self.embedder.clone(),
            synthesizer,
            self.config.core.storage_dir.clone(),
        )
        .with_similarity_top_k(self.config.retrieval.similarity_top_k)
        .with_summary_query(self.config.summary.summary_query.clone())
        .with_max_steps(self.config.agent.paper_agent_max_steps)
        .with_memory_token_limit(self.config.summary.memory_token_limit)
    }
}
