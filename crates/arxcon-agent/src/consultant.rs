use crate::builder::{ArxivBuilder, BuildEvent, PaperLibrary};
use crate::context::ConsultantContext;
use crate::react::{ArxivAgent, StepObserver};
use crate::retriever::RelevantToolRetriever;
use anyhow::Result;
use arxcon_core::chunking::SentenceSplitter;
use arxcon_core::Message;
use std::sync::Arc;
use tracing::info;

/// A chat session over the papers fetched for one search query
pub struct Consultant {
    library: PaperLibrary,
    agent: ArxivAgent,
}

impl Consultant {
    /// Fetch papers for `query`, build their agents and the top-level agent.
    pub async fn build(
        ctx: &ConsultantContext,
        query: &str,
        max_papers: usize,
        persist: bool,
        on_event: &(dyn Fn(BuildEvent) + Send + Sync),
    ) -> Result<Self> {
        let config = &ctx.config;
        let synthesizer = ctx.synthesizer();

        let builder = ArxivBuilder::new(
            query,
            ctx.source.clone(),
            ctx.loader.clone(),
            ctx.paper_agent_builder(synthesizer.clone()),
            SentenceSplitter::from_config(&config.chunking),
        )
        .with_persist(persist)
        .with_papers_dir(config.core.papers_dir.clone())
        .with_max_results(max_papers);

        let library = builder.run(on_event).await?;

        let retriever = RelevantToolRetriever::new(
            &library,
            ctx.llm.clone(),
            ctx.embedder.clone(),
            synthesizer,
            ctx.reranker.clone(),
        )
        .await?
        .with_top_n(config.retrieval.top_n)
        .with_base_similarity_top_k(config.retrieval.base_similarity_top_k);

        let agent = ArxivAgent::new(ctx.llm.clone(), Arc::new(retriever), &config.agent)
            .with_memory_token_limit(config.summary.memory_token_limit);
        agent.reset().await;
        info!("consultant ready with {} papers for '{}'", library.len(), query);

        Ok(Self {
            library,
            agent,
        })
    }

    /// Report each agent step to `observer`
    pub fn with_observer(mut self, observer: StepObserver) -> Self {
        self.agent = self.agent.with_observer(observer);
        self
    }

    /// Titles of the papers this session knows
    pub fn papers(&self) -> Vec<String> {
        self.library.titles()
    }

    pub async fn chat(&self, message: &str) -> Result<String> {
        self.agent.chat(message).await
    }

    /// User messages and answers of the conversation so far
    pub async fn history(&self) -> Vec<Message> {
        self.agent.history().await
    }

    /// Forget the conversation, keeping the papers
    pub async fn reset(&self) {
        self.agent.reset().await;
        for entry in self.library.entries() {
            entry.agent.reset().await;
        }
    }
}
