//! Choosing the tools the top-level agent sees for one message

use crate::builder::{PaperEntry, PaperLibrary};
use crate::engines::{ResponseSynthesizer, SubQuestionQueryEngine, VectorQueryEngine};
use crate::prompts::{BASE_ENGINE_DESCRIPTION, COMPARE_TOOL_DESCRIPTION};
use crate::rerank::Reranker;
use crate::tool::{QueryEngineTool, Tool, ToolMetadata};
use anyhow::Result;
use arxcon_core::{Embedder, ModelProvider, Node};
use arxcon_index::{ObjectIndex, VectorIndex};
use std::sync::Arc;
use tracing::debug;

pub const COMPARE_TOOL_NAME: &str = "compare_tool";
pub const BASE_ENGINE_NAME: &str = "base_query_engine";

/// Text a paper tool is indexed and reranked by
pub fn tool_text(tool: &dyn Tool) -> String {
    format!(
        "Tool name: {}\nTool description: {}",
        tool.name(),
        tool.description()
    )
}

pub struct RelevantToolRetriever {
    entries: Vec<Arc<PaperEntry>>,
    texts: Vec<String>,
    index: ObjectIndex<usize>,
    reranker: Arc<dyn Reranker>,
    llm: Arc<dyn ModelProvider>,
    embedder: Arc<dyn Embedder>,
    synthesizer: Arc<ResponseSynthesizer>,
    top_n: usize,
    base_similarity_top_k: usize,
}

impl RelevantToolRetriever {
    /// Embed every paper tool of `library`
    pub async fn new(
        library: &PaperLibrary,
        llm: Arc<dyn ModelProvider>,
        embedder: Arc<dyn Embedder>,
        synthesizer: Arc<ResponseSynthesizer>,
        reranker: Arc<dyn Reranker>,
    ) -> Result<Self> {
        let entries = library.entries().to_vec();
        let texts: Vec<String> = entries
            .iter()
            .map(|e| tool_text(e.tool.as_ref()))
            .collect();
        let index =
            ObjectIndex::from_objects((0..entries.len()).collect(), texts.clone(), embedder.clone())
                .await?;
        Ok(Self {
            entries,
            texts,
            index,
            reranker,
            llm,
            embedder,
            synthesizer,
            top_n: 5,
            base_similarity_top_k: 4,
        })
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n.max(1);
        self
    }

    pub fn with_base_similarity_top_k(mut self, top_k: usize) -> Self {
        self.base_similarity_top_k = top_k.max(1);
        self
    }

    /// Papers most relevant to `query`, similarity search then rerank
    pub async fn retrieve_papers(&self, query: &str) -> Result<Vec<Arc<PaperEntry>>> {
        let hits = self.index.retrieve(query, self.top_n).await?;
        let candidates: Vec<usize> = hits.into_iter().map(|(_, i)| i).collect();
        let candidate_texts: Vec<String> =
            candidates.iter().map(|&i| self.texts[i].clone()).collect();

        let order = self
            .reranker
            .rerank(query, &candidate_texts, self.top_n)
            .await?;
        let papers: Vec<Arc<PaperEntry>> = order
            .into_iter()
            .filter_map(|pos| candidates.get(pos))
            .map(|&i| self.entries[i].clone())
            .collect();
        debug!(
            "retrieved papers: {:?}",
            papers.iter().map(|p| p.paper_name.as_str()).collect::<Vec<_>>()
        );
        Ok(papers)
    }

    /// Paper tools for `query`, then `compare_tool` over them, then
    /// `base_query_engine` over all their nodes
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Arc<dyn Tool>>> {
        let papers = self.retrieve_papers(query).await?;
        let mut tools: Vec<Arc<dyn Tool>> = papers
            .iter()
            .map(|p| p.tool.clone() as Arc<dyn Tool>)
            .collect();

        let compare = SubQuestionQueryEngine::new(
            tools.clone(),
            self.llm.clone(),
            self.synthesizer.clone(),
        );
        tools.push(Arc::new(QueryEngineTool::new(
            Arc::new(compare),
            ToolMetadata::new(COMPARE_TOOL_NAME, COMPARE_TOOL_DESCRIPTION),
        )));

        let nodes: Vec<Node> = papers.iter().flat_map(|p| p.nodes.iter().cloned()).collect();
        let base_engine = VectorQueryEngine::new(
            Arc::new(VectorIndex::from_embedded(nodes)),
            self.embedder.clone(),
            self.synthesizer.clone(),
            self.base_similarity_top_k,
        );
        tools.push(Arc::new(QueryEngineTool::new(
            Arc::new(base_engine),
            ToolMetadata::new(BASE_ENGINE_NAME, BASE_ENGINE_DESCRIPTION),
        )));

        Ok(tools)
    }
}
