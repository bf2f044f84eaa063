use crate::engines::synthesizer::ResponseSynthesizer;
use crate::tool::QueryEngine;
use anyhow::Result;
use arxcon_core::{Embedder, Node};
use arxcon_index::VectorIndex;
use async_trait::async_trait;
use std::sync::Arc;

/// Top-k similarity retrieval followed by a compact synthesis
pub struct VectorQueryEngine {
    index: Arc<VectorIndex>,
    embedder: Arc<dyn Embedder>,
    synthesizer: Arc<ResponseSynthesizer>,
    top_k: usize,
}

impl VectorQueryEngine {
    pub fn new(
        index: Arc<VectorIndex>,
        embedder: Arc<dyn Embedder>,
        synthesizer: Arc<ResponseSynthesizer>,
        top_k: usize,
    ) -> Self {
        Self {
            index,
            embedder,
            synthesizer,
            top_k,
        }
    }
}

#[async_trait]
impl QueryEngine for VectorQueryEngine {
    async fn query(&self, query: &str) -> Result<String> {
        let hits = self
            .index
            .retrieve(query, self.top_k, self.embedder.as_ref())
            .await?;
        tracing::debug!(
            "vector engine retrieved {} of {} nodes",
            hits.len(),
            self.index.len()
        );
        let texts: Vec<String> = hits.iter().map(|h| h.node.embed_text()).collect();
        self.synthesizer.compact(query, &texts).await
    }
}

/// `Node::embed_text` for every node, in order
pub(crate) fn node_texts(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(Node::embed_text).collect()
}
