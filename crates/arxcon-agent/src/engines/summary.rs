use crate::engines::synthesizer::ResponseSynthesizer;
use crate::engines::vector::node_texts;
use crate::tool::QueryEngine;
use anyhow::Result;
use arxcon_core::Node;
use async_trait::async_trait;
use std::sync::Arc;

/// Tree-summarizes every node of one paper
pub struct SummaryQueryEngine {
    nodes: Arc<Vec<Node>>,
    synthesizer: Arc<ResponseSynthesizer>,
}

impl SummaryQueryEngine {
    pub fn new(nodes: Arc<Vec<Node>>, synthesizer: Arc<ResponseSynthesizer>) -> Self {
        Self { nodes, synthesizer }
    }
}

#[async_trait]
impl QueryEngine for SummaryQueryEngine {
    async fn query(&self, query: &str) -> Result<String> {
        self.synthesizer
            .tree_summarize(query, &node_texts(&self.nodes))
            .await
    }
}
