//! In-memory vector index over paper nodes, persisted as JSON

use crate::similarity::{cosine_similarity, top_k};
use anyhow::{anyhow, Context, Result};
use arxcon_core::{Embedder, Node};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const INDEX_FILE: &str = "index.json";
const FORMAT_VERSION: u32 = 1;

/// `<storage>/vector/<paper>`
pub fn vector_dir(storage: &Path, paper: &str) -> PathBuf {
    storage.join("vector").join(paper)
}

#[derive(Debug, Clone)]
pub struct ScoredNode {
    pub node: Node,
    pub score: f32,
}

#[derive(Debug, Clone, Default)]
pub struct VectorIndex {
    nodes: Vec<Node>,
}

#[derive(Serialize, Deserialize)]
struct PersistedIndex {
    version: u32,
    nodes: Vec<Node>,
}

impl VectorIndex {
    /// Embed every node (metadata header plus text) and index it
    pub async fn from_nodes(mut nodes: Vec<Node>, embedder: &dyn Embedder) -> Result<Self> {
        if nodes.is_empty() {
            return Ok(Self::default());
        }
        let texts: Vec<String> = nodes.iter().map(Node::embed_text).collect();
        let embeddings = embedder.embed_batch(&texts).await?;
        if embeddings.len() != nodes.len() {
            return Err(anyhow!(
                "Embedder returned {} vectors for {} nodes",
                embeddings.len(),
                nodes.len()
            ));
        }
        for (node, emb) in nodes.iter_mut().zip(embeddings) {
            node.embedding = Some(emb);
        }
        Ok(Self { nodes })
    }

    /// Index nodes that already carry embeddings; others are dropped
    pub fn from_embedded(nodes: Vec<Node>) -> Self {
        let total = nodes.len();
        let nodes: Vec<Node> = nodes.into_iter().filter(|n| n.embedding.is_some()).collect();
        if nodes.len() < total {
            tracing::warn!(
                "dropped {} nodes without embeddings",
                total - nodes.len()
            );
        }
        Self { nodes }
    }

    pub async fn retrieve(
        &self,
        query: &str,
        top: usize,
        embedder: &dyn Embedder,
    ) -> Result<Vec<ScoredNode>> {
        if self.nodes.is_empty() {
            return Ok(Vec::new());
        }
        let query_emb = embedder.embed(query).await?;
        Ok(self.retrieve_by_embedding(&query_emb, top))
    }

    pub fn retrieve_by_embedding(&self, query_emb: &[f32], top: usize) -> Vec<ScoredNode> {
        let scores: Vec<f32> = self
            .nodes
            .iter()
            .map(|n| {
                n.embedding
                    .as_deref()
                    .map(|e| cosine_similarity(query_emb, e))
                    .unwrap_or(0.0)
            })
            .collect();

        top_k(&scores, top)
            .into_iter()
            .map(|i| ScoredNode {
                node: self.nodes[i].clone(),
                score: scores[i],
            })
            .collect()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn exists(dir: &Path) -> bool {
        dir.join(INDEX_FILE).is_file()
    }

    pub fn persist(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let persisted = PersistedIndex {
            version: FORMAT_VERSION,
            nodes: self.nodes.clone(),
        };
        let path = dir.join(INDEX_FILE);
        let json = serde_json::to_string(&persisted)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("persisted {} nodes to {}", self.nodes.len(), path.display());
        Ok(())
    }

    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(INDEX_FILE);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let persisted: PersistedIndex = serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt vector index {}", path.display()))?;
        if persisted.version != FORMAT_VERSION {
            return Err(anyhow!(
                "Unsupported vector index version {} in {}",
                persisted.version,
                path.display()
            ));
        }
        Ok(Self::from_embedded(persisted.nodes))
    }
}
