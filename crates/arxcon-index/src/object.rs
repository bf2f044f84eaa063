use crate::similarity::{cosine_similarity, top_k};
use anyhow::{anyhow, Result};
use arxcon_core::Embedder;
use std::sync::Arc;

/// Embedding index over arbitrary objects, each described by one text
pub struct ObjectIndex<T> {
    entries: Vec<(Vec<f32>, T)>,
    embedder: Arc<dyn Embedder>,
}

impl<T: Clone> ObjectIndex<T> {
    pub async fn from_objects(
        objects: Vec<T>,
        texts: Vec<String>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        if objects.len() != texts.len() {
            return Err(anyhow!(
                "{} objects but {} descriptions",
                objects.len(),
                texts.len()
            ));
        }
        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedder.embed_batch(&texts).await?
        };
        if embeddings.len() != objects.len() {
            return Err(anyhow!(
                "Embedder returned {} vectors for {} objects",
                embeddings.len(),
                objects.len()
            ));
        }
        Ok(Self {
            entries: embeddings.into_iter().zip(objects).collect(),
            embedder,
        })
    }

    /// Best `top` objects for `query`, highest score first
    pub async fn retrieve(&self, query: &str, top: usize) -> Result<Vec<(f32, T)>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }
        let query_emb = self.embedder.embed(query).await?;
        let scores: Vec<f32> = self
            .entries
            .iter()
            .map(|(emb, _)| cosine_similarity(&query_emb, emb))
            .collect();
        Ok(top_k(&scores, top)
            .into_iter()
            .map(|i| (scores[i], self.entries[i].1.clone()))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
