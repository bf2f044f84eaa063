use crate::chunking::tokenizer::tokenizer;
use crate::models::{Document, Node};
use anyhow::{anyhow, Result};
use arxcon_config::ChunkingConfig;
use text_splitter::{ChunkConfig, TextSplitter};

/// Token-bounded splitter that prefers sentence and paragraph boundaries
#[derive(Debug, Clone)]
pub struct SentenceSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SentenceSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            chunk_overlap: chunk_overlap.min(chunk_size.saturating_sub(1)),
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    pub fn split_text(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let chunks: Vec<String> = match tokenizer() {
            Some(bpe) => {
                let config = ChunkConfig::new(self.chunk_size)
                    .with_sizer(bpe.clone())
                    .with_overlap(self.chunk_overlap)
                    .map_err(|e| anyhow!("Invalid chunk config: {}", e))?;
                TextSplitter::new(config)
                    .chunks(text)
                    .map(str::to_string)
                    .collect()
            }
            None => {
                // Character sizing at ~4 chars per token when the tokenizer is missing.
                let config = ChunkConfig::new(self.chunk_size * 4)
                    .with_overlap(self.chunk_overlap * 4)
                    .map_err(|e| anyhow!("Invalid chunk config: {}", e))?;
                TextSplitter::new(config)
                    .chunks(text)
                    .map(str::to_string)
                    .collect()
            }
        };

        Ok(chunks
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect())
    }

    pub fn nodes_from_document(&self, doc: &Document) -> Result<Vec<Node>> {
        let nodes = self
            .split_text(&doc.text)?
            .into_iter()
            .enumerate()
            .map(|(i, text)| Node::new(&doc.file_name, i, text, doc.metadata.clone()))
            .collect();
        Ok(nodes)
    }
}
