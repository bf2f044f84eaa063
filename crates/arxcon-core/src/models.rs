use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Bibliographic fields attached to every node of a paper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperMetadata {
    pub title: String,
    /// Author names joined with ", "
    pub authors: String,
    /// Publication date as `%m/%d/%Y`
    pub published: String,
    pub url: String,
    /// Abstract
    #[serde(default)]
    pub summary: String,
}

impl PaperMetadata {
    /// Header prepended to node text before embedding
    pub fn header(&self) -> String {
        format!(
            "Title of this paper: {}\nAuthors: {}\nDate published: {}\nURL: {}",
            self.title, self.authors, self.published, self.url
        )
    }
}

/// Full text of one paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub file_name: String,
    pub text: String,
    pub metadata: PaperMetadata,
}

/// A chunk of a document, the unit of vector retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub file_name: String,
    pub index: usize,
    pub text: String,
    pub metadata: PaperMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl Node {
    pub fn new(file_name: &str, index: usize, text: String, metadata: PaperMetadata) -> Self {
        Self {
            id: node_id(file_name, index, &text),
            file_name: file_name.to_string(),
            index,
            text,
            metadata,
            embedding: None,
        }
    }

    /// Text sent to the embedder: metadata header, blank line, chunk text
    pub fn embed_text(&self) -> String {
        format!("{}\n\n{}", self.metadata.header(), self.text)
    }
}

/// First 16 hex chars of sha256(file name, index, text)
pub fn node_id(file_name: &str, index: usize, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(file_name.as_bytes());
    hasher.update(index.to_string().as_bytes());
    hasher.update(text.as_bytes());
    let hash = hex::encode(hasher.finalize());
    hash[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> PaperMetadata {
        PaperMetadata {
            title: "Attention Is All You Need".to_string(),
            authors: "Ashish Vaswani, Noam Shazeer".to_string(),
            published: "06/12/2017".to_string(),
            url: "http://arxiv.org/abs/1706.03762v7".to_string(),
            summary: String::new(),
        }
    }

    #[test]
    fn node_ids_are_stable_and_distinct() {
        let a = Node::new("1706_03762v7.pdf", 0, "text".to_string(), metadata());
        let b = Node::new("1706_03762v7.pdf", 0, "text".to_string(), metadata());
        let c = Node::new("1706_03762v7.pdf", 1, "text".to_string(), metadata());
        assert_eq!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(a.id.len(), 16);
    }

    #[test]
    fn embed_text_carries_header() {
        let node = Node::new("x.pdf", 0, "body".to_string(), metadata());
        let text = node.embed_text();
        assert!(text.starts_with("Title of this paper: Attention Is All You Need\n"));
        assert!(text.contains("Date published: 06/12/2017"));
        assert!(text.ends_with("\n\nbody"));
    }
}
