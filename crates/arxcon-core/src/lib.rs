pub mod chunking;
pub mod credentials;
pub mod embedder;
pub mod llm;
pub mod loader;
pub mod models;

pub use embedder::{Embedder, OpenAIEmbedder};
pub use llm::{AssistantTurn, Message, ModelProvider, OpenAIProvider, ToolSpec};
pub use models::{Document, Node, PaperMetadata};
