//! Agents and query engines over a fetched set of arXiv papers.
//!
//! Each paper gets a function-calling [`PaperAgent`] over a vector tool and a
//! summary tool. The [`ArxivAgent`] on top picks the paper agents relevant to
//! each message through the [`RelevantToolRetriever`] and reasons over them
//! in a THOUGHT / TOOL_CALL / FINAL_ANSWER loop.

pub mod builder;
pub mod consultant;
pub mod context;
pub mod engines;
pub mod memory;
pub mod paper_agent;
pub mod prompts;
pub mod react;
pub mod rerank;
pub mod retriever;
pub mod tool;

pub use builder::{ArxivBuilder, BuildEvent, PaperEntry, PaperLibrary};
pub use consultant::Consultant;
pub use context::ConsultantContext;
pub use memory::ChatMemory;
pub use paper_agent::{BuiltPaperAgent, PaperAgent, PaperAgentBuilder};
pub use react::{parse_response, AgentStep, ArxivAgent, StepObserver, ToolCall};
pub use rerank::{LlmReranker, NoopReranker, Reranker};
pub use retriever::{RelevantToolRetriever, BASE_ENGINE_NAME, COMPARE_TOOL_NAME};
pub use tool::{QueryEngine, QueryEngineTool, Tool, ToolMetadata};
