//! One function-calling agent per paper

use crate::engines::{ResponseSynthesizer, SummaryQueryEngine, VectorQueryEngine};
use crate::memory::{ChatMemory, DEFAULT_MEMORY_TOKENS};
use crate::prompts::{self, SUMMARY_TOOL_DESCRIPTION, VECTOR_TOOL_DESCRIPTION};
use crate::tool::{tool_spec, QueryEngine, QueryEngineTool, Tool, ToolMetadata};
use anyhow::{anyhow, Result};
use arxcon_core::{Embedder, Message, ModelProvider, Node};
use arxcon_index::{vector_dir, SummaryRecord, SummaryStore, VectorIndex};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Answers questions about a single paper through its vector and summary tools
pub struct PaperAgent {
    paper_name: String,
    llm: Arc<dyn ModelProvider>,
    tools: Vec<Arc<dyn Tool>>,
    system_prompt: String,
    memory: Mutex<ChatMemory>,
    max_steps: usize,
}

impl PaperAgent {
    pub fn new(
        paper_name: impl Into<String>,
        llm: Arc<dyn ModelProvider>,
        tools: Vec<Arc<dyn Tool>>,
        max_steps: usize,
    ) -> Self {
        let paper_name = paper_name.into();
        Self {
            system_prompt: prompts::paper_agent_prompt(&paper_name),
            paper_name,
            llm,
            tools,
            memory: Mutex::new(ChatMemory::default()),
            max_steps: max_steps.max(1),
        }
    }

    /// Bound the replayed chat history to `tokens`
    pub fn with_memory_token_limit(mut self, tokens: usize) -> Self {
        self.memory = Mutex::new(ChatMemory::new(tokens));
        self
    }

    pub fn paper_name(&self) -> &str {
        &self.paper_name
    }

    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub async fn reset(&self) {
        self.memory.lock().await.clear();
    }

    pub async fn chat(&self, query: &str) -> Result<String> {
        let mut memory = self.memory.lock().await;
        let history = memory.messages();
        let specs: Vec<_> = self.tools.iter().map(|t| tool_spec(t.as_ref())).collect();

        let mut turn_messages = vec![Message::user(query)];

        for step in 0..self.max_steps {
            let mut messages = Vec::with_capacity(history.len() + turn_messages.len() + 1);
            messages.push(Message::system(self.system_prompt.clone()));
            messages.extend(history.iter().cloned());
            messages.extend(turn_messages.iter().cloned());

            let turn = self.llm.chat_with_tools(&messages, &specs).await?;

            if turn.tool_calls.is_empty() {
                let answer = turn.content.trim().to_string();
                turn_messages.push(Message::assistant(answer.clone()));
                memory.push_turn(turn_messages);
                return Ok(answer);
            }

            turn_messages.push(Message::assistant_tool_calls(
                turn.content.clone(),
                turn.tool_calls.clone(),
            ));

            for call in &turn.tool_calls {
                info!(
                    "[{}] step {} calling {} with {}",
                    self.paper_name, step, call.function.name, call.function.arguments
                );
                let output = self
                    .call_tool(&call.function.name, &call.function.arguments)
                    .await;
                debug!("[{}] {} returned {}", self.paper_name, call.function.name, output);
                turn_messages.push(Message::tool(call.id.clone(), output));
            }
        }

        Err(anyhow!(
            "Paper agent {} did not answer within {} steps",
            self.paper_name,
            self.max_steps
        ))
    }

    async fn call_tool(&self, name: &str, arguments: &str) -> String {
        let Some(tool) = self.tools.iter().find(|t| t.name() == name) else {
            return format!(
                "Tool '{}' not found. Available tools: {:?}",
                name,
                self.tool_names()
            );
        };
        let args: Value = serde_json::from_str(arguments)
            .unwrap_or_else(|_| Value::String(arguments.to_string()));
        match tool.execute(args).await {
            Ok(out) => out,
            Err(e) => format!("Error executing tool '{}': {}", name, e),
        }
    }
}

#[async_trait]
impl QueryEngine for PaperAgent {
    async fn query(&self, query: &str) -> Result<String> {
        self.chat(query).await
    }
}

/// Output of [`PaperAgentBuilder::build_agent_per_doc`]
pub struct BuiltPaperAgent {
    pub agent: Arc<PaperAgent>,
    pub summary: String,
    /// Indexed nodes, carrying their embeddings
    pub nodes: Vec<Node>,
}

/// Builds indices, summary and agent for one paper, reusing what is on disk
pub struct PaperAgentBuilder {
    llm: Arc<dyn ModelProvider>,
    embedder: Arc<dyn Embedder>,
    synthesizer: Arc<ResponseSynthesizer>,
    storage_dir: PathBuf,
    summaries: SummaryStore,
    similarity_top_k: usize,
    summary_query: String,
    max_steps: usize,
    memory_tokens: usize,
}

impl PaperAgentBuilder {
    pub fn new(
        llm: Arc<dyn ModelProvider>,
        embedder: Arc<dyn Embedder>,
        synthesizer: Arc<ResponseSynthesizer>,
        storage_dir: PathBuf,
    ) -> Self {
        Self {
            summaries: SummaryStore::new(&storage_dir),
            llm,
            embedder,
            synthesizer,
            storage_dir,
            similarity_top_k: 2,
            summary_query: "Extract a concise 5-6 lines summary of this document".to_string(),
            max_steps: 8,
            memory_tokens: DEFAULT_MEMORY_TOKENS,
        }
    }

    pub fn with_similarity_top_k(mut self, top_k: usize) -> Self {
        self.similarity_top_k = top_k;
        self
    }

    pub fn with_summary_query(mut self, query: impl Into<String>) -> Self {
        self.summary_query = query.into();
        self
    }

    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps;
        self
    }

    pub fn with_memory_token_limit(mut self, tokens: usize) -> Self {
        self.memory_tokens = tokens;
        self
    }

    /// Whether a persisted vector index exists for `paper_name`
    pub fn has_index(&self, paper_name: &str) -> bool {
        VectorIndex::exists(&vector_dir(&self.storage_dir, paper_name))
    }

    /// Build the agent for one paper.
    ///
    /// A persisted index at `<storage>/vector/<paper>` takes precedence over
    /// `nodes`, which may then be empty.
    pub async fn build_agent_per_doc(
        &self,
        nodes: Vec<Node>,
        paper_name: &str,
    ) -> Result<BuiltPaperAgent> {
        let dir = vector_dir(&self.storage_dir, paper_name);
        let index = if VectorIndex::exists(&dir) {
            debug!("loading vector index from {}", dir.display());
            VectorIndex::load(&dir)?
        } else {
            if nodes.is_empty() {
                return Err(anyhow!("No text to index for {}", paper_name));
            }
            let index = VectorIndex::from_nodes(nodes, self.embedder.as_ref()).await?;
            index.persist(&dir)?;
            index
        };
        let index = Arc::new(index);
        let nodes = Arc::new(index.nodes().to_vec());

        let vector_engine = Arc::new(VectorQueryEngine::new(
            index.clone(),
            self.embedder.clone(),
            self.synthesizer.clone(),
            self.similarity_top_k,
        ));
        let summary_engine = Arc::new(SummaryQueryEngine::new(
            nodes.clone(),
            self.synthesizer.clone(),
        ));

        let summary = match self.summaries.load(paper_name)? {
            Some(record) => record.text,
            None => {
                let text = summary_engine.query(&self.summary_query).await?;
                let record = SummaryRecord::new(paper_name, text.clone(), self.llm.model_name());
                self.summaries.save(&record)?;
                text
            }
        };

        let tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(QueryEngineTool::new(
                vector_engine,
                ToolMetadata::new(format!("vector_tool_{}", paper_name), VECTOR_TOOL_DESCRIPTION),
            )),
            Arc::new(QueryEngineTool::new(
                summary_engine,
                ToolMetadata::new(
                    format!("summary_tool_{}", paper_name),
                    SUMMARY_TOOL_DESCRIPTION,
                ),
            )),
        ];

        let agent = Arc::new(PaperAgent::new(
            paper_name,
            self.llm.clone(),
            tools,
            self.max_steps,
        )
        .with_memory_token_limit(self.memory_tokens));

        Ok(BuiltPaperAgent {
            agent,
            summary,
            nodes: nodes.as_ref().clone(),
        })
    }
}
