#![allow(dead_code)]

use anyhow::Result;
use arxcon_agent::ConsultantContext;
use arxcon_arxiv::{ArxivPaper, PaperSource};
use arxcon_config::{Config, RerankMode};
use arxcon_core::llm::{FunctionCall, ToolCallRequest};
use arxcon_core::loader::{DocumentLoader, TextLoader};
use arxcon_core::{AssistantTurn, Document, Embedder, Message, ModelProvider, PaperMetadata, ToolSpec};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const VOCAB: [&str; 6] = ["attention", "graph", "diffusion", "robot", "protein", "quantum"];

/// Vocabulary word occurring earliest in `text`
pub fn topic_of(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    VOCAB
        .iter()
        .filter_map(|w| lower.find(w).map(|at| (at, *w)))
        .min()
        .map(|(_, w)| w)
        .unwrap_or("nothing")
}

/// One dimension per vocabulary word, counting occurrences
pub struct KeywordEmbedder;

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(VOCAB
            .iter()
            .map(|w| lower.matches(w).count() as f32)
            .collect())
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for t in texts {
            out.push(self.embed(t).await?);
        }
        Ok(out)
    }
}

type Router = dyn Fn(&[Message], &[ToolSpec]) -> AssistantTurn + Send + Sync;
type ReactScript = dyn Fn(&[Message]) -> String + Send + Sync;

/// Deterministic model: answers each prompt kind from its content
pub struct MockLlm {
    router: Box<Router>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockLlm {
    pub fn new(
        router: impl Fn(&[Message], &[ToolSpec]) -> AssistantTurn + Send + Sync + 'static,
    ) -> Self {
        Self {
            router: Box::new(router),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Standard behavior for every prompt kind
    pub fn standard() -> Self {
        Self::with_react(standard_react)
    }

    /// Standard behavior, with the consultant loop driven by `react`
    pub fn with_react(react: impl Fn(&[Message]) -> String + Send + Sync + 'static) -> Self {
        let react: Box<ReactScript> = Box::new(react);
        Self::new(move |messages, tools| standard_route(messages, tools, react.as_ref()))
    }

    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls whose last message contains `needle`
    pub fn calls_containing(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.last().map(|l| l.content.contains(needle)).unwrap_or(false))
            .count()
    }
}

#[async_trait]
impl ModelProvider for MockLlm {
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        Ok(self.chat_with_tools(messages, &[]).await?.content)
    }

    async fn chat_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<AssistantTurn> {
        self.calls.lock().unwrap().push(messages.to_vec());
        Ok((self.router)(messages, tools))
    }

    fn model_name(&self) -> &str {
        "mock-llm"
    }
}

pub fn reply(content: impl Into<String>) -> AssistantTurn {
    AssistantTurn {
        content: content.into(),
        tool_calls: Vec::new(),
    }
}

pub fn call_tool(name: &str, input: &str) -> AssistantTurn {
    AssistantTurn {
        content: String::new(),
        tool_calls: vec![ToolCallRequest {
            id: "call_1".to_string(),
            kind: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: json!({ "input": input }).to_string(),
            },
        }],
    }
}

pub fn is_consultant(messages: &[Message]) -> bool {
    messages
        .first()
        .map(|m| m.role == "system" && m.content.starts_with("You are an IP consultant"))
        .unwrap_or(false)
}

fn last_content(messages: &[Message]) -> &str {
    messages.last().map(|m| m.content.as_str()).unwrap_or_default()
}

/// Latest user message that is not an observation
pub fn user_question(messages: &[Message]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| m.role == "user" && !m.content.starts_with("OBSERVATION:"))
        .map(|m| m.content.clone())
        .unwrap_or_default()
}

/// First paper tool listed in a consultant system prompt
pub fn first_paper_tool(messages: &[Message]) -> String {
    messages
        .first()
        .and_then(|m| {
            m.content
                .lines()
                .find_map(|l| l.strip_prefix("- tool_"))
                .and_then(|rest| rest.split(':').next())
                .map(|name| format!("tool_{}", name))
        })
        .unwrap_or_default()
}

/// Call the first paper tool, then answer with its observation
pub fn standard_react(messages: &[Message]) -> String {
    let last = last_content(messages);
    if let Some(obs) = last.strip_prefix("OBSERVATION: ") {
        return format!("THOUGHT: I have enough.\nFINAL_ANSWER: Based on the papers: {}", obs);
    }
    format!(
        "THOUGHT: I should ask the paper.\nTOOL_CALL: {}",
        json!({"tool_name": first_paper_tool(messages), "args": {"input": user_question(messages)}})
    )
}

fn standard_route(messages: &[Message], tools: &[ToolSpec], react: &ReactScript) -> AssistantTurn {
    // Per-paper agent
    if !tools.is_empty() {
        let last = messages.last();
        if let Some(m) = last.filter(|m| m.role == "tool") {
            return reply(format!("Paper answer: {}", m.content));
        }
        let vector_tool = tools
            .iter()
            .find(|t| t.name.starts_with("vector_tool_"))
            .map(|t| t.name.clone())
            .unwrap_or_default();
        return call_tool(&vector_tool, last_content(messages));
    }

    if is_consultant(messages) {
        return reply(react(messages));
    }

    let prompt = last_content(messages);
    if prompt.contains("Rate how relevant") {
        return reply("{\"score\": 5}");
    }
    if prompt.contains("output a list of relevant sub-questions") {
        return reply(sub_question_plan(prompt));
    }
    if prompt.starts_with("Context information from multiple sources") {
        return reply(format!("This paper studies {}.", topic_of(context_block(prompt))));
    }
    if prompt.starts_with("Context information is below") {
        return reply(format!("Answer: {}", topic_of(context_block(prompt))));
    }
    if let Some(rest) = prompt.split("We have provided an existing answer: ").nth(1) {
        return reply(rest.lines().next().unwrap_or_default().to_string());
    }
    reply("ok")
}

fn context_block(prompt: &str) -> &str {
    prompt.split("---------------------").nth(1).unwrap_or(prompt)
}

fn sub_question_plan(prompt: &str) -> String {
    let tools_json = prompt
        .split("# Tools\n")
        .nth(1)
        .and_then(|rest| rest.split("\n\n# User Question").next())
        .unwrap_or("{}");
    let catalog: Map<String, Value> = serde_json::from_str(tools_json).unwrap_or_default();
    let plan: Vec<Value> = catalog
        .keys()
        .map(|name| json!({"sub_question": format!("What does {} propose?", name), "tool_name": name}))
        .collect();
    Value::Array(plan).to_string()
}

pub fn paper(id: &str, title: &str) -> ArxivPaper {
    ArxivPaper {
        entry_id: format!("http://arxiv.org/abs/{}", id),
        title: title.to_string(),
        authors: vec!["Ada Lovelace".to_string(), "Alan Turing".to_string()],
        published: Utc.with_ymd_and_hms(2024, 1, 2, 10, 0, 0).unwrap(),
        summary: format!("Abstract of {}", title),
        pdf_url: format!("http://arxiv.org/pdf/{}", id),
    }
}

/// Serves fixed papers and "downloads" their text
pub struct FixtureSource {
    papers: Vec<(ArxivPaper, String)>,
    pub downloads: AtomicUsize,
}

impl FixtureSource {
    pub fn new(papers: Vec<(ArxivPaper, String)>) -> Self {
        Self {
            papers,
            downloads: AtomicUsize::new(0),
        }
    }

    /// A robotics paper and a protein paper
    pub fn two_papers() -> Self {
        Self::new(vec![
            (
                paper("2401.00001v1", "Tactile Robot Grasping"),
                "We teach a robot to grasp objects. The robot uses tactile sensing.".to_string(),
            ),
            (
                paper("2401.00002v1", "Protein Folding at Scale"),
                "We predict protein structure. Each protein is folded by a deep network."
                    .to_string(),
            ),
        ])
    }
}

#[async_trait]
impl PaperSource for FixtureSource {
    async fn search(&self, _query: &str, max_results: usize) -> arxcon_arxiv::Result<Vec<ArxivPaper>> {
        Ok(self
            .papers
            .iter()
            .take(max_results)
            .map(|(p, _)| p.clone())
            .collect())
    }

    async fn download_pdf(
        &self,
        paper: &ArxivPaper,
        dir: &Path,
        file_name: &str,
    ) -> arxcon_arxiv::Result<PathBuf> {
        let text = self
            .papers
            .iter()
            .find(|(p, _)| p.entry_id == paper.entry_id)
            .map(|(_, t)| t.clone())
            .unwrap_or_default();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(file_name);
        std::fs::write(&path, text)?;
        self.downloads.fetch_add(1, Ordering::SeqCst);
        Ok(path)
    }

    fn name(&self) -> &str {
        "fixture"
    }
}

/// Text loader that counts how often it is used
#[derive(Default)]
pub struct CountingLoader {
    pub loads: AtomicUsize,
}

impl DocumentLoader for CountingLoader {
    fn load(&self, path: &Path, metadata: PaperMetadata) -> Result<Document> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        TextLoader.load(path, metadata)
    }
}

pub fn test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.core.storage_dir = root.join("storage");
    config.core.papers_dir = root.join(".papers");
    config.retrieval.rerank = RerankMode::None;
    config.agent.step_timeout_secs = 10;
    config
}

pub fn test_context(
    config: Config,
    llm: Arc<MockLlm>,
    source: Arc<FixtureSource>,
    loader: Arc<CountingLoader>,
) -> ConsultantContext {
    ConsultantContext::new(config, llm, Arc::new(KeywordEmbedder), source, loader)
}

/// Ignores build progress
pub fn quiet(_event: arxcon_agent::BuildEvent) {}
