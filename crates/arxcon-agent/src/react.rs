//! The top-level consultant agent: a THOUGHT / TOOL_CALL / FINAL_ANSWER loop
//! over the tools retrieved for each message.

use crate::memory::ChatMemory;
use crate::prompts;
use crate::retriever::RelevantToolRetriever;
use crate::tool::Tool;
use anyhow::{anyhow, Result};
use arxcon_config::AgentConfig;
use arxcon_core::{Message, ModelProvider};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{timeout, Duration};
use tracing::{debug, info};

const THOUGHT: &str = "THOUGHT:";
const TOOL_CALL: &str = "TOOL_CALL:";
const FINAL_ANSWER: &str = "FINAL_ANSWER:";

/// A parsed tool call from the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub args: Value,
}

/// One step of the loop, as reported to an observer
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    Thought(String),
    ToolCall(ToolCall),
    Observation { tool_name: String, content: String },
    FinalAnswer(String),
}

impl std::fmt::Display for AgentStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentStep::Thought(t) => write!(f, "THOUGHT: {}", t),
            AgentStep::ToolCall(call) => {
                write!(f, "TOOL_CALL: {} {}", call.tool_name, call.args)
            }
            AgentStep::Observation { tool_name, content } => {
                write!(f, "OBSERVATION ({}): {}", tool_name, content)
            }
            AgentStep::FinalAnswer(a) => write!(f, "FINAL_ANSWER: {}", a),
        }
    }
}

pub type StepObserver = Arc<dyn Fn(&AgentStep) + Send + Sync>;

/// The LLM's raw response, split into its parts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    pub thought: String,
    pub tool_call: Option<ToolCall>,
    /// Set when a TOOL_CALL line was present but its JSON was unusable
    pub tool_call_error: Option<String>,
    pub final_answer: Option<String>,
}

/// Parses the LLM's raw response.
///
/// Text after `FINAL_ANSWER:` is the answer, across lines. The JSON after
/// `TOOL_CALL:` may span lines; anything after it is ignored. A response
/// with neither is an implicit final answer.
pub fn parse_response(response: &str) -> ParsedResponse {
    let mut parsed = ParsedResponse::default();
    let mut thought_lines: Vec<&str> = Vec::new();
    let mut offset = 0;

    for line in response.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let trimmed = line.trim_start();
        let marker_at = line_start + (line.len() - trimmed.len());

        if let Some(rest) = trimmed.strip_prefix(THOUGHT) {
            thought_lines.push(rest.trim());
        } else if trimmed.starts_with(FINAL_ANSWER) {
            let answer = response[marker_at + FINAL_ANSWER.len()..].trim();
            parsed.final_answer = Some(answer.to_string());
            break;
        } else if trimmed.starts_with(TOOL_CALL) {
            let rest = &response[marker_at + TOOL_CALL.len()..];
            match parse_tool_call(rest) {
                Ok(call) => parsed.tool_call = Some(call),
                Err(e) => parsed.tool_call_error = Some(e),
            }
            break;
        } else if !trimmed.trim().is_empty() {
            thought_lines.push(trimmed.trim());
        }
    }

    parsed.thought = thought_lines.join("\n");

    if parsed.final_answer.is_none()
        && parsed.tool_call.is_none()
        && parsed.tool_call_error.is_none()
        && !parsed.thought.is_empty()
    {
        parsed.final_answer = Some(parsed.thought.clone());
    }
    parsed
}

fn parse_tool_call(rest: &str) -> std::result::Result<ToolCall, String> {
    let start = rest
        .find('{')
        .ok_or_else(|| "expected a JSON object after TOOL_CALL:".to_string())?;
    let mut stream = serde_json::Deserializer::from_str(&rest[start..]).into_iter::<ToolCall>();
    match stream.next() {
        Some(Ok(call)) => Ok(call),
        Some(Err(e)) => Err(e.to_string()),
        None => Err("empty TOOL_CALL".to_string()),
    }
}

pub struct ArxivAgent {
    llm: Arc<dyn ModelProvider>,
    retriever: Arc<RelevantToolRetriever>,
    history: Mutex<ChatMemory>,
    max_iterations: usize,
    step_timeout: Duration,
    verbose: bool,
    observer: Option<StepObserver>,
}

impl ArxivAgent {
    pub fn new(
        llm: Arc<dyn ModelProvider>,
        retriever: Arc<RelevantToolRetriever>,
        config: &AgentConfig,
    ) -> Self {
        Self {
            llm,
            retriever,
            history: Mutex::new(ChatMemory::default()),
            max_iterations: config.max_iterations.max(1),
            step_timeout: Duration::from_secs(config.step_timeout_secs),
            verbose: config.verbose,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: StepObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Bound the replayed chat history to `tokens`
    pub fn with_memory_token_limit(mut self, tokens: usize) -> Self {
        self.history = Mutex::new(ChatMemory::new(tokens));
        self
    }

    pub async fn reset(&self) {
        self.history.lock().await.clear();
    }

    /// User messages and final answers so far
    pub async fn history(&self) -> Vec<Message> {
        self.history.lock().await.messages()
    }

    pub async fn chat(&self, message: &str) -> Result<String> {
        let mut history = self.history.lock().await;

        let tools = self.retriever.retrieve(message).await?;
        let listing: Vec<(String, String, String)> = tools
            .iter()
            .map(|t| {
                (
                    t.name().to_string(),
                    t.description().to_string(),
                    t.schema().to_string(),
                )
            })
            .collect();

        let mut messages = vec![Message::system(prompts::consultant_system_prompt(&listing))];
        messages.extend(history.messages());
        messages.push(Message::user(message));

        for step in 0..self.max_iterations {
            let reply = timeout(self.step_timeout, self.llm.chat(&messages))
                .await
                .map_err(|_| {
                    anyhow!(
                        "LLM call timed out after {}s",
                        self.step_timeout.as_secs()
                    )
                })??;
            debug!("step {} reply: {}", step + 1, reply);

            let parsed = parse_response(&reply);
            messages.push(Message::assistant(reply.clone()));

            if !parsed.thought.is_empty() && parsed.final_answer.as_ref() != Some(&parsed.thought) {
                self.emit(AgentStep::Thought(parsed.thought.clone()));
            }

            if let Some(answer) = parsed.final_answer {
                self.emit(AgentStep::FinalAnswer(answer.clone()));
                history.push_turn(vec![Message::user(message), Message::assistant(answer.clone())]);
                return Ok(answer);
            }

            let (tool_name, observation) = match (parsed.tool_call, parsed.tool_call_error) {
                (Some(call), _) => {
                    self.emit(AgentStep::ToolCall(call.clone()));
                    let observation = self.execute_tool(&tools, &call).await;
                    (call.tool_name, observation)
                }
                (None, Some(err)) => (
                    String::new(),
                    format!(
                        "Error: could not parse TOOL_CALL ({}). Use the exact JSON format.",
                        err
                    ),
                ),
                (None, None) => (
                    String::new(),
                    "Error: empty response. Follow the output format.".to_string(),
                ),
            };

            self.emit(AgentStep::Observation {
                tool_name,
                content: observation.clone(),
            });
            messages.push(Message::user(format!("OBSERVATION: {}", observation)));
        }

        Err(anyhow!(
            "Agent did not provide a final answer within {} iterations.",
            self.max_iterations
        ))
    }

    async fn execute_tool(&self, tools: &[Arc<dyn Tool>], call: &ToolCall) -> String {
        let Some(tool) = tools.iter().find(|t| t.name() == call.tool_name) else {
            let names: Vec<&str> = tools.iter().map(|t| t.name()).collect();
            return format!(
                "Error: unknown tool '{}'. Available tools: {}",
                call.tool_name,
                names.join(", ")
            );
        };

        match timeout(self.step_timeout, tool.execute(call.args.clone())).await {
            Ok(Ok(out)) => out,
            Ok(Err(e)) => format!("Error: {}", e),
            Err(_) => format!(
                "Error: tool '{}' timed out after {}s",
                call.tool_name,
                self.step_timeout.as_secs()
            ),
        }
    }

    fn emit(&self, step: AgentStep) {
        if self.verbose {
            info!("{}", step);
        }
        if let Some(observer) = &self.observer {
            observer(&step);
        }
    }
}
