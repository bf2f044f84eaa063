use anyhow::{anyhow, Result};
use arxcon_core::ToolSpec;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of the tool (e.g., "vector_tool_2401_01234v2").
    fn name(&self) -> &str;

    /// A description of what the tool does and when to use it.
    fn description(&self) -> &str;

    /// The JSON schema for the tool's arguments.
    fn schema(&self) -> Value;

    async fn execute(&self, args: Value) -> Result<String>;
}

/// Function definition for the chat API
pub fn tool_spec(tool: &dyn Tool) -> ToolSpec {
    ToolSpec {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        parameters: tool.schema(),
    }
}

/// Anything that answers a natural-language query
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn query(&self, query: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct ToolMetadata {
    pub name: String,
    pub description: String,
}

impl ToolMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Exposes a [`QueryEngine`] as a tool taking a single `input` string
pub struct QueryEngineTool {
    engine: Arc<dyn QueryEngine>,
    metadata: ToolMetadata,
}

impl QueryEngineTool {
    pub fn new(engine: Arc<dyn QueryEngine>, metadata: ToolMetadata) -> Self {
        Self { engine, metadata }
    }
}

#[async_trait]
impl Tool for QueryEngineTool {
    fn name(&self) -> &str {
        &self.metadata.name
    }

    fn description(&self) -> &str {
        &self.metadata.description
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "input": {
                    "type": "string",
                    "description": "The query to answer with this tool"
                }
            },
            "required": ["input"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        // Models sometimes pass the query as a bare string.
        let input = match &args {
            Value::String(s) => s.as_str(),
            _ => args["input"]
                .as_str()
                .ok_or_else(|| anyhow!("Missing 'input' argument for {}", self.metadata.name))?,
        };
        self.engine.query(input).await
    }
}
