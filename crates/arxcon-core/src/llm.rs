use anyhow::{anyhow, Result};
use arxcon_config::LlmConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn plain(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain("assistant", content)
    }

    /// Assistant turn that requested tool calls, replayed so tool results can follow
    pub fn assistant_tool_calls(content: impl Into<String>, calls: Vec<ToolCallRequest>) -> Self {
        Self {
            tool_calls: calls,
            ..Self::plain("assistant", content)
        }
    }

    /// Result of one tool call, answering `tool_call_id`
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.into()),
            ..Self::plain("tool", content)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    #[serde(rename = "type", default = "default_call_kind")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument object, as the API sends it
    #[serde(default)]
    pub arguments: String,
}

fn default_call_kind() -> String {
    "function".to_string()
}

/// Function definition advertised to the model
#[derive(Debug, Clone)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

impl ToolSpec {
    fn to_request_json(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// One assistant reply: text, requested tool calls, or both
#[derive(Debug, Clone, Default)]
pub struct AssistantTurn {
    pub content: String,
    pub tool_calls: Vec<ToolCallRequest>,
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn chat(&self, messages: &[Message]) -> Result<String>;

    /// Chat with function calling. Providers without tool support answer in text.
    async fn chat_with_tools(
        &self,
        messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<AssistantTurn> {
        let content = self.chat(messages).await?;
        Ok(AssistantTurn {
            content,
            tool_calls: Vec::new(),
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(&[Message::user(prompt)]).await
    }

    fn model_name(&self) -> &str;
}

#[derive(Clone)]
pub struct OpenAIProvider {
    pub model: String,
    pub api_key: String,
    pub client: reqwest::Client,
    pub api_base: String,
    pub max_tokens: Option<u32>,
    pub temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResp {
    choices: Vec<ChatRespChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatRespChoice {
    message: ChatRespMessage,
}

#[derive(Debug, Deserialize)]
struct ChatRespMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCallRequest>,
}

impl OpenAIProvider {
    pub fn new(model: String, api_key: String, timeout_secs: u64) -> Result<Self> {
        Self::with_base(model, api_key, OPENAI_API_BASE.to_string(), timeout_secs)
    }

    pub fn with_base(
        model: String,
        api_key: String,
        api_base: String,
        timeout_secs: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            model,
            api_key,
            client,
            api_base,
            max_tokens: None,
            temperature: 0.0,
        })
    }

    pub fn from_config(config: &LlmConfig, api_key: String) -> Result<Self> {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| OPENAI_API_BASE.to_string());
        let mut provider =
            Self::with_base(config.model.clone(), api_key, api_base, config.timeout_secs)?;
        provider.max_tokens = Some(config.max_tokens);
        provider.temperature = config.temperature;
        Ok(provider)
    }

    fn request_body(&self, messages: &[Message], tools: &[ToolSpec]) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
        });
        if let Some(mt) = self.max_tokens {
            body["max_tokens"] = serde_json::json!(mt);
        }
        if !tools.is_empty() {
            body["tools"] = serde_json::Value::Array(
                tools.iter().map(ToolSpec::to_request_json).collect(),
            );
        }
        body
    }

    async fn chat_inner(&self, messages: &[Message], tools: &[ToolSpec]) -> Result<AssistantTurn> {
        let url = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let body = self.request_body(messages, tools);

        let res = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow!("OpenAI API error: {} - {}", status, text));
        }

        let json: serde_json::Value = res.json().await?;
        parse_chat_response(json)
    }
}

fn parse_chat_response(json: serde_json::Value) -> Result<AssistantTurn> {
    if let Some(error) = json.get("error") {
        return Err(anyhow!("OpenAI API returned error: {}", error));
    }

    let parsed: ChatResp = serde_json::from_value(json)?;
    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| anyhow!("Invalid response format: no choices"))?;

    if message.content.is_none() && message.tool_calls.is_empty() {
        return Err(anyhow!(
            "Invalid response format: missing content in choices"
        ));
    }

    Ok(AssistantTurn {
        content: message.content.unwrap_or_default(),
        tool_calls: message.tool_calls,
    })
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String> {
        let turn = self.chat_inner(messages, &[]).await?;
        Ok(turn.content.trim().to_string())
    }

    async fn chat_with_tools(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<AssistantTurn> {
        self.chat_inner(messages, tools).await
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
