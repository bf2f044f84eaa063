//! Comparison across papers by decomposing a query into per-tool sub-questions

use crate::engines::synthesizer::ResponseSynthesizer;
use crate::prompts;
use crate::tool::{QueryEngine, Tool};
use anyhow::Result;
use arxcon_core::ModelProvider;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubQuestion {
    pub sub_question: String,
    pub tool_name: String,
}

pub struct SubQuestionQueryEngine {
    tools: Vec<Arc<dyn Tool>>,
    llm: Arc<dyn ModelProvider>,
    synthesizer: Arc<ResponseSynthesizer>,
}

impl SubQuestionQueryEngine {
    pub fn new(
        tools: Vec<Arc<dyn Tool>>,
        llm: Arc<dyn ModelProvider>,
        synthesizer: Arc<ResponseSynthesizer>,
    ) -> Self {
        Self {
            tools,
            llm,
            synthesizer,
        }
    }

    /// Sub-questions for `query`; asks every tool the original query
    /// when the model's plan is unusable.
    pub async fn plan(&self, query: &str) -> Result<Vec<SubQuestion>> {
        let catalog: serde_json::Map<String, serde_json::Value> = self
            .tools
            .iter()
            .map(|t| (t.name().to_string(), json!(t.description())))
            .collect();
        let tools_json = serde_json::to_string_pretty(&catalog)?;

        let reply = self
            .llm
            .complete(&prompts::sub_question_plan(&tools_json, query))
            .await?;

        match parse_plan(&reply) {
            Some(plan) if !plan.is_empty() => Ok(plan),
            _ => {
                warn!("unusable sub-question plan, asking every tool the original query");
                Ok(self
                    .tools
                    .iter()
                    .map(|t| SubQuestion {
                        sub_question: query.to_string(),
                        tool_name: t.name().to_string(),
                    })
                    .collect())
            }
        }
    }

    fn find_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }
}

#[async_trait]
impl QueryEngine for SubQuestionQueryEngine {
    async fn query(&self, query: &str) -> Result<String> {
        let plan = self.plan(query).await?;
        debug!("generated {} sub questions", plan.len());

        let mut answers = Vec::new();
        for sq in &plan {
            let Some(tool) = self.find_tool(&sq.tool_name) else {
                warn!("sub question names unknown tool {}, skipping", sq.tool_name);
                continue;
            };
            match tool.execute(json!({ "input": sq.sub_question })).await {
                Ok(answer) => {
                    debug!("[{}] Q: {}\nA: {}", sq.tool_name, sq.sub_question, answer);
                    answers.push(format!(
                        "Sub question: {}\nResponse: {}",
                        sq.sub_question, answer
                    ));
                }
                Err(e) => warn!("sub question on {} failed: {}", sq.tool_name, e),
            }
        }

        self.synthesizer.compact(query, &answers).await
    }
}

/// The first JSON array in `reply`, read as sub-questions
pub fn parse_plan(reply: &str) -> Option<Vec<SubQuestion>> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&reply[start..=end]).ok()
}
