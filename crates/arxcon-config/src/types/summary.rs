//! Response synthesis configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// Token budget for the context block of one synthesis prompt
    #[serde(default = "default_context_budget")]
    pub context_budget_tokens: usize,

    /// Token budget for the chat history replayed to an agent
    #[serde(default = "default_memory_token_limit")]
    pub memory_token_limit: usize,

    /// Query used to produce each paper's short summary
    #[serde(default = "default_summary_query")]
    pub summary_query: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            context_budget_tokens: default_context_budget(),
            memory_token_limit: default_memory_token_limit(),
            summary_query: default_summary_query(),
        }
    }
}

impl crate::validation::Validate for SummaryConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_positive(
            "summary.context_budget_tokens",
            self.context_budget_tokens,
            0,
        )?;
        crate::validation::validate_positive(
            "summary.memory_token_limit",
            self.memory_token_limit,
            0,
        )?;
        crate::validation::validate_non_empty("summary.summary_query", &self.summary_query)
    }
}

fn default_context_budget() -> usize {
    3000
}

// Three quarters of a 4k context window.
fn default_memory_token_limit() -> usize {
    3072
}

fn default_summary_query() -> String {
    "Extract a concise 5-6 lines summary of this document".to_string()
}
