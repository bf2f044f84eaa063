//! Agent loop configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Reasoning steps the top-level agent may take per chat turn
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Function-calling rounds a paper agent may take per query
    #[serde(default = "default_paper_agent_max_steps")]
    pub paper_agent_max_steps: usize,

    /// Upper bound on a single model or tool step
    #[serde(default = "default_step_timeout")]
    pub step_timeout_secs: u64,

    /// Log each thought and tool call at info level
    #[serde(default)]
    pub verbose: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            paper_agent_max_steps: default_paper_agent_max_steps(),
            step_timeout_secs: default_step_timeout(),
            verbose: false,
        }
    }
}

impl crate::validation::Validate for AgentConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::validation::validate_positive;
        validate_positive("agent.max_iterations", self.max_iterations, 0)?;
        validate_positive("agent.paper_agent_max_steps", self.paper_agent_max_steps, 0)?;
        if self.step_timeout_secs == 0 {
            return Err(crate::error::ConfigError::validation(
                "agent.step_timeout_secs",
                "step_timeout_secs must be > 0",
            ));
        }
        Ok(())
    }
}

fn default_max_iterations() -> usize {
    20
}

fn default_paper_agent_max_steps() -> usize {
    8
}

fn default_step_timeout() -> u64 {
    180
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = AgentConfig::default();
        assert_eq!(config.max_iterations, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_invalid() {
        let config = AgentConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
