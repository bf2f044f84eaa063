//! Environment variable configuration overlay
//!
//! Variables follow `ARXCON_<section>_<field>=value`, for example:
//! - `ARXCON_LLM_MODEL=gpt-4o-mini`
//! - `ARXCON_CORE_MAX_RESULTS=5`
//! - `ARXCON_RETRIEVAL_RERANK=none`
//!
//! `OPENAI_API_KEY` is not read here; key loading lives with the credentials.

use crate::{error::ConfigError, types::*, Config, Result};
use std::env;
use std::path::PathBuf;

const PREFIX: &str = "ARXCON_";

/// Parse configuration from environment variables
///
/// Returns `None` when no `ARXCON_` variable is set. Unparseable variables
/// are skipped with a warning.
pub fn from_env() -> Result<Option<Config>> {
    let env_vars: Vec<(String, String)> = env::vars()
        .filter(|(k, _)| k.starts_with(PREFIX))
        .collect();

    if env_vars.is_empty() {
        return Ok(None);
    }

    let mut config = Config::default();
    for (key, value) in env_vars {
        if let Err(e) = apply_env_var(&mut config, &key, &value) {
            tracing::warn!("ignoring {}: {}", key, e);
        }
    }

    Ok(Some(config))
}

fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let key = key.strip_prefix(PREFIX).unwrap_or(key);

    let parts: Vec<&str> = key.split('_').collect();
    if parts.len() < 2 {
        return Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: "Expected format: ARXCON_<section>_<field>".to_string(),
        });
    }

    let section = parts[0].to_lowercase();
    let field = parts[1..].join("_").to_lowercase();

    match section.as_str() {
        "core" => apply_core_var(&mut config.core, &field, value),
        "arxiv" => apply_arxiv_var(&mut config.arxiv, &field, value),
        "llm" => apply_llm_var(&mut config.llm, &field, value),
        "embedding" => apply_embedding_var(&mut config.embedding, &field, value),
        "chunking" => apply_chunking_var(&mut config.chunking, &field, value),
        "retrieval" => apply_retrieval_var(&mut config.retrieval, &field, value),
        "summary" => apply_summary_var(&mut config.summary, &field, value),
        "agent" => apply_agent_var(&mut config.agent, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var: key.to_string(),
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn apply_core_var(config: &mut CoreConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "storage_dir" => config.storage_dir = PathBuf::from(value),
        "papers_dir" => config.papers_dir = PathBuf::from(value),
        "persist_papers" => config.persist_papers = parse_bool(value, "persist_papers")?,
        "max_results" => config.max_results = parse_num(value, "max_results")?,
        "api_key_file" => config.api_key_file = PathBuf::from(value),
        _ => return Err(unknown_field("core", field)),
    }
    Ok(())
}

fn apply_arxiv_var(config: &mut ArxivConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "api_base" => config.api_base = value.to_string(),
        "timeout_secs" => config.timeout_secs = parse_num(value, "timeout_secs")?,
        "sort_by" => {
            config.sort_by = SortBy::parse(value)
                .ok_or_else(|| ConfigError::invalid_enum("arxiv.sort_by", value, &SortBy::OPTIONS))?
        }
        _ => return Err(unknown_field("arxiv", field)),
    }
    Ok(())
}

fn apply_llm_var(config: &mut LlmConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "model" => config.model = value.to_string(),
        "max_tokens" => config.max_tokens = parse_num(value, "max_tokens")?,
        "api_base" => config.api_base = Some(value.to_string()),
        "timeout_secs" => config.timeout_secs = parse_num(value, "timeout_secs")?,
        "temperature" => config.temperature = parse_num(value, "temperature")?,
        _ => return Err(unknown_field("llm", field)),
    }
    Ok(())
}

fn apply_embedding_var(config: &mut EmbeddingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "model_name" | "model" => config.model_name = value.to_string(),
        "batch_size" => config.batch_size = parse_num(value, "batch_size")?,
        "api_base" => config.api_base = Some(value.to_string()),
        _ => return Err(unknown_field("embedding", field)),
    }
    Ok(())
}

fn apply_chunking_var(config: &mut ChunkingConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "chunk_size" => config.chunk_size = parse_num(value, "chunk_size")?,
        "chunk_overlap" => config.chunk_overlap = parse_num(value, "chunk_overlap")?,
        _ => return Err(unknown_field("chunking", field)),
    }
    Ok(())
}

fn apply_retrieval_var(config: &mut RetrievalConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "top_n" => config.top_n = parse_num(value, "top_n")?,
        "similarity_top_k" => config.similarity_top_k = parse_num(value, "similarity_top_k")?,
        "base_similarity_top_k" => {
            config.base_similarity_top_k = parse_num(value, "base_similarity_top_k")?
        }
        "rerank" => {
            config.rerank = RerankMode::parse(value).ok_or_else(|| {
                ConfigError::invalid_enum("retrieval.rerank", value, &RerankMode::OPTIONS)
            })?
        }
        _ => return Err(unknown_field("retrieval", field)),
    }
    Ok(())
}

fn apply_summary_var(config: &mut SummaryConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "context_budget_tokens" => {
            config.context_budget_tokens = parse_num(value, "context_budget_tokens")?
        }
        "memory_token_limit" => {
            config.memory_token_limit = parse_num(value, "memory_token_limit")?
        }
        "summary_query" => config.summary_query = value.to_string(),
        _ => return Err(unknown_field("summary", field)),
    }
    Ok(())
}

fn apply_agent_var(config: &mut AgentConfig, field: &str, value: &str) -> Result<()> {
    match field {
        "max_iterations" => config.max_iterations = parse_num(value, "max_iterations")?,
        "paper_agent_max_steps" => {
            config.paper_agent_max_steps = parse_num(value, "paper_agent_max_steps")?
        }
        "step_timeout_secs" => config.step_timeout_secs = parse_num(value, "step_timeout_secs")?,
        "verbose" => config.verbose = parse_bool(value, "verbose")?,
        _ => return Err(unknown_field("agent", field)),
    }
    Ok(())
}

fn unknown_field(section: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: format!("{}_{}", section, field).to_uppercase(),
        message: format!("Unknown {} field: {}", section, field),
    }
}

fn parse_num<T: std::str::FromStr>(value: &str, field: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarError {
        var: field.to_string(),
        message: format!("Invalid number: {}", value),
    })
}

fn parse_bool(value: &str, field: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvVarError {
            var: field.to_string(),
            message: format!("Invalid boolean: {}", value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::test_support::ENV_LOCK;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true", "x").unwrap());
        assert!(parse_bool("ON", "x").unwrap());
        assert!(!parse_bool("0", "x").unwrap());
        assert!(parse_bool("maybe", "x").is_err());
    }

    #[test]
    fn test_apply_sections() {
        let mut config = Config::default();
        apply_env_var(&mut config, "ARXCON_LLM_MODEL", "gpt-4o").unwrap();
        apply_env_var(&mut config, "ARXCON_CORE_PERSIST_PAPERS", "false").unwrap();
        apply_env_var(&mut config, "ARXCON_RETRIEVAL_RERANK", "none").unwrap();
        apply_env_var(&mut config, "ARXCON_AGENT_STEP_TIMEOUT_SECS", "30").unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert!(!config.core.persist_papers);
        assert_eq!(config.retrieval.rerank, RerankMode::None);
        assert_eq!(config.agent.step_timeout_secs, 30);
    }

    #[test]
    fn test_unknown_section_and_bad_enum() {
        let mut config = Config::default();
        assert!(apply_env_var(&mut config, "ARXCON_GRAPH_DEPTH", "2").is_err());
        let err = apply_env_var(&mut config, "ARXCON_ARXIV_SORT_BY", "relevanse").unwrap_err();
        assert!(err.to_string().contains("Did you mean 'relevance'?"));
    }

    #[test]
    fn test_from_env_overlay() {
        let _guard = ENV_LOCK.lock().unwrap();
        env::set_var("ARXCON_CORE_MAX_RESULTS", "3");
        env::set_var("ARXCON_CHUNKING_CHUNK_SIZE", "not-a-number");
        let config = from_env().unwrap().unwrap();
        env::remove_var("ARXCON_CORE_MAX_RESULTS");
        env::remove_var("ARXCON_CHUNKING_CHUNK_SIZE");

        assert_eq!(config.core.max_results, 3);
        assert_eq!(config.chunking.chunk_size, 1024);
    }
}
