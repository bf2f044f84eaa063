//! Core configuration (paths, persistence, credentials)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Root for persisted vector indices and paper summaries
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Where downloaded PDFs are written
    #[serde(default = "default_papers_dir")]
    pub papers_dir: PathBuf,

    /// Keep downloaded PDFs after the agents are built
    #[serde(default = "default_persist_papers")]
    pub persist_papers: bool,

    /// Default number of papers to fetch per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Text file holding the OpenAI API key
    #[serde(default = "default_api_key_file")]
    pub api_key_file: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            papers_dir: default_papers_dir(),
            persist_papers: default_persist_papers(),
            max_results: default_max_results(),
            api_key_file: default_api_key_file(),
        }
    }
}

impl crate::validation::Validate for CoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        if self.storage_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "core.storage_dir",
                "Storage directory cannot be empty",
            ));
        }
        if self.papers_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "core.papers_dir",
                "Papers directory cannot be empty",
            ));
        }
        validate_positive("core.max_results", self.max_results, 0)?;
        Ok(())
    }
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("./storage")
}

fn default_papers_dir() -> PathBuf {
    PathBuf::from(".papers")
}

fn default_persist_papers() -> bool {
    true
}

fn default_max_results() -> usize {
    10
}

fn default_api_key_file() -> PathBuf {
    PathBuf::from("Open_AI_Key.txt")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_max_results_invalid() {
        let config = CoreConfig {
            max_results: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = CoreConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let deserialized: CoreConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, deserialized);
    }
}
