//! Embedding model configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Inputs per embeddings request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            batch_size: default_batch_size(),
            api_base: None,
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        crate::validation::validate_non_empty("embedding.model_name", &self.model_name)?;
        crate::validation::validate_positive("embedding.batch_size", self.batch_size, 0)?;
        if let Some(api_base) = &self.api_base {
            crate::validation::validate_url("embedding.api_base", api_base)?;
        }
        Ok(())
    }
}

fn default_model_name() -> String {
    "text-embedding-3-small".to_string()
}

fn default_batch_size() -> usize {
    256
}
