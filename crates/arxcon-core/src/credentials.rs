use anyhow::{anyhow, Result};
use std::env;
use std::path::Path;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Read the OpenAI key from `path`, falling back to `OPENAI_API_KEY`
pub fn load_api_key(path: &Path) -> Result<String> {
    if let Ok(contents) = std::fs::read_to_string(path) {
        let key = contents.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
        tracing::warn!("{} is empty, trying {}", path.display(), API_KEY_ENV);
    }

    match env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(anyhow!(
            "No OpenAI API key found: write it to {} or set {}",
            path.display(),
            API_KEY_ENV
        )),
    }
}
