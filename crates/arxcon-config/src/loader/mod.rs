//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod formats;
pub mod merge;

pub use file::{find_default_file, DEFAULT_PATHS};

use crate::{Config, Result, Validate};
use std::path::{Path, PathBuf};

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Configuration source for layered loading
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
    /// Explicit config object (CLI flags, tests)
    Explicit(Config),
}

/// Builder for loading and merging configurations
///
/// Precedence: defaults < file < environment < explicit overrides
///
/// # Example
///
/// ```no_run
/// use arxcon_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".arxcon.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), arxcon_config::error::ConfigError>(())
/// ```
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.sources.push(ConfigSource::Explicit(config));
        self
    }

    /// Merge all sources in order and validate the result.
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    let file_config = file::load_from_file(&path)?;
                    config = merge::merge(config, file_config);
                }
                ConfigSource::Environment => {
                    if let Some(env_config) = env::from_env()? {
                        config = merge::merge(config, env_config);
                    }
                }
                ConfigSource::Explicit(explicit_config) => {
                    config = merge::merge(config, explicit_config);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        Self::new().with_file(path).build()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load from the first default file found in the working directory,
    /// then overlay `ARXCON_*` environment variables.
    ///
    /// Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        Self::load_in(Path::new("."))
    }

    /// Same as [`Config::load`] with the default files resolved against `dir`
    pub fn load_in(dir: &Path) -> Result<Self> {
        let mut builder = ConfigBuilder::new();
        if let Some(path) = find_default_file(dir) {
            tracing::debug!("loading config from {}", path.display());
            builder = builder.with_file(path);
        }
        builder.with_env().build()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigBuilder::from_file(path)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RerankMode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builder_defaults() {
        let _guard = test_support::ENV_LOCK.lock().unwrap();
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.llm.model, "gpt-3.5-turbo");
        assert_eq!(config.retrieval.top_n, 5);
    }

    #[test]
    fn test_file_then_explicit() {
        let _guard = test_support::ENV_LOCK.lock().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "llm:\n  model: gpt-4o-mini\nretrieval:\n  top_n: 3\n",
        )
        .unwrap();

        let mut explicit = Config::default();
        explicit.retrieval.rerank = RerankMode::None;

        let config = ConfigBuilder::new()
            .with_file(&path)
            .with_config(explicit)
            .build()
            .unwrap();

        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.retrieval.top_n, 3);
        assert_eq!(config.retrieval.rerank, RerankMode::None);
    }

    #[test]
    fn test_missing_file_errors() {
        let result = ConfigBuilder::from_file("/nonexistent/arxcon.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_in_picks_first_default() {
        let _guard = test_support::ENV_LOCK.lock().unwrap();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".arxcon.toml"), "[core]\nmax_results = 4\n").unwrap();
        fs::write(dir.path().join(".arxcon.json"), r#"{"core": {"max_results": 7}}"#).unwrap();

        let config = Config::load_in(dir.path()).unwrap();
        assert_eq!(config.core.max_results, 4);
    }

    #[test]
    fn test_load_in_without_files() {
        let _guard = test_support::ENV_LOCK.lock().unwrap();
        let dir = TempDir::new().unwrap();
        let config = Config::load_in(dir.path()).unwrap();
        assert_eq!(config.core.max_results, 10);
    }
}
