//! Reading `.arxcon.*` files

use crate::{error::ConfigError, loader::ConfigFormat, Config, Result, Validate};
use std::fs;
use std::path::{Path, PathBuf};

/// Config files checked by [`Config::load`], first match wins
pub const DEFAULT_PATHS: [&str; 4] = [
    ".arxcon.toml",
    ".arxcon.yml",
    ".arxcon.yaml",
    ".arxcon.json",
];

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or_default();
        match ext.to_ascii_lowercase().as_str() {
            "yml" | "yaml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnknownFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    fn parse(self, content: &str, origin: Option<&str>) -> Result<Config> {
        use super::formats::{json, toml, yaml};
        match self {
            Self::Yaml => yaml::parse_with_path(content, origin),
            Self::Toml => toml::parse_with_path(content, origin),
            Self::Json => json::parse_with_path(content, origin),
        }
    }
}

/// First of [`DEFAULT_PATHS`] that exists under `dir`
pub fn find_default_file(dir: &Path) -> Option<PathBuf> {
    DEFAULT_PATHS
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Parse and validate one file. The format follows the extension.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;

    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let config = format.parse(&content, path.to_str())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_extension() {
        let cases = [
            (".arxcon.yml", ConfigFormat::Yaml),
            (".arxcon.YAML", ConfigFormat::Yaml),
            (".arxcon.toml", ConfigFormat::Toml),
            (".arxcon.json", ConfigFormat::Json),
        ];
        for (name, expected) in cases {
            assert_eq!(ConfigFormat::from_path(Path::new(name)).unwrap(), expected);
        }
        assert!(ConfigFormat::from_path(Path::new("arxcon.ini")).is_err());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_from_file("/nonexistent/.arxcon.toml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_default_file_order() {
        let dir = TempDir::new().unwrap();
        assert!(find_default_file(dir.path()).is_none());

        fs::write(dir.path().join(".arxcon.json"), "{}").unwrap();
        fs::write(dir.path().join(".arxcon.yml"), "core: {}\n").unwrap();
        let found = find_default_file(dir.path()).unwrap();
        assert!(found.ends_with(".arxcon.yml"));
    }

    #[test]
    fn test_invalid_values_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[chunking]\nchunk_size = 100\nchunk_overlap = 150\n").unwrap();
        assert!(matches!(
            load_from_file(&path),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
