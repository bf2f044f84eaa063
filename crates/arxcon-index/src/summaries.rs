//! Persisted one-line paper summaries

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub paper: String,
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

impl SummaryRecord {
    pub fn new(paper: impl Into<String>, text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            paper: paper.into(),
            text: text.into(),
            model: model.into(),
            generated_at: Utc::now(),
        }
    }
}

/// Summaries under `<storage>/summary/<paper>_summary.json`
#[derive(Debug, Clone)]
pub struct SummaryStore {
    root: PathBuf,
}

impl SummaryStore {
    pub fn new(storage_dir: &Path) -> Self {
        Self {
            root: storage_dir.join("summary"),
        }
    }

    pub fn path_for(&self, paper: &str) -> PathBuf {
        self.root.join(format!("{}_summary.json", paper))
    }

    /// `Ok(None)` when no summary was saved for `paper`
    pub fn load(&self, paper: &str) -> Result<Option<SummaryRecord>> {
        let path = self.path_for(paper);
        if !path.is_file() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let record = serde_json::from_str(&raw)
            .with_context(|| format!("Corrupt summary file {}", path.display()))?;
        Ok(Some(record))
    }

    pub fn save(&self, record: &SummaryRecord) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.root)
            .with_context(|| format!("Failed to create {}", self.root.display()))?;
        let path = self.path_for(&record.paper);
        std::fs::write(&path, serde_json::to_string_pretty(record)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}
