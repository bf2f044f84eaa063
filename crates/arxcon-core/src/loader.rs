//! Turning downloaded papers into [`Document`]s

use crate::models::{Document, PaperMetadata};
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tracing::{debug, warn};

pub trait DocumentLoader: Send + Sync {
    fn load(&self, path: &Path, metadata: PaperMetadata) -> Result<Document>;
}

/// Extracts page text with `lopdf`
#[derive(Debug, Default, Clone)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn extract_text(path: &Path) -> Result<String> {
        let doc = lopdf::Document::load(path)
            .with_context(|| format!("Failed to load PDF {}", path.display()))?;

        let pages = doc.get_pages();
        debug!(page_count = pages.len(), "Extracting text from PDF");

        let mut text = String::new();
        for page_num in pages.keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => {
                    warn!(page = page_num, error = %e, "Failed to extract text from page, skipping");
                }
            }
        }

        let cleaned = clean_text(&text);
        if cleaned.is_empty() {
            return Err(anyhow!(
                "No text content extracted from PDF {}",
                path.display()
            ));
        }
        Ok(cleaned)
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path, metadata: PaperMetadata) -> Result<Document> {
        let text = Self::extract_text(path)?;
        Ok(Document {
            file_name: file_name_of(path),
            text,
            metadata,
        })
    }
}

/// Reads the file as UTF-8 text. Used for plain-text corpora and tests.
#[derive(Debug, Default, Clone)]
pub struct TextLoader;

impl DocumentLoader for TextLoader {
    fn load(&self, path: &Path, metadata: PaperMetadata) -> Result<Document> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Document {
            file_name: file_name_of(path),
            text: clean_text(&raw),
            metadata,
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Collapse whitespace runs and drop byte-order marks
pub fn clean_text(text: &str) -> String {
    text.replace('\u{FEFF}', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
