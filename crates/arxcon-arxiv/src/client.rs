use crate::download::download_to;
use crate::error::{ArxivError, Result};
use crate::models::ArxivPaper;
use arxcon_config::{ArxivConfig, SortBy};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Where papers are searched for and downloaded from
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Papers matching `query`, in the source's ranking order
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<ArxivPaper>>;

    /// Save the paper's PDF as `dir/file_name`, creating `dir` if needed
    async fn download_pdf(&self, paper: &ArxivPaper, dir: &Path, file_name: &str)
        -> Result<PathBuf>;

    fn name(&self) -> &str;
}

pub struct ArxivClient {
    client: reqwest::Client,
    api_base: String,
    sort_by: SortBy,
}

impl ArxivClient {
    pub fn new(config: &ArxivConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.clone(),
            sort_by: config.sort_by,
        })
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<ArxivPaper>> {
        let max_results = max_results.to_string();
        let resp = self
            .client
            .get(&self.api_base)
            .query(&[
                ("search_query", query),
                ("id_list", ""),
                ("start", "0"),
                ("max_results", max_results.as_str()),
                ("sortBy", self.sort_by.as_query_value()),
                ("sortOrder", "descending"),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ArxivError::Status {
                status: resp.status().as_u16(),
                url: resp.url().to_string(),
            });
        }

        let body = resp.bytes().await?;
        let papers = parse_feed(&body)?;
        debug!("arXiv returned {} entries for '{}'", papers.len(), query);
        Ok(papers)
    }

    async fn download_pdf(
        &self,
        paper: &ArxivPaper,
        dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf> {
        download_to(&self.client, &paper.pdf_url, dir, file_name).await
    }

    fn name(&self) -> &str {
        "arxiv"
    }
}

/// Parse an arXiv Atom response into papers
///
/// Entries without a title or usable id are skipped, as are the error
/// entries arXiv returns for malformed queries.
pub fn parse_feed(body: &[u8]) -> Result<Vec<ArxivPaper>> {
    let feed = feed_rs::parser::parse(body).map_err(|e| ArxivError::Feed(e.to_string()))?;

    let mut papers = Vec::with_capacity(feed.entries.len());
    for entry in feed.entries {
        match paper_from_entry(entry) {
            Ok(paper) => papers.push(paper),
            Err(e) => warn!("skipping arXiv entry: {}", e),
        }
    }
    Ok(papers)
}

fn paper_from_entry(entry: feed_rs::model::Entry) -> Result<ArxivPaper> {
    let entry_id = entry.id.trim().to_string();
    if entry_id.is_empty() || !entry_id.starts_with("http") {
        return Err(ArxivError::InvalidEntry(format!(
            "missing id (got '{}')",
            entry_id
        )));
    }
    if entry_id.contains("/api/errors") {
        let detail = entry
            .summary
            .map(|s| s.content)
            .unwrap_or_else(|| entry_id.clone());
        return Err(ArxivError::InvalidEntry(format!("API error: {}", detail)));
    }

    let title = entry
        .title
        .map(|t| normalize_whitespace(&t.content))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ArxivError::InvalidEntry(format!("{} has no title", entry_id)))?;

    let published = entry
        .published
        .or(entry.updated)
        .ok_or_else(|| ArxivError::InvalidEntry(format!("{} has no date", entry_id)))?;

    let pdf_url = entry
        .links
        .iter()
        .find(|l| {
            l.title.as_deref() == Some("pdf")
                || l.media_type.as_deref() == Some("application/pdf")
        })
        .map(|l| l.href.clone())
        .unwrap_or_else(|| entry_id.replacen("/abs/", "/pdf/", 1));

    Ok(ArxivPaper {
        title,
        authors: entry
            .authors
            .into_iter()
            .map(|p| normalize_whitespace(&p.name))
            .collect(),
        published,
        summary: entry
            .summary
            .map(|s| normalize_whitespace(&s.content))
            .unwrap_or_default(),
        pdf_url,
        entry_id,
    })
}

fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
