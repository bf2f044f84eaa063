//! Fetching papers and building one agent per paper

use crate::paper_agent::{BuiltPaperAgent, PaperAgent, PaperAgentBuilder};
use crate::tool::{QueryEngineTool, Tool, ToolMetadata};
use anyhow::{Context, Result};
use arxcon_arxiv::download::remove_downloads;
use arxcon_arxiv::{ArxivError, ArxivPaper, PaperSource};
use arxcon_core::chunking::SentenceSplitter;
use arxcon_core::loader::DocumentLoader;
use arxcon_core::{Node, PaperMetadata};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Progress reported while building
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    Fetched { count: usize },
    Downloading { file_name: String },
    Building { index: usize, total: usize, paper: String },
    DeletedFile { file_name: String },
    DeletedDir { path: PathBuf },
    Warning(String),
}

impl std::fmt::Display for BuildEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildEvent::Fetched { count } => write!(f, "> Successfully fetched {} papers", count),
            BuildEvent::Downloading { file_name } => write!(f, "> Downloading {}...", file_name),
            BuildEvent::Building { index, total, paper } => {
                write!(f, "> Building agent {}/{} for {}", index + 1, total, paper)
            }
            BuildEvent::DeletedFile { file_name } => write!(f, "> Deleted file: {}", file_name),
            BuildEvent::DeletedDir { path } => {
                write!(f, "> Deleted directory: {}", path.display())
            }
            BuildEvent::Warning(msg) => write!(f, "{}", msg),
        }
    }
}

/// Everything built for one paper
pub struct PaperEntry {
    pub file_name: String,
    pub paper_name: String,
    pub metadata: PaperMetadata,
    pub summary: String,
    pub nodes: Vec<Node>,
    pub agent: Arc<PaperAgent>,
    /// `tool_<paper>`, described by the summary, wrapping `agent`
    pub tool: Arc<QueryEngineTool>,
}

/// The papers behind one consultant session, in search order
#[derive(Default, Clone)]
pub struct PaperLibrary {
    entries: Vec<Arc<PaperEntry>>,
}

impl PaperLibrary {
    pub fn new(entries: Vec<Arc<PaperEntry>>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Arc<PaperEntry>] {
        &self.entries
    }

    pub fn get(&self, paper_name: &str) -> Option<&Arc<PaperEntry>> {
        self.entries.iter().find(|e| e.paper_name == paper_name)
    }

    pub fn titles(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.metadata.title.clone()).collect()
    }

    /// One tool per paper, in library order
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.entries
            .iter()
            .map(|e| e.tool.clone() as Arc<dyn Tool>)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct ArxivBuilder {
    search_query: String,
    persist: bool,
    papers_dir: PathBuf,
    max_results: usize,
    source: Arc<dyn PaperSource>,
    loader: Arc<dyn DocumentLoader>,
    agent_builder: PaperAgentBuilder,
    splitter: SentenceSplitter,
}

impl ArxivBuilder {
    pub fn new(
        search_query: impl Into<String>,
        source: Arc<dyn PaperSource>,
        loader: Arc<dyn DocumentLoader>,
        agent_builder: PaperAgentBuilder,
        splitter: SentenceSplitter,
    ) -> Self {
        Self {
            search_query: search_query.into(),
            persist: false,
            papers_dir: PathBuf::from(".papers"),
            max_results: 10,
            source,
            loader,
            agent_builder,
            splitter,
        }
    }

    /// Keep downloaded PDFs after building
    pub fn with_persist(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    pub fn with_papers_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.papers_dir = dir.into();
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Search, download, build an agent per paper, and clean up unless persisting
    pub async fn download_papers_and_build_agents(
        &self,
        on_event: &(dyn Fn(BuildEvent) + Send + Sync),
    ) -> Result<PaperLibrary> {
        let papers = self
            .source
            .search(&self.search_query, self.max_results)
            .await?;
        if papers.is_empty() {
            return Err(ArxivError::NoResults {
                query: self.search_query.clone(),
            }
            .into());
        }
        info!(
            "fetched {} papers from {} for '{}'",
            papers.len(),
            self.source.name(),
            self.search_query
        );
        on_event(BuildEvent::Fetched {
            count: papers.len(),
        });

        std::fs::create_dir_all(&self.papers_dir).with_context(|| {
            format!("Failed to create papers dir {}", self.papers_dir.display())
        })?;

        let mut downloaded = Vec::with_capacity(papers.len());
        for paper in &papers {
            let file_name = paper.file_name();
            on_event(BuildEvent::Downloading {
                file_name: file_name.clone(),
            });
            let path = self
                .source
                .download_pdf(paper, &self.papers_dir, &file_name)
                .await?;
            downloaded.push((paper, file_name, path));
        }

        let total = downloaded.len();
        let mut entries = Vec::with_capacity(total);
        let mut result = Ok(());
        for (index, (paper, file_name, path)) in downloaded.iter().enumerate() {
            on_event(BuildEvent::Building {
                index,
                total,
                paper: paper.paper_name(),
            });
            match self.build_entry(paper, file_name, path).await {
                Ok(entry) => entries.push(Arc::new(entry)),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }

        if !self.persist {
            let files: Vec<PathBuf> = downloaded.iter().map(|(_, _, p)| p.clone()).collect();
            self.cleanup(&files, on_event);
        }

        result?;
        Ok(PaperLibrary::new(entries))
    }

    /// Alias of [`Self::download_papers_and_build_agents`]
    pub async fn run(
        &self,
        on_event: &(dyn Fn(BuildEvent) + Send + Sync),
    ) -> Result<PaperLibrary> {
        self.download_papers_and_build_agents(on_event).await
    }

    async fn build_entry(
        &self,
        paper: &ArxivPaper,
        file_name: &str,
        path: &Path,
    ) -> Result<PaperEntry> {
        let paper_name = paper.paper_name();
        let metadata = paper.metadata();

        // A persisted index already holds the nodes.
        let nodes = if self.agent_builder.has_index(&paper_name) {
            debug!("reusing stored index for {}", paper_name);
            Vec::new()
        } else {
            self.parse_paper(path, metadata.clone()).await?
        };

        let BuiltPaperAgent {
            agent,
            summary,
            nodes,
        } = self
            .agent_builder
            .build_agent_per_doc(nodes, &paper_name)
            .await
            .with_context(|| format!("Failed to build agent for {}", paper_name))?;

        let tool = Arc::new(QueryEngineTool::new(
            agent.clone(),
            ToolMetadata::new(format!("tool_{}", paper_name), summary.clone()),
        ));

        Ok(PaperEntry {
            file_name: file_name.to_string(),
            paper_name,
            metadata,
            summary,
            nodes,
            agent,
            tool,
        })
    }

    /// Load and split one paper on the blocking pool
    async fn parse_paper(&self, path: &Path, metadata: PaperMetadata) -> Result<Vec<Node>> {
        let loader = self.loader.clone();
        let splitter = self.splitter.clone();
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            let document = loader.load(&path, metadata)?;
            splitter.nodes_from_document(&document)
        })
        .await
        .context("paper parsing task failed")?
    }

    fn cleanup(&self, files: &[PathBuf], on_event: &(dyn Fn(BuildEvent) + Send + Sync)) {
        let failed = remove_downloads(&self.papers_dir, files);
        for file in files.iter().filter(|f| !failed.contains(f)) {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            on_event(BuildEvent::DeletedFile { file_name });
        }
        if failed.is_empty() {
            on_event(BuildEvent::DeletedDir {
                path: self.papers_dir.clone(),
            });
        } else {
            warn!("{} downloads could not be removed", failed.len());
            on_event(BuildEvent::Warning(
                "Unable to delete files or directory".to_string(),
            ));
        }
    }
}
