use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArxivError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("arXiv returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body was not a readable Atom feed
    #[error("Failed to parse arXiv feed: {0}")]
    Feed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No papers found for query '{query}'")]
    NoResults { query: String },

    #[error("Invalid arXiv entry: {0}")]
    InvalidEntry(String),
}

pub type Result<T> = std::result::Result<T, ArxivError>;
