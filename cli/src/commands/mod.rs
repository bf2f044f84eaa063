pub mod chat;
pub mod papers;
pub mod ui;
pub mod utils;

pub use chat::handle_chat;
pub use papers::handle_papers;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arxcon")]
#[command(about = "consult an LLM agent about a fresh set of arXiv papers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch papers for a topic and chat about them
    Chat {
        /// arXiv search term; prompted for when missing
        #[arg(short, long)]
        query: Option<String>,

        /// Number of papers to fetch (defaults to core.max_results)
        #[arg(long)]
        max_papers: Option<usize>,

        /// Delete downloaded PDFs once the agents are built
        #[arg(long, default_value_t = false)]
        no_persist: bool,

        /// Show verbose output (thoughts, tool calls, observations)
        #[arg(long, default_value_t = false)]
        verbose: bool,
    },
    /// Search arXiv without building agents
    Papers {
        /// The search term
        query: String,

        /// Number of results (defaults to core.max_results)
        #[arg(long)]
        max_papers: Option<usize>,
    },
    /// Launch the terminal UI
    Tui,
}
