mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{handle_chat, handle_papers, Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const VERBOSE_FILTER: &str =
    "warn,arxcon_agent=info,arxcon_arxiv=info,arxcon_core=info,arxcon_index=info";

fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            VERBOSE_FILTER.into()
        } else {
            "warn".into()
        }
    });
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Chat {
            query,
            max_papers,
            no_persist,
            verbose,
        } => {
            init_tracing(verbose);
            handle_chat(query, max_papers, no_persist, verbose, config_path).await?;
        }
        Commands::Papers { query, max_papers } => {
            init_tracing(false);
            handle_papers(&query, max_papers, config_path).await?;
        }
        Commands::Tui => {
            // The TUI owns the terminal; only log when explicitly asked to.
            if std::env::var_os("RUST_LOG").is_some() {
                init_tracing(false);
            }
            tui::run_tui(config_path).await?;
        }
    }

    Ok(())
}
