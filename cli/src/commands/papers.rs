use anyhow::Result;
use arxcon_arxiv::{ArxivClient, PaperSource};
use console::Style;
use std::path::Path;

use super::ui;
use super::utils::load_config;

pub async fn handle_papers(
    query: &str,
    max_papers: Option<usize>,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let max_results = max_papers.unwrap_or(config.core.max_results);
    let client = ArxivClient::new(&config.arxiv)?;

    let papers = client.search(query, max_results).await?;
    if papers.is_empty() {
        ui::print_warning(&format!("No papers found for '{}'", query));
        return Ok(());
    }

    ui::print_header(&format!("{} papers for '{}'", papers.len(), query));
    for (i, paper) in papers.iter().enumerate() {
        println!(
            "{}",
            Style::new()
                .bold()
                .blue()
                .apply_to(format!("#{} {}", i + 1, paper.title))
        );
        let metadata = paper.metadata();
        ui::print_key_value("Authors", &metadata.authors);
        ui::print_key_value("Date published", &metadata.published);
        ui::print_key_value("URL", &metadata.url);
        println!();
    }
    Ok(())
}
