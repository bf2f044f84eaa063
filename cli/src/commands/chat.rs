use anyhow::Result;
use arxcon_agent::{AgentStep, BuildEvent, Consultant, ConsultantContext};
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use super::ui;
use super::utils::{load_config, read_line, render_markdown_answer};

pub async fn handle_chat(
    query: Option<String>,
    max_papers: Option<usize>,
    no_persist: bool,
    verbose: bool,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    config.agent.verbose |= verbose;
    let max_papers = max_papers.unwrap_or(config.core.max_results);
    let persist = config.core.persist_papers && !no_persist;

    let query = match query {
        Some(q) => q,
        None => match read_line("Provide the arxiv search term: ")? {
            Some(q) => q,
            None => return Ok(()),
        },
    };

    println!("\nPlease wait, this might take a few minutes");
    ui::print_rule('-');

    let ctx = ConsultantContext::from_config(config)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Searching arXiv for '{}'...", query));
    pb.enable_steady_tick(Duration::from_millis(100));

    let bar = pb.clone();
    let on_event = move |event: BuildEvent| match &event {
        BuildEvent::Fetched { count } => {
            bar.println(event.to_string());
            bar.set_length(*count as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("=>-"),
            );
            bar.set_message("Downloading papers");
        }
        BuildEvent::Building { index, paper, .. } => {
            bar.set_position(*index as u64);
            bar.set_message(format!("Building agent for {}", paper));
        }
        BuildEvent::Warning(msg) => bar.suspend(|| ui::print_warning(msg)),
        _ => bar.println(event.to_string()),
    };

    let consultant = match Consultant::build(&ctx, &query, max_papers, persist, &on_event).await {
        Ok(consultant) => {
            pb.finish_and_clear();
            consultant
        }
        Err(e) => {
            pb.finish_and_clear();
            println!("> Not able to download any paper: {:#}", e);
            println!("> Retry using a different search term.");
            println!("> Exit...");
            ui::print_rule('-');
            return Ok(());
        }
    };

    let consultant = if verbose {
        consultant.with_observer(Arc::new(|step: &AgentStep| ui::print_step(&step.to_string())))
    } else {
        consultant
    };

    ui::print_rule('-');
    println!("Papers I have knowledge on");
    for title in consultant.papers() {
        println!("> {}", title);
    }
    ui::print_rule('-');
    println!("> Type 'exit' to close the chat <");
    ui::print_rule('-');

    let agent_label = Style::new().bold().green().apply_to("Agent:");
    loop {
        ui::print_rule('*');
        let Some(input) = read_line("User: ")? else {
            break;
        };
        let input = input.trim();
        if input == "exit" {
            break;
        }
        if input.is_empty() {
            continue;
        }

        match consultant.chat(input).await {
            Ok(answer) => {
                ui::print_rule('*');
                println!("{} {}", agent_label, render_markdown_answer(&answer));
            }
            Err(e) => {
                ui::print_error(&format!("{:#}", e));
                println!("Something went wrong answering that, please try again.");
            }
        }
    }

    Ok(())
}
