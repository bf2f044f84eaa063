use anyhow::{anyhow, Result};
use arxcon_config::{Config, ErrorFormatter};
use std::io::{BufRead, Write};
use std::path::Path;
use termimad::{FmtText, MadSkin};

/// Load config, rendering config errors with [`ErrorFormatter`]
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let loaded = match config_path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    loaded.map_err(|e| anyhow!("invalid configuration\n{}", ErrorFormatter::new(e)))
}

pub fn render_markdown_answer(text: &str) -> String {
    let skin = MadSkin::default();
    let (w, _) = termimad::terminal_size();
    let width = std::cmp::max(20, w.saturating_sub(4) as usize);
    FmtText::from(&skin, text, Some(width)).to_string()
}

/// Print `prompt` and read one line; `None` at end of input
pub fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    std::io::stdout().flush()?;
    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_is_described() {
        let err = load_config(Some(Path::new("/nonexistent/.arxcon.toml"))).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("invalid configuration"));
        assert!(msg.contains("Configuration file not found"));
    }

    #[test]
    fn validation_errors_name_the_field() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".arxcon.toml");
        std::fs::write(&path, "[chunking]\nchunk_size = 100\nchunk_overlap = 150\n").unwrap();
        let msg = load_config(Some(&path)).unwrap_err().to_string();
        assert!(msg.contains("chunking.chunk_overlap"), "{}", msg);
    }
}
