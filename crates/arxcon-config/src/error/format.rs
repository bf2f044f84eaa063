//! Colored error rendering for terminals

use crate::error::ConfigError;
use std::fmt;
use yansi::Paint;

pub struct ErrorFormatter {
    error: ConfigError,
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new(error: ConfigError) -> Self {
        Self {
            error,
            use_colors: supports_color(),
        }
    }

    pub fn plain(error: ConfigError) -> Self {
        Self {
            error,
            use_colors: false,
        }
    }

    pub fn format(&self) -> String {
        if self.use_colors {
            self.format_colored()
        } else {
            self.error.to_string()
        }
    }

    fn format_colored(&self) -> String {
        let cross = "✗".red().bold().to_string();
        match &self.error {
            ConfigError::InvalidEnum {
                field,
                value,
                options,
                hint,
            } => format!(
                "{} Invalid value {} for {}\n  {}: {}\n  {}: {}",
                cross,
                format!("'{}'", value).yellow(),
                field.cyan(),
                "Valid options".bold(),
                options,
                "Hint".bold(),
                hint.green()
            ),
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => format!(
                "{} {} must be between {} and {}, got {}",
                cross,
                field.cyan(),
                min.green(),
                max.green(),
                value.red()
            ),
            ConfigError::InvalidInteger { field, value, min } => format!(
                "{} {} must be > {}, got {}",
                cross,
                field.cyan(),
                min.green(),
                value.red()
            ),
            ConfigError::ValidationError { field, message } => {
                format!("{} {}: {}", cross, field.cyan(), message)
            }
            ConfigError::FileNotFound { path } => format!(
                "{} Configuration file not found: {}",
                cross,
                path.display().to_string().yellow()
            ),
            other => other.to_string(),
        }
    }
}

fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stderr)
}

impl fmt::Display for ErrorFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}
