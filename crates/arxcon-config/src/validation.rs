//! Validation trait and shared checks for configuration types

use crate::error::{ConfigError, Result};

/// Implemented by every config section; `Config::validate` fans out to each.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Value must lie within `[min, max]`
pub fn validate_range(field: impl Into<String>, value: f32, min: f32, max: f32) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Integer must be strictly greater than `min`
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

pub fn validate_url(field: impl Into<String>, url: &str) -> Result<()> {
    let field = field.into();
    if url.is_empty() {
        return Err(ConfigError::validation(
            field,
            "URL cannot be empty string (use null to unset)",
        ));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::validation(
            field,
            format!("must start with http:// or https://, got: {}", url),
        ));
    }
    Ok(())
}

pub fn validate_non_empty(field: impl Into<String>, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "cannot be empty"));
    }
    Ok(())
}
