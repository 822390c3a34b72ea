use crate::utils::error::{Result, SubenumError};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static DOMAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9-]+\.)+[a-zA-Z]{2,}$").expect("domain pattern is valid")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Accepts either a bare domain or a URL and returns the host part.
pub fn normalize_target(input: &str) -> String {
    let input = input.trim();
    match Url::parse(input) {
        Ok(url) => url
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| input.to_string()),
        Err(_) => input.to_string(),
    }
}

pub fn validate_domain(domain: &str) -> Result<()> {
    if DOMAIN_PATTERN.is_match(domain) {
        Ok(())
    } else {
        Err(SubenumError::InvalidDomain {
            domain: domain.to_string(),
        })
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SubenumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SubenumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(SubenumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SubenumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Output files must be plain names inside the working directory.
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    validate_non_empty_string(field_name, name)?;
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(SubenumError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "Must be a file name without directory components".to_string(),
        });
    }
    Ok(())
}
