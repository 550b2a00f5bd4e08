use crate::utils::error::{HarvestError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn invalid_value(field_name: &str, value: impl ToString, reason: &str) -> HarvestError {
    HarvestError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(HarvestError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid_value(
            field_name,
            value,
            &format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

/// File prefixes end up in file names, so path separators are refused.
pub fn validate_file_identifier(field_name: &str, value: &str) -> Result<()> {
    if value.contains(['/', '\\', '\0']) {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must not contain path separators".to_string(),
        });
    }
    Ok(())
}

pub fn validate_ror(field_name: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    if value.contains(char::is_whitespace) {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "ROR must not contain whitespace".to_string(),
        });
    }
    if value.contains("://") && !value.starts_with(crate::config::ROR_PREFIX) {
        return Err(HarvestError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("ROR URLs must start with {}", crate::config::ROR_PREFIX),
        });
    }
    Ok(())
}
