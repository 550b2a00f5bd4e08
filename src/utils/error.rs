use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    /// Network failure, timeout, 429 or 5xx. Worth retrying later.
    #[error("Transient fetch failure for {url}: {message}")]
    TransientFetch { url: String, message: String },

    /// The repository rejected the query (4xx other than 429).
    #[error("Query rejected by {url} with status {status}: {message}")]
    FatalQuery {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from {url}: {message}")]
    ResponseError { url: String, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl HarvestError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, HarvestError::TransientFetch { .. })
    }

    /// Classify a reqwest transport error. Status errors are classified by
    /// the caller through [`HarvestError::from_status`].
    pub fn from_transport(url: &str, err: &reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_status(url, status, err.to_string());
        }
        if err.is_decode() {
            return HarvestError::ResponseError {
                url: url.to_string(),
                message: err.to_string(),
            };
        }
        HarvestError::TransientFetch {
            url: url.to_string(),
            message: err.to_string(),
        }
    }

    pub fn from_status(url: &str, status: reqwest::StatusCode, message: String) -> Self {
        if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            HarvestError::TransientFetch {
                url: url.to_string(),
                message: format!("status {}: {}", status.as_u16(), message),
            }
        } else {
            HarvestError::FatalQuery {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HarvestError::TransientFetch { url, .. } => {
                format!("Could not reach {} (network or server problem)", url)
            }
            HarvestError::FatalQuery { status, .. } => {
                format!("The repository refused the query (HTTP {})", status)
            }
            HarvestError::ConfigError { message } => format!("Configuration problem: {}", message),
            HarvestError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting `{}`: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HarvestError::TransientFetch { .. } => "Check connectivity and run again later",
            HarvestError::FatalQuery { status: 401, .. }
            | HarvestError::FatalQuery { status: 403, .. } => {
                "Check that the access token is valid and not expired"
            }
            HarvestError::FatalQuery { .. } => "Check the search parameters for this repository",
            HarvestError::ConfigError { .. } | HarvestError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and run again"
            }
            HarvestError::IoError(_) | HarvestError::CsvError(_) => {
                "Check that the output directory is writable"
            }
            _ => "Run with --verbose for details",
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
