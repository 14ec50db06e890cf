use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ExtractError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("response from {url} is not valid JSON: {message}")]
    Decode { url: String, message: String },

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("identifier cannot be used as a file name: {0:?}")]
    #[diagnostic(help("identifiers must be non-empty and must not contain '/', '\\' or '..'"))]
    InvalidIdentifier(String),

    #[error("invalid base URL: {0}")]
    #[diagnostic(help("expected an absolute http(s) URL such as http://localhost:8000/api"))]
    InvalidBaseUrl(String),
}

impl ExtractError {
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ExtractError::ConfigRead(_)
                | ExtractError::ConfigParse(_)
                | ExtractError::InvalidBaseUrl(_)
                | ExtractError::InvalidIdentifier(_)
        )
    }
}
