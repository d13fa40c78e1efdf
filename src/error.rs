use crate::records::RecordId;
use crate::ui::FormErrors;
use thiserror::Error;

/// Errors raised by collection operations and configuration loading
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("Unknown module '{name}'. Available modules: {available}")]
    UnknownModule { name: String, available: String },

    #[error("{module} record #{id} not found")]
    NotFound { module: String, id: RecordId },

    #[error("Validation failed: {0}")]
    Validation(#[from] FormErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not decode {module} response: {message}")]
    Decode { module: String, message: String },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned HTTP {status}: {body}")]
    Status {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type ConsoleResult<T> = std::result::Result<T, ConsoleError>;
