use thiserror::Error;

use crate::model::Field;

/// Errors that can occur during recipe import operations
#[derive(Error, Debug)]
pub enum ImportError {
    /// HTTP transport failure talking to Grocy
    #[error("Failed to reach Grocy: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Grocy answered with a non-success status
    #[error("Grocy API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// Grocy answered with a body we could not interpret
    #[error("Unexpected Grocy response: {0}")]
    UnexpectedResponse(String),

    /// Recipe document could not be decoded
    #[error("Failed to parse recipe document: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Recipe document decoded but is unusable
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),

    /// A field of an ingredient line could not be determined without asking the user
    #[error("Could not resolve {field} for ingredient \"{line}\"")]
    Unresolved { field: Field, line: String },

    /// Interactive input was closed or unreadable
    #[error("Prompt failed: {0}")]
    Prompt(String),

    /// Reading the recipe file or the terminal failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing HTTP headers
    #[error("Header parse error: {0}")]
    HeaderError(#[from] reqwest::header::InvalidHeaderValue),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
