//! Error type shared by the tokenizer, page surface and CLI.
use thiserror::Error;

/// Main error type for conversion operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Markup could not be tokenized past the given byte offset
    #[error("XML error at position {position}: {message}")]
    Xml { position: u64, message: String },

    /// Malformed page payload
    #[error("JSON error: {0}")]
    Json(String),

    /// The fetch collaborator reported a failure
    #[error("Page fetch failed: {0}")]
    PageFetch(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build an [`Error::Xml`] from a reader error and the offset it was raised at.
    pub fn xml(position: u64, err: impl std::fmt::Display) -> Self {
        Error::Xml {
            position,
            message: err.to_string(),
        }
    }
}
