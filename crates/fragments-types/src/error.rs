use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("malformed media type {value:?}: {reason}")]
    MalformedMediaType { value: String, reason: String },

    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("unknown extension: {0:?}")]
    UnknownExtension(String),

    #[error("invalid identifier {value:?}: {reason}")]
    InvalidId { value: String, reason: &'static str },
}
