use std::fmt;

use fragments_convert::ConvertError;
use fragments_store::StoreError;
use fragments_types::{MediaType, OwnerId, TypeError};
use thiserror::Error;

/// Failures reported by the fragment core.
///
/// Each variant is a distinct kind the caller can act on; none are retried
/// inside the core. Mapping kinds to transport status codes is the caller's
/// job.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// Malformed construction input or payload.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Media type outside the supported set.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// No metadata or data for the given owner and id.
    #[error("fragment not found: {id} (owner {owner})")]
    NotFound { owner: OwnerId, id: String },

    /// The requested extension is not a compatible target of the fragment.
    #[error("requested format .{extension} is not supported for {media_type}")]
    UnsupportedFormat {
        media_type: MediaType,
        extension: String,
    },

    /// The payload does not parse under its declared type, or cannot take
    /// the requested shape.
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// No transform exists from the source family to the target.
    #[error("unsupported conversion from {from} to .{extension}")]
    UnsupportedConversion { from: MediaType, extension: String },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// The kind of a [`FragmentError`], without its details.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    UnsupportedType,
    NotFound,
    UnsupportedFormat,
    Conversion,
    UnsupportedConversion,
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::UnsupportedType => "unsupported-type",
            Self::NotFound => "not-found",
            Self::UnsupportedFormat => "unsupported-format",
            Self::Conversion => "conversion",
            Self::UnsupportedConversion => "unsupported-conversion",
            Self::Storage => "storage",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FragmentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::UnsupportedType(_) => ErrorKind::UnsupportedType,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::Conversion(_) => ErrorKind::Conversion,
            Self::UnsupportedConversion { .. } => ErrorKind::UnsupportedConversion,
            Self::Store(_) => ErrorKind::Storage,
        }
    }

    pub(crate) fn not_found(owner: &OwnerId, id: impl fmt::Display) -> Self {
        Self::NotFound {
            owner: owner.clone(),
            id: id.to_string(),
        }
    }
}

impl From<ConvertError> for FragmentError {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::Unsupported { from, to } => Self::UnsupportedConversion {
                from,
                extension: to.to_string(),
            },
            other => Self::Conversion(other.to_string()),
        }
    }
}

impl From<TypeError> for FragmentError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::UnsupportedMediaType(media_type) => Self::UnsupportedType(media_type),
            other => Self::Validation(other.to_string()),
        }
    }
}

pub type FragmentResult<T> = Result<T, FragmentError>;
