use fragments_types::{Extension, MediaType};
use thiserror::Error;

/// Errors from the conversion engine.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// No transform is defined from the source family to the target.
    #[error("unsupported conversion from {from} to .{to}")]
    Unsupported { from: MediaType, to: Extension },

    /// The source bytes do not parse under their declared type.
    #[error("malformed {media_type} payload: {reason}")]
    Malformed { media_type: MediaType, reason: String },

    /// JSON that is not an array of uniform records cannot become CSV.
    #[error("cannot convert to CSV: {0}")]
    NotTabular(String),

    /// The image codec failed to decode or encode.
    #[error("image codec error ({media_type}): {reason}")]
    Image { media_type: MediaType, reason: String },
}

impl ConvertError {
    pub fn malformed(media_type: MediaType, reason: impl ToString) -> Self {
        Self::Malformed {
            media_type,
            reason: reason.to_string(),
        }
    }

    /// True when the failure is a missing transform rather than bad input.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// Result alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;
