use fragments_types::{FragmentId, OwnerId};

/// Errors from fragment store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record was written under a key that does not match its own fields.
    #[error("record for {record_owner}/{record_id} written under key {owner}/{id}")]
    KeyMismatch {
        owner: OwnerId,
        id: FragmentId,
        record_owner: OwnerId,
        record_id: FragmentId,
    },

    /// A lock guarding the backend was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// Failure reported by the underlying backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
