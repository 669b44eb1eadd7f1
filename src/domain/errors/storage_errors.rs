use thiserror::Error;

/// Errors that can occur while talking to the storage backend.
///
/// A failed listing is never reported as an empty result: callers must be
/// able to tell "empty bucket" apart from "listing failed".
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("listing object versions failed: {0}")]
    ListingFailed(String),

    #[error("object not found: {name}")]
    ObjectNotFound { name: String },

    #[error("generation {generation} not found for object: {name}")]
    GenerationNotFound { name: String, generation: i64 },

    #[error("backend error: {status} - {message}")]
    BackendError { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid object attributes: {0}")]
    InvalidAttributes(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors from bucket name validation
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BucketNameError {
    #[error("bucket name must be between {min} and {max} characters, got {actual}")]
    InvalidLength {
        actual: usize,
        min: usize,
        max: usize,
    },

    #[error("bucket name must start and end with a lowercase letter or digit")]
    InvalidBoundary,

    #[error("bucket name contains invalid character: {0:?}")]
    InvalidCharacter(char),
}
