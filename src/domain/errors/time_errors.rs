use thiserror::Error;

/// Errors from parsing a user-supplied timestamp string.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("no matching time format found for {0:?}")]
    NoMatchingFormat(String),
}
