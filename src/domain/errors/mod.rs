mod storage_errors;
mod time_errors;

pub use storage_errors::{BucketNameError, StorageError, StorageResult};
pub use time_errors::TimeParseError;
