mod versioned_bucket;

pub use versioned_bucket::{BucketProvisioner, VersionedBucket};
