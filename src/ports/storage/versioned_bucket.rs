use crate::domain::{
    errors::StorageResult, models::ObjectAttributes, value_objects::BucketName,
};
use async_trait::async_trait;

/// Port for a version-enabled bucket.
/// This abstracts the actual storage backend (GCS JSON API, in-memory, ...).
#[async_trait]
pub trait VersionedBucket: Send + Sync {
    /// List every version of every object, including soft-deleted and
    /// archived ones. Adapters handle pagination internally; a transport or
    /// backend failure fails the whole listing.
    async fn list_versions(&self) -> StorageResult<Vec<ObjectAttributes>>;

    /// List only live objects, each at its latest generation.
    async fn list_live(&self) -> StorageResult<Vec<ObjectAttributes>>;

    /// Make the given prior generation of an object the current live version.
    async fn restore_generation(&self, name: &str, generation: i64) -> StorageResult<()>;

    /// Re-apply the metadata fields of `attrs` to the live version of the
    /// named object, for backends where restore does not carry metadata
    /// atomically.
    async fn update_metadata(&self, name: &str, attrs: &ObjectAttributes) -> StorageResult<()>;

    /// Remove the named object from the bucket (soft delete when versioning
    /// is enabled).
    async fn delete_object(&self, name: &str) -> StorageResult<()>;
}

/// Port for bucket provisioning.
#[async_trait]
pub trait BucketProvisioner: Send + Sync {
    /// Create a bucket with versioning enabled and an age-based deletion
    /// lifecycle rule on noncurrent versions.
    async fn create_bucket(
        &self,
        project: &str,
        bucket: &BucketName,
        retention_days: u32,
    ) -> StorageResult<()>;
}
