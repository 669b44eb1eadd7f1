use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::ObjectAttributes,
        value_objects::BucketName,
    },
    ports::storage::{BucketProvisioner, VersionedBucket},
};

/// In-memory implementation of the bucket ports for testing and development.
///
/// Keeps a flat version log in listing order, mimicking a version-enabled
/// bucket: a write supersedes the previous live version of the same name by
/// stamping its deletion time, and a delete only stamps the deletion time.
#[derive(Clone, Default)]
pub struct InMemoryBucket {
    data: Arc<RwLock<BucketData>>,
}

#[derive(Default)]
struct BucketData {
    versions: Vec<ObjectAttributes>,
    next_generation: i64,
    // Buckets "created" through the provisioner port: name -> (project, retention days)
    buckets: HashMap<String, (String, u32)>,
    fail_listings: bool,
}

impl InMemoryBucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a version: the previous live version of the same name, if any,
    /// is marked deleted at the new version's update time. The generation is
    /// assigned by the store.
    pub async fn put(&self, mut attrs: ObjectAttributes) -> ObjectAttributes {
        let mut data = self.data.write().await;
        data.next_generation += 1;
        attrs.generation = data.next_generation;
        attrs.deleted = None;
        let superseded_at = attrs.updated;
        if let Some(live) = data
            .versions
            .iter_mut()
            .find(|v| v.name == attrs.name && v.is_live())
        {
            live.deleted = Some(superseded_at);
        }
        data.versions.push(attrs.clone());
        attrs
    }

    /// Stamp the live version of `name` deleted at a chosen instant, for
    /// building deterministic timelines. The port's `delete_object` uses the
    /// wall clock instead.
    pub async fn delete_object_at(&self, name: &str, at: chrono::DateTime<Utc>) {
        let mut data = self.data.write().await;
        if let Some(live) = data
            .versions
            .iter_mut()
            .find(|v| v.name == name && v.is_live())
        {
            live.deleted = Some(at);
        }
    }

    /// Make every subsequent listing fail, for exercising error propagation.
    pub async fn fail_listings(&self, fail: bool) {
        self.data.write().await.fail_listings = fail;
    }

    pub async fn created_buckets(&self) -> HashMap<String, (String, u32)> {
        self.data.read().await.buckets.clone()
    }
}

#[async_trait]
impl VersionedBucket for InMemoryBucket {
    async fn list_versions(&self) -> StorageResult<Vec<ObjectAttributes>> {
        let data = self.data.read().await;
        if data.fail_listings {
            return Err(StorageError::ListingFailed("injected failure".to_string()));
        }
        Ok(data.versions.clone())
    }

    async fn list_live(&self) -> StorageResult<Vec<ObjectAttributes>> {
        let data = self.data.read().await;
        if data.fail_listings {
            return Err(StorageError::ListingFailed("injected failure".to_string()));
        }
        Ok(data
            .versions
            .iter()
            .filter(|v| v.is_live())
            .cloned()
            .collect())
    }

    async fn restore_generation(&self, name: &str, generation: i64) -> StorageResult<()> {
        let mut data = self.data.write().await;
        let restored = data
            .versions
            .iter()
            .find(|v| v.name == name && v.generation == generation)
            .cloned()
            .ok_or(StorageError::GenerationNotFound {
                name: name.to_string(),
                generation,
            })?;

        let now = Utc::now();
        if let Some(live) = data
            .versions
            .iter_mut()
            .find(|v| v.name == name && v.is_live())
        {
            live.deleted = Some(now);
        }
        data.next_generation += 1;
        let generation = data.next_generation;
        data.versions.push(ObjectAttributes {
            generation,
            updated: now,
            deleted: None,
            ..restored
        });
        Ok(())
    }

    async fn update_metadata(&self, name: &str, attrs: &ObjectAttributes) -> StorageResult<()> {
        let mut data = self.data.write().await;
        let live = data
            .versions
            .iter_mut()
            .find(|v| v.name == name && v.is_live())
            .ok_or_else(|| StorageError::ObjectNotFound {
                name: name.to_string(),
            })?;
        live.metadata = attrs.metadata.clone();
        live.content_type = attrs.content_type.clone();
        live.content_language = attrs.content_language.clone();
        live.cache_control = attrs.cache_control.clone();
        live.content_encoding = attrs.content_encoding.clone();
        live.custom_time = attrs.custom_time;
        live.acl = attrs.acl.clone();
        live.owner = attrs.owner.clone();
        live.customer_key_sha256 = attrs.customer_key_sha256.clone();
        live.kms_key_name = attrs.kms_key_name.clone();
        Ok(())
    }

    async fn delete_object(&self, name: &str) -> StorageResult<()> {
        let mut data = self.data.write().await;
        let live = data
            .versions
            .iter_mut()
            .find(|v| v.name == name && v.is_live())
            .ok_or_else(|| StorageError::ObjectNotFound {
                name: name.to_string(),
            })?;
        live.deleted = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl BucketProvisioner for InMemoryBucket {
    async fn create_bucket(
        &self,
        project: &str,
        bucket: &BucketName,
        retention_days: u32,
    ) -> StorageResult<()> {
        let mut data = self.data.write().await;
        data.buckets.insert(
            bucket.as_str().to_string(),
            (project.to_string(), retention_days),
        );
        Ok(())
    }
}
