//! Google Cloud Storage adapter over the JSON API v1.
//!
//! Credential handling is out of scope: the adapter takes a ready bearer
//! token. Every listing is paginated internally; any page failing fails the
//! whole listing.

use async_trait::async_trait;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        models::{AclRule, ObjectAttributes},
        value_objects::BucketName,
    },
    ports::storage::{BucketProvisioner, VersionedBucket},
};

const DEFAULT_ENDPOINT: &str = "https://storage.googleapis.com/storage/v1";

/// Client for one version-enabled GCS bucket.
#[derive(Clone)]
pub struct GcsBucket {
    http: Client,
    endpoint: String,
    bucket: BucketName,
    token: String,
}

impl GcsBucket {
    pub fn new(bucket: BucketName, token: String) -> StorageResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(transport)?;
        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            bucket,
            token,
        })
    }

    /// Point the adapter at a different endpoint, e.g. a local fake server.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn list_url(&self) -> StorageResult<Url> {
        self.url(&["b", self.bucket.as_str(), "o"])
    }

    fn object_url(&self, name: &str) -> StorageResult<Url> {
        self.url(&["b", self.bucket.as_str(), "o", name])
    }

    /// Build an endpoint URL from path segments; segments are
    /// percent-encoded, so object names containing `/` stay one segment.
    fn url(&self, segments: &[&str]) -> StorageResult<Url> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|e| StorageError::Transport(format!("invalid endpoint: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| StorageError::Transport("endpoint cannot be a base URL".to_string()))?
            .extend(segments);
        Ok(url)
    }

    async fn list(&self, versions: bool) -> StorageResult<Vec<ObjectAttributes>> {
        let mut out = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut request = self
                .http
                .get(self.list_url()?)
                .bearer_auth(&self.token)
                .query(&[("versions", versions)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }
            let response = ok_or_backend(request.send().await.map_err(transport)?).await?;
            let page: ObjectListResponse = response.json().await.map_err(transport)?;
            for item in page.items.unwrap_or_default() {
                out.push(item.into_attributes()?);
            }
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl VersionedBucket for GcsBucket {
    async fn list_versions(&self) -> StorageResult<Vec<ObjectAttributes>> {
        self.list(true).await
    }

    async fn list_live(&self) -> StorageResult<Vec<ObjectAttributes>> {
        self.list(false).await
    }

    async fn restore_generation(&self, name: &str, generation: i64) -> StorageResult<()> {
        // Server-side rewrite of the pinned generation onto itself makes it
        // the new live version. Large objects need several calls chained by
        // the rewrite token.
        let mut url = self.url(&[
            "b",
            self.bucket.as_str(),
            "o",
            name,
            "rewriteTo",
            "b",
            self.bucket.as_str(),
            "o",
            name,
        ])?;
        url.query_pairs_mut()
            .append_pair("sourceGeneration", &generation.to_string());

        let mut rewrite_token: Option<String> = None;
        loop {
            let mut request = self
                .http
                .post(url.clone())
                .bearer_auth(&self.token)
                .json(&json!({}));
            if let Some(token) = &rewrite_token {
                request = request.query(&[("rewriteToken", token.as_str())]);
            }
            let response = ok_or_backend(request.send().await.map_err(transport)?).await?;
            let progress: RewriteResponse = response.json().await.map_err(transport)?;
            if progress.done {
                return Ok(());
            }
            rewrite_token = progress.rewrite_token;
        }
    }

    async fn update_metadata(&self, name: &str, attrs: &ObjectAttributes) -> StorageResult<()> {
        let patch = ObjectPatch {
            content_type: &attrs.content_type,
            content_language: &attrs.content_language,
            cache_control: &attrs.cache_control,
            content_encoding: &attrs.content_encoding,
            custom_time: attrs.custom_time,
            metadata: &attrs.metadata,
            acl: attrs
                .acl
                .iter()
                .map(|rule| AclResource {
                    entity: rule.entity.clone(),
                    role: rule.role.clone(),
                })
                .collect(),
        };
        let response = self
            .http
            .patch(self.object_url(name)?)
            .bearer_auth(&self.token)
            .json(&patch)
            .send()
            .await
            .map_err(transport)?;
        ok_or_backend(response).await?;
        Ok(())
    }

    async fn delete_object(&self, name: &str) -> StorageResult<()> {
        let response = self
            .http
            .delete(self.object_url(name)?)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(transport)?;
        if response.status().as_u16() == 404 {
            return Err(StorageError::ObjectNotFound {
                name: name.to_string(),
            });
        }
        ok_or_backend(response).await?;
        Ok(())
    }
}

#[async_trait]
impl BucketProvisioner for GcsBucket {
    async fn create_bucket(
        &self,
        project: &str,
        bucket: &BucketName,
        retention_days: u32,
    ) -> StorageResult<()> {
        let url = self.url(&["b"])?;
        let body = json!({
            "name": bucket.as_str(),
            "versioning": { "enabled": true },
            "lifecycle": {
                "rule": [{
                    "action": { "type": "Delete" },
                    "condition": { "age": retention_days, "isLive": false }
                }]
            }
        });
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .query(&[("project", project)])
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        ok_or_backend(response).await?;
        Ok(())
    }
}

fn transport(err: reqwest::Error) -> StorageError {
    StorageError::Transport(err.to_string())
}

async fn ok_or_backend(response: reqwest::Response) -> StorageResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    Err(StorageError::BackendError { status, message })
}

// Wire types (objects.list / objects.rewrite resources)

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectListResponse {
    items: Option<Vec<ObjectResource>>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectResource {
    name: String,
    // The JSON API encodes 64-bit numbers as strings.
    generation: String,
    #[serde(default)]
    size: String,
    #[serde(default)]
    crc32c: String,
    updated: DateTime<Utc>,
    time_deleted: Option<DateTime<Utc>>,
    #[serde(default)]
    content_type: String,
    #[serde(default)]
    content_language: String,
    #[serde(default)]
    cache_control: String,
    #[serde(default)]
    content_encoding: String,
    custom_time: Option<DateTime<Utc>>,
    metadata: Option<HashMap<String, String>>,
    acl: Option<Vec<AclResource>>,
    owner: Option<OwnerResource>,
    customer_encryption: Option<CustomerEncryption>,
    #[serde(default)]
    kms_key_name: String,
}

#[derive(Deserialize, Serialize)]
struct AclResource {
    entity: String,
    role: String,
}

#[derive(Deserialize)]
struct OwnerResource {
    entity: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerEncryption {
    key_sha256: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RewriteResponse {
    done: bool,
    rewrite_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ObjectPatch<'a> {
    content_type: &'a str,
    content_language: &'a str,
    cache_control: &'a str,
    content_encoding: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_time: Option<DateTime<Utc>>,
    metadata: &'a HashMap<String, String>,
    acl: Vec<AclResource>,
}

impl ObjectResource {
    fn into_attributes(self) -> StorageResult<ObjectAttributes> {
        let generation = self.generation.parse::<i64>().map_err(|_| {
            StorageError::InvalidAttributes(format!(
                "bad generation {:?} for object {:?}",
                self.generation, self.name
            ))
        })?;
        let size = if self.size.is_empty() {
            0
        } else {
            self.size.parse::<u64>().map_err(|_| {
                StorageError::InvalidAttributes(format!(
                    "bad size {:?} for object {:?}",
                    self.size, self.name
                ))
            })?
        };
        let crc32c = decode_crc32c(&self.crc32c).ok_or_else(|| {
            StorageError::InvalidAttributes(format!(
                "bad crc32c {:?} for object {:?}",
                self.crc32c, self.name
            ))
        })?;
        Ok(ObjectAttributes {
            name: self.name,
            crc32c,
            generation,
            size,
            updated: self.updated,
            deleted: self.time_deleted,
            content_type: self.content_type,
            content_language: self.content_language,
            cache_control: self.cache_control,
            content_encoding: self.content_encoding,
            custom_time: self.custom_time,
            metadata: self.metadata.unwrap_or_default(),
            acl: self
                .acl
                .unwrap_or_default()
                .into_iter()
                .map(|rule| AclRule {
                    entity: rule.entity,
                    role: rule.role,
                })
                .collect(),
            owner: self.owner.map(|o| o.entity).unwrap_or_default(),
            customer_key_sha256: self
                .customer_encryption
                .map(|e| e.key_sha256)
                .unwrap_or_default(),
            kms_key_name: self.kms_key_name,
        })
    }
}

/// The API carries the CRC32C checksum as base64 of the big-endian bytes.
fn decode_crc32c(encoded: &str) -> Option<u32> {
    if encoded.is_empty() {
        return Some(0);
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let bytes: [u8; 4] = bytes.try_into().ok()?;
    Some(u32::from_be_bytes(bytes))
}
