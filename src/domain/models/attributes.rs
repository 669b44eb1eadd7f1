use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// One entry of an object's access control list. Order within the list is
/// significant: two objects whose rules differ only in ordering do not have
/// equal ACLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclRule {
    pub entity: String,
    pub role: String,
}

/// Metadata of a single version (generation) of a single object, as returned
/// by a versioned listing. Immutable once read from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectAttributes {
    /// Object name, unique key within a snapshot.
    pub name: String,
    /// CRC32C checksum of the content.
    pub crc32c: u32,
    /// Generation number identifying this version for restore operations.
    pub generation: i64,
    /// Content size in bytes.
    pub size: u64,
    /// When this version was last written.
    pub updated: DateTime<Utc>,
    /// When this version stopped being current. `None` means it is still live.
    pub deleted: Option<DateTime<Utc>>,
    pub content_type: String,
    pub content_language: String,
    pub cache_control: String,
    pub content_encoding: String,
    pub custom_time: Option<DateTime<Utc>>,
    /// Arbitrary user metadata; key order irrelevant.
    pub metadata: HashMap<String, String>,
    pub acl: Vec<AclRule>,
    pub owner: String,
    /// SHA-256 digest of the customer-supplied encryption key, if any.
    pub customer_key_sha256: String,
    pub kms_key_name: String,
}

impl ObjectAttributes {
    /// Whether this version is the live one (no deletion timestamp recorded).
    pub fn is_live(&self) -> bool {
        self.deleted.is_none()
    }

    /// Whether this version was the live one at instant `t`: written at or
    /// before `t`, and not yet superseded or deleted at `t`.
    pub fn live_at(&self, t: DateTime<Utc>) -> bool {
        self.updated <= t && self.deleted.map_or(true, |d| d > t)
    }
}

/// Point-in-time mapping from object name to its attributes. When a listing
/// yields several versions of the same name for the same instant, the
/// last-listed one wins.
pub type Snapshot = HashMap<String, ObjectAttributes>;
