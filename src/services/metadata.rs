//! Non-content metadata comparison between two object versions.

use crate::domain::models::ObjectAttributes;

/// Decide whether two versions with identical content checksums also carry
/// identical metadata. Every field is compared explicitly so the contract
/// stays independent of derived structural equality: the metadata map as
/// key/value equality, the ACL element by element (order matters), and each
/// scalar field exactly.
pub fn full_metadata_equal(a: &ObjectAttributes, b: &ObjectAttributes) -> bool {
    if a.metadata.len() != b.metadata.len() {
        return false;
    }
    for (key, value) in &a.metadata {
        if b.metadata.get(key) != Some(value) {
            return false;
        }
    }
    if a.content_type != b.content_type {
        return false;
    }
    if a.content_language != b.content_language {
        return false;
    }
    if a.cache_control != b.cache_control {
        return false;
    }
    if a.acl.len() != b.acl.len() {
        return false;
    }
    for (rule_a, rule_b) in a.acl.iter().zip(b.acl.iter()) {
        if rule_a.entity != rule_b.entity || rule_a.role != rule_b.role {
            return false;
        }
    }
    if a.owner != b.owner {
        return false;
    }
    if a.content_encoding != b.content_encoding {
        return false;
    }
    if a.customer_key_sha256 != b.customer_key_sha256 {
        return false;
    }
    if a.kms_key_name != b.kms_key_name {
        return false;
    }
    if a.custom_time != b.custom_time {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::AclRule;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;

    fn base() -> ObjectAttributes {
        ObjectAttributes {
            name: "report.csv".to_string(),
            crc32c: 0xdeadbeef,
            generation: 7,
            size: 1024,
            updated: Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap(),
            deleted: None,
            content_type: "text/csv".to_string(),
            content_language: "en".to_string(),
            cache_control: "no-cache".to_string(),
            content_encoding: "gzip".to_string(),
            custom_time: None,
            metadata: HashMap::from([("team".to_string(), "data".to_string())]),
            acl: vec![AclRule {
                entity: "user-alice".to_string(),
                role: "OWNER".to_string(),
            }],
            owner: "user-alice".to_string(),
            customer_key_sha256: String::new(),
            kms_key_name: String::new(),
        }
    }

    #[test]
    fn test_reflexive() {
        let a = base();
        assert!(full_metadata_equal(&a, &a));
        assert!(full_metadata_equal(&a, &a.clone()));
    }

    #[test]
    fn test_single_field_mismatch_detected() {
        let a = base();

        let mut b = base();
        b.content_type = "text/plain".to_string();
        assert!(!full_metadata_equal(&a, &b));

        let mut b = base();
        b.content_language = "fr".to_string();
        assert!(!full_metadata_equal(&a, &b));

        let mut b = base();
        b.cache_control = "max-age=60".to_string();
        assert!(!full_metadata_equal(&a, &b));

        let mut b = base();
        b.content_encoding = String::new();
        assert!(!full_metadata_equal(&a, &b));

        let mut b = base();
        b.owner = "user-bob".to_string();
        assert!(!full_metadata_equal(&a, &b));

        let mut b = base();
        b.customer_key_sha256 = "abc123".to_string();
        assert!(!full_metadata_equal(&a, &b));

        let mut b = base();
        b.kms_key_name = "projects/p/keys/k".to_string();
        assert!(!full_metadata_equal(&a, &b));

        let mut b = base();
        b.custom_time = Some(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        assert!(!full_metadata_equal(&a, &b));
    }

    #[test]
    fn test_metadata_map_compared_by_keys_and_values() {
        let a = base();

        let mut b = base();
        b.metadata.insert("env".to_string(), "prod".to_string());
        assert!(!full_metadata_equal(&a, &b));

        let mut b = base();
        b.metadata.insert("team".to_string(), "infra".to_string());
        assert!(!full_metadata_equal(&a, &b));

        let mut b = base();
        b.metadata.clear();
        assert!(!full_metadata_equal(&a, &b));
    }

    #[test]
    fn test_acl_order_matters() {
        let second = AclRule {
            entity: "allUsers".to_string(),
            role: "READER".to_string(),
        };

        let mut a = base();
        a.acl.push(second.clone());

        let mut b = base();
        b.acl.insert(0, second);

        assert!(!full_metadata_equal(&a, &b));
    }

    #[test]
    fn test_content_fields_ignored() {
        let a = base();
        let mut b = base();
        b.crc32c = 1;
        b.generation = 99;
        b.size = 2048;
        b.updated = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
        assert!(full_metadata_equal(&a, &b));
    }
}
