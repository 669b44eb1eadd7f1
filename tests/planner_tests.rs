use std::collections::{HashMap, HashSet};

use chrono::{TimeZone, Utc};
use gcs_time_machine::{plan_restore, Action, ObjectAttributes, Snapshot};

fn attrs(name: &str, crc32c: u32, meta: &[(&str, &str)]) -> ObjectAttributes {
    ObjectAttributes {
        name: name.to_string(),
        crc32c,
        generation: 1,
        size: 10,
        updated: Utc.with_ymd_and_hms(2021, 6, 1, 12, 0, 0).unwrap(),
        deleted: None,
        content_type: "application/octet-stream".to_string(),
        content_language: String::new(),
        cache_control: String::new(),
        content_encoding: String::new(),
        custom_time: None,
        metadata: meta
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        acl: Vec::new(),
        owner: "user-alice".to_string(),
        customer_key_sha256: String::new(),
        kms_key_name: String::new(),
    }
}

fn snapshot(objects: Vec<ObjectAttributes>) -> Snapshot {
    objects.into_iter().map(|a| (a.name.clone(), a)).collect()
}

#[test]
fn identical_snapshots_yield_empty_plan() {
    let h = snapshot(vec![
        attrs("a", 1, &[("k", "x")]),
        attrs("b", 2, &[]),
    ]);
    let c = h.clone();
    assert!(plan_restore(&h, &c).is_empty());
}

#[test]
fn both_empty_yields_empty_plan() {
    let plan = plan_restore(&Snapshot::new(), &Snapshot::new());
    assert!(plan.is_empty());
}

#[test]
fn missing_object_is_restored() {
    let h = snapshot(vec![attrs("a", 1, &[("k", "x")])]);
    let c = Snapshot::new();

    let plan = plan_restore(&h, &c);
    assert_eq!(plan.len(), 1);
    let element = &plan["a"];
    assert_eq!(element.action, Action::RestoreObject);
    assert!(element.historical.is_some());
    assert!(element.current.is_none());
}

#[test]
fn content_mismatch_wins_over_metadata() {
    // Same metadata, different checksum: content restore, not metadata.
    let h = snapshot(vec![attrs("a", 1, &[("k", "x")])]);
    let c = snapshot(vec![attrs("a", 2, &[("k", "x")])]);

    let plan = plan_restore(&h, &c);
    assert_eq!(plan.len(), 1);
    let element = &plan["a"];
    assert_eq!(element.action, Action::RestoreObject);
    assert!(element.historical.is_some());
    assert!(element.current.is_some());
}

#[test]
fn content_mismatch_with_differing_metadata_still_restores_object() {
    let h = snapshot(vec![attrs("a", 1, &[("k", "x")])]);
    let c = snapshot(vec![attrs("a", 2, &[("k", "y")])]);

    let plan = plan_restore(&h, &c);
    assert_eq!(plan["a"].action, Action::RestoreObject);
}

#[test]
fn metadata_mismatch_restores_metadata_only() {
    let h = snapshot(vec![attrs("a", 1, &[("k", "x")])]);
    let c = snapshot(vec![attrs("a", 1, &[("k", "y")])]);

    let plan = plan_restore(&h, &c);
    assert_eq!(plan.len(), 1);
    let element = &plan["a"];
    assert_eq!(element.action, Action::RestoreMetadata);
    assert!(element.historical.is_some());
    assert!(element.current.is_some());
}

#[test]
fn extra_object_is_deleted() {
    let h = Snapshot::new();
    let c = snapshot(vec![attrs("a", 1, &[])]);

    let plan = plan_restore(&h, &c);
    assert_eq!(plan.len(), 1);
    let element = &plan["a"];
    assert_eq!(element.action, Action::Delete);
    assert!(element.historical.is_none());
    assert!(element.current.is_some());
}

#[test]
fn matching_object_produces_no_entry() {
    let h = snapshot(vec![attrs("a", 1, &[("k", "x")])]);
    let c = snapshot(vec![attrs("a", 1, &[("k", "x")])]);
    assert!(plan_restore(&h, &c).is_empty());
}

#[test]
fn mixed_plan_covers_each_case_once() {
    let h = snapshot(vec![
        attrs("untouched", 1, &[]),
        attrs("rewritten", 2, &[]),
        attrs("relabeled", 3, &[("k", "old")]),
        attrs("vanished", 4, &[]),
    ]);
    let c = snapshot(vec![
        attrs("untouched", 1, &[]),
        attrs("rewritten", 20, &[]),
        attrs("relabeled", 3, &[("k", "new")]),
        attrs("intruder", 5, &[]),
    ]);

    let plan = plan_restore(&h, &c);
    assert_eq!(plan.len(), 4);
    assert_eq!(plan["rewritten"].action, Action::RestoreObject);
    assert_eq!(plan["relabeled"].action, Action::RestoreMetadata);
    assert_eq!(plan["vanished"].action, Action::RestoreObject);
    assert_eq!(plan["intruder"].action, Action::Delete);
    assert!(!plan.contains_key("untouched"));
}

#[test]
fn plan_names_come_from_the_inputs() {
    let h = snapshot(vec![attrs("a", 1, &[]), attrs("b", 2, &[])]);
    let c = snapshot(vec![attrs("b", 3, &[]), attrs("c", 4, &[])]);

    let plan = plan_restore(&h, &c);
    let known: HashSet<&String> = h.keys().chain(c.keys()).collect();
    for name in plan.keys() {
        assert!(known.contains(name), "spurious plan entry {name:?}");
    }

    // And every name appears in at most one element, by construction of the
    // map: entry count matches the distinct changed names.
    let changed: HashMap<&str, ()> =
        [("a", ()), ("b", ()), ("c", ())].into_iter().collect();
    assert_eq!(plan.len(), changed.len());
}
