//! The restore planner: diff a historical snapshot against the current one.

use crate::domain::models::{Action, Plan, PlanElement, Snapshot};
use crate::services::metadata::full_metadata_equal;

/// Compute the plan that transforms the state in `current` into the state in
/// `historical`. The plan is a diff: objects that already match produce no
/// entry, so identical snapshots yield an empty plan and applying a plan
/// twice is a no-op the second time.
///
/// Content wins priority over metadata: a checksum mismatch is always a full
/// restore, the metadata comparison only runs for matching checksums.
pub fn plan_restore(historical: &Snapshot, current: &Snapshot) -> Plan {
    let mut plan = Plan::new();

    for (name, historical_attrs) in historical {
        match current.get(name) {
            Some(current_attrs) => {
                if historical_attrs.crc32c != current_attrs.crc32c {
                    plan.insert(
                        name.clone(),
                        PlanElement {
                            action: Action::RestoreObject,
                            historical: Some(historical_attrs.clone()),
                            current: Some(current_attrs.clone()),
                        },
                    );
                } else if !full_metadata_equal(historical_attrs, current_attrs) {
                    plan.insert(
                        name.clone(),
                        PlanElement {
                            action: Action::RestoreMetadata,
                            historical: Some(historical_attrs.clone()),
                            current: Some(current_attrs.clone()),
                        },
                    );
                }
            }
            None => {
                plan.insert(
                    name.clone(),
                    PlanElement {
                        action: Action::RestoreObject,
                        historical: Some(historical_attrs.clone()),
                        current: None,
                    },
                );
            }
        }
    }

    for (name, current_attrs) in current {
        if !historical.contains_key(name) {
            plan.insert(
                name.clone(),
                PlanElement {
                    action: Action::Delete,
                    historical: None,
                    current: Some(current_attrs.clone()),
                },
            );
        }
    }

    plan
}
