//! Plan application against the live bucket.

use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::domain::{
    errors::{StorageError, StorageResult},
    models::{Action, Plan, PlanElement},
};
use crate::ports::storage::VersionedBucket;

/// Plan entries are independent, so they are applied through a bounded pool.
const APPLY_CONCURRENCY: usize = 8;

/// Outcome of applying a plan. Failures are collected per object instead of
/// aborting the run: the plan is idempotent, so rerunning after a partial
/// failure re-diffs and retries only what is still wrong.
#[derive(Debug)]
pub struct ApplyReport {
    pub applied: usize,
    pub failures: Vec<(String, StorageError)>,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Execute every entry of the plan against the bucket, at most
/// [`APPLY_CONCURRENCY`] in flight at a time.
pub async fn apply_plan(bucket: &dyn VersionedBucket, plan: &Plan) -> ApplyReport {
    let results: Vec<(String, StorageResult<()>)> = stream::iter(plan.iter())
        .map(|(name, element)| async move {
            let outcome = apply_element(bucket, name, element).await;
            (name.clone(), outcome)
        })
        .buffer_unordered(APPLY_CONCURRENCY)
        .collect()
        .await;

    let mut report = ApplyReport {
        applied: 0,
        failures: Vec::new(),
    };
    for (name, outcome) in results {
        match outcome {
            Ok(()) => report.applied += 1,
            Err(err) => {
                warn!(object = %name, error = %err, "plan entry failed");
                report.failures.push((name, err));
            }
        }
    }
    info!(
        applied = report.applied,
        failed = report.failures.len(),
        "plan applied"
    );
    report
}

async fn apply_element(
    bucket: &dyn VersionedBucket,
    name: &str,
    element: &PlanElement,
) -> StorageResult<()> {
    match element.action {
        Action::Delete => bucket.delete_object(name).await,
        Action::RestoreObject | Action::RestoreMetadata => {
            let historical = element.historical.as_ref().ok_or_else(|| {
                StorageError::InvalidAttributes(format!(
                    "plan entry for {name:?} has no historical attributes"
                ))
            })?;
            bucket
                .restore_generation(name, historical.generation)
                .await?;
            // Restore does not carry metadata atomically on every backend.
            bucket.update_metadata(name, historical).await
        }
    }
}
