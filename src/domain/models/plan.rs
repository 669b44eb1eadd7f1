use std::collections::HashMap;

use crate::domain::models::ObjectAttributes;

/// What must happen to one object to move the bucket back to the target
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Content differs or the object is gone: restore the historical
    /// generation as the live version.
    RestoreObject,
    /// Content matches but some metadata field differs: re-apply the
    /// historical metadata only.
    RestoreMetadata,
    /// The object did not exist at the target instant: remove it.
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::RestoreObject => "restore-object",
            Action::RestoreMetadata => "restore-metadata",
            Action::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of a restore plan.
///
/// Invariants:
/// - `Delete` carries no historical attributes and some current attributes.
/// - `RestoreObject` carries historical attributes; current attributes are
///   absent (object gone) or have a different checksum.
/// - `RestoreMetadata` carries both, with equal checksums and at least one
///   differing metadata field.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanElement {
    pub action: Action,
    pub historical: Option<ObjectAttributes>,
    pub current: Option<ObjectAttributes>,
}

/// The computed diff of actions needed to move current bucket state to match
/// a historical snapshot. Keyed by object name; entries are independent of
/// one another.
pub type Plan = HashMap<String, PlanElement>;
