pub mod attributes;
pub mod plan;

pub use attributes::{AclRule, ObjectAttributes, Snapshot};
pub use plan::{Action, Plan, PlanElement};
