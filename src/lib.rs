pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - core entities and value objects
pub use domain::{
    AclRule,
    Action,
    BucketName,
    BucketNameError,
    ObjectAttributes,
    Plan,
    PlanElement,
    Snapshot,
    // Errors
    StorageError,
    StorageResult,
    TimeParseError,
};

// Port types - interfaces for the storage backend
pub use ports::{BucketProvisioner, VersionedBucket};

// Core operations
pub use services::{
    apply_plan, full_metadata_equal, parse_time, plan_restore, snapshot_at, snapshot_current,
    ApplyReport,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{GcsBucket, InMemoryBucket};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        apply_plan, parse_time, plan_restore, snapshot_at, snapshot_current, Action, BucketName,
        GcsBucket, InMemoryBucket, ObjectAttributes, Plan, Snapshot, StorageError, VersionedBucket,
    };
}
