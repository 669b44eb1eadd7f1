pub mod applier;
pub mod metadata;
pub mod planner;
pub mod snapshot;
pub mod time_parser;

pub use applier::{apply_plan, ApplyReport};
pub use metadata::full_metadata_equal;
pub use planner::plan_restore;
pub use snapshot::{snapshot_at, snapshot_current};
pub use time_parser::parse_time;
