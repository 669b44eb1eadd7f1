pub mod gcs;
pub mod memory;

pub use gcs::GcsBucket;
pub use memory::InMemoryBucket;
