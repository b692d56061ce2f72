// src/jobs/mod.rs
pub mod aggregator;
pub mod sources;
pub mod types;

pub use aggregator::JobAggregator;
pub use sources::JobSource;
pub use types::{AggregatedJobs, JobPosting, JobQuery, JobSourceKind};
