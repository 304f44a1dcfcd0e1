//! Job system for tracking download requests through their lifecycle.

mod memory;
mod store;
mod types;

pub use memory::MemoryJobStore;
pub use store::{JobError, JobStore};
pub use types::{
    CreateJobRequest, EngagementStats, EnrichmentPayload, Job, JobState, SentimentBreakdown,
};
