//! Job storage trait and error types.

use thiserror::Error;

use crate::job::{CreateJobRequest, Job};

/// Errors that can occur on job store operations.
#[derive(Debug, Error)]
pub enum JobError {
    /// Job not found.
    #[error("Job not found: {id}")]
    NotFound { id: String },

    /// The create request is structurally invalid.
    #[error("Invalid job request: {reason}")]
    InvalidRequest { reason: String },

    /// The store's lock was poisoned by a panicking writer.
    #[error("Job store lock poisoned")]
    LockPoisoned,
}

impl JobError {
    /// Creates a not-found error.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates an invalid-request error.
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }
}

/// Trait for job storage backends.
///
/// The store is the sole owner of job lifecycle state. It enforces two
/// invariants for every caller: records in a terminal state are never
/// mutated again, and progress never decreases.
pub trait JobStore: Send + Sync {
    /// Create a new job in the pending state at progress zero.
    ///
    /// Allocates a fresh identifier and returns a snapshot of the inserted
    /// record. Fails with [`JobError::InvalidRequest`] if the URL is empty.
    fn create(&self, request: CreateJobRequest) -> Result<Job, JobError>;

    /// Get a snapshot of a job by ID.
    fn get(&self, id: &str) -> Result<Option<Job>, JobError>;

    /// List all jobs, ordered by creation time descending.
    fn list(&self) -> Result<Vec<Job>, JobError>;

    /// Count all jobs.
    fn count(&self) -> Result<usize, JobError>;

    /// Apply a mutation to a job under the store's write lock, returning the
    /// updated snapshot.
    ///
    /// Unknown IDs are a logic error on runner paths and surface as
    /// [`JobError::NotFound`]. Mutations against a terminal record are
    /// ignored (the current snapshot is returned); progress writes below the
    /// current value keep the current value.
    fn update(&self, id: &str, mutate: &mut dyn FnMut(&mut Job)) -> Result<Job, JobError>;
}
