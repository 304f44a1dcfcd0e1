//! In-memory job store.
//!
//! Jobs are deliberately not persisted: records live for the lifetime of the
//! store and vanish on shutdown, matching the polling clients' expectations.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::job::store::{JobError, JobStore};
use crate::job::types::{CreateJobRequest, Job, JobState};

/// Concurrency-safe in-memory implementation of [`JobStore`].
///
/// Writers serialize behind a single `RwLock`; readers clone snapshots so no
/// caller ever observes a half-applied mutation.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl MemoryJobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for MemoryJobStore {
    fn create(&self, request: CreateJobRequest) -> Result<Job, JobError> {
        if request.url.trim().is_empty() {
            return Err(JobError::invalid_request("url must not be empty"));
        }

        let job = Job {
            id: Uuid::new_v4().to_string(),
            url: request.url,
            quality: request.quality,
            audio_only: request.audio_only,
            state: JobState::Pending,
            progress: 0.0,
            created_at: Utc::now(),
            title: request.title,
            thumbnail: request.thumbnail,
            duration: request.duration,
            file_size: None,
            file_path: None,
            download_url: None,
            enrichment: None,
        };

        let mut jobs = self.jobs.write().map_err(|_| JobError::LockPoisoned)?;
        jobs.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    fn get(&self, id: &str) -> Result<Option<Job>, JobError> {
        let jobs = self.jobs.read().map_err(|_| JobError::LockPoisoned)?;
        Ok(jobs.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Job>, JobError> {
        let jobs = self.jobs.read().map_err(|_| JobError::LockPoisoned)?;
        let mut all: Vec<Job> = jobs.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    fn count(&self) -> Result<usize, JobError> {
        let jobs = self.jobs.read().map_err(|_| JobError::LockPoisoned)?;
        Ok(jobs.len())
    }

    fn update(&self, id: &str, mutate: &mut dyn FnMut(&mut Job)) -> Result<Job, JobError> {
        let mut jobs = self.jobs.write().map_err(|_| JobError::LockPoisoned)?;
        let job = jobs.get_mut(id).ok_or_else(|| JobError::not_found(id))?;

        if job.state.is_terminal() {
            warn!(
                job_id = %id,
                state = job.state.state_type(),
                "ignoring update to terminal job"
            );
            return Ok(job.clone());
        }

        let previous_progress = job.progress;
        mutate(job);

        if job.progress < previous_progress {
            debug!(
                job_id = %id,
                attempted = job.progress,
                kept = previous_progress,
                "keeping higher progress value"
            );
            job.progress = previous_progress;
        }

        Ok(job.clone())
    }
}
