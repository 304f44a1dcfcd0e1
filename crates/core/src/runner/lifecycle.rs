//! Job lifecycle execution.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::enrichment::Enricher;
use crate::extractor::{
    DownloadProgress, DownloadRequest, ExtractorError, MediaExtractor, DOWNLOAD_FALLBACK,
};
use crate::format;
use crate::job::{Job, JobError, JobState, JobStore};

/// Cap for live download percentages. The span above it is reserved for
/// the post-download checkpoints.
const DOWNLOAD_PROGRESS_CAP: f32 = 80.0;

/// Progress checkpoint written when the download process exits cleanly.
const CHECKPOINT_DOWNLOADED: f32 = 85.0;

/// Progress checkpoint written when enrichment has finished.
const CHECKPOINT_ENRICHED: f32 = 95.0;

/// Error type for runner operations.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Job not found in the store.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// A live runner task for this job already exists.
    #[error("Job is already running: {0}")]
    JobAlreadyRunning(String),

    /// The job has already left the pending state.
    #[error("Job is not pending: {0}")]
    NotPending(String),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] JobError),

    /// I/O error preparing the downloads directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builds the artifact file name for a job: `<id>_<sanitized title>.<ext>`.
///
/// Every character outside ASCII alphanumerics is replaced with an
/// underscore, so the name is safe in shells and URLs.
fn artifact_filename(job: &Job) -> String {
    let sanitized: String = job
        .title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_{}.{}", job.id, sanitized, job.artifact_extension())
}

/// Maps a download error to the message stored on the failed job.
fn failure_message(error: &ExtractorError) -> String {
    match error {
        // Classified failures already carry their user-facing message.
        ExtractorError::ExtractionFailed { message, .. } => message.clone(),
        other => format!("{}: {}", DOWNLOAD_FALLBACK, other),
    }
}

/// Drives jobs through their download lifecycle.
///
/// One background task per launched job, tracked by job id so tests and
/// shutdown can observe or abort them.
pub struct JobRunner {
    store: Arc<dyn JobStore>,
    extractor: Arc<dyn MediaExtractor>,
    enricher: Arc<dyn Enricher>,
    downloads_dir: PathBuf,
    handles: Arc<RwLock<HashMap<String, JoinHandle<()>>>>,
}

impl JobRunner {
    /// Creates a new runner.
    pub fn new(
        store: Arc<dyn JobStore>,
        extractor: Arc<dyn MediaExtractor>,
        enricher: Arc<dyn Enricher>,
        downloads_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            extractor,
            enricher,
            downloads_dir,
            handles: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Starts the lifecycle task for a pending job.
    ///
    /// Returns immediately; the download happens in the background.
    pub async fn launch(&self, job_id: &str) -> Result<(), RunnerError> {
        let job = self
            .store
            .get(job_id)?
            .ok_or_else(|| RunnerError::JobNotFound(job_id.to_string()))?;

        if job.state != JobState::Pending {
            return Err(RunnerError::NotPending(job_id.to_string()));
        }

        let store = Arc::clone(&self.store);
        let extractor = Arc::clone(&self.extractor);
        let enricher = Arc::clone(&self.enricher);
        let downloads_dir = self.downloads_dir.clone();
        let id = job.id.clone();

        // The write lock spans the duplicate check, the spawn and the
        // insert, so the task cannot remove its entry before it exists.
        let mut handles = self.handles.write().await;
        if handles.contains_key(job_id) {
            return Err(RunnerError::JobAlreadyRunning(job_id.to_string()));
        }

        let task_id = id.clone();
        let task_handles = Arc::clone(&self.handles);
        let handle = tokio::spawn(async move {
            if let Err(e) = Self::run_job(job, store, extractor, enricher, downloads_dir).await {
                error!("Runner task for job {} failed: {}", task_id, e);
            }

            let mut handles = task_handles.write().await;
            handles.remove(&task_id);
        });

        handles.insert(id, handle);
        Ok(())
    }

    /// Number of jobs with a live runner task.
    pub async fn active_count(&self) -> usize {
        self.handles.read().await.len()
    }

    /// Waits for the runner task of a job to finish, if one is live.
    pub async fn wait(&self, job_id: &str) {
        let handle = {
            let mut handles = self.handles.write().await;
            handles.remove(job_id)
        };
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    /// Aborts all live runner tasks.
    ///
    /// Interrupted jobs stay in whatever state the store last recorded;
    /// nothing resumes them after a restart.
    pub async fn shutdown(&self) {
        let mut handles = self.handles.write().await;
        for (job_id, handle) in handles.drain() {
            debug!("Aborting runner task for job {}", job_id);
            handle.abort();
        }
    }

    /// Runs the full lifecycle for one job.
    async fn run_job(
        job: Job,
        store: Arc<dyn JobStore>,
        extractor: Arc<dyn MediaExtractor>,
        enricher: Arc<dyn Enricher>,
        downloads_dir: PathBuf,
    ) -> Result<(), RunnerError> {
        let job_id = job.id.clone();
        info!("Starting download for job {} ({})", job_id, job.url);

        store.update(&job_id, &mut |job| {
            job.state = JobState::Downloading;
        })?;

        let filename = artifact_filename(&job);
        let output_path = downloads_dir.join(&filename);
        tokio::fs::create_dir_all(&downloads_dir).await?;

        let request = DownloadRequest {
            job_id: job_id.clone(),
            url: job.url.clone(),
            quality: job.quality.clone(),
            audio_only: job.audio_only,
            output_path: output_path.clone(),
        };

        let (progress_tx, mut progress_rx) = mpsc::channel::<DownloadProgress>(32);

        // The sender moves into the download call, so this drains and
        // exits once the download returns.
        let progress_store = Arc::clone(&store);
        let forwarder = tokio::spawn(async move {
            while let Some(progress) = progress_rx.recv().await {
                let capped = progress.percent.min(DOWNLOAD_PROGRESS_CAP);
                let result = progress_store.update(&progress.job_id, &mut |job| {
                    job.progress = capped;
                });
                if let Err(e) = result {
                    warn!(
                        "Failed to record progress for job {}: {}",
                        progress.job_id, e
                    );
                }
            }
        });

        let download_result = extractor.download(request, progress_tx).await;

        // Every progress send happened before the download returned; wait
        // for the forwarder so a checkpoint cannot race a stale percentage.
        let _ = forwarder.await;

        let outcome = match download_result {
            Ok(outcome) => outcome,
            Err(e) => {
                let message = failure_message(&e);
                warn!("Download failed for job {}: {}", job_id, e);
                store.update(&job_id, &mut |job| {
                    job.state = JobState::Error {
                        message: message.clone(),
                    };
                })?;
                return Ok(());
            }
        };

        debug!(
            "Download for job {} finished in {} ms",
            job_id, outcome.duration_ms
        );

        store.update(&job_id, &mut |job| {
            job.state = JobState::Analyzing;
            job.progress = CHECKPOINT_DOWNLOADED;
        })?;

        let metadata = match tokio::fs::metadata(&outcome.output_path).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Cannot stat artifact for job {}: {}", job_id, e);
                store.update(&job_id, &mut |job| {
                    job.state = JobState::Error {
                        message: "Failed to access downloaded file".to_string(),
                    };
                })?;
                return Ok(());
            }
        };

        let file_size = format::file_size(metadata.len());
        let download_url = format!("/download-file/{}", filename);
        let snapshot = store.update(&job_id, &mut |job| {
            job.file_size = Some(file_size.clone());
            job.file_path = Some(output_path.clone());
            job.download_url = Some(download_url.clone());
        })?;

        let payload = match enricher.enrich(&snapshot).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Enrichment failed for job {}: {}", job_id, e);
                store.update(&job_id, &mut |job| {
                    job.state = JobState::Error {
                        message: e.to_string(),
                    };
                })?;
                return Ok(());
            }
        };

        store.update(&job_id, &mut |job| {
            job.enrichment = Some(payload.clone());
            job.progress = CHECKPOINT_ENRICHED;
        })?;

        store.update(&job_id, &mut |job| {
            job.state = JobState::Completed;
            job.progress = 100.0;
        })?;

        info!("Job {} completed", job_id);
        Ok(())
    }
}
