//! Mock extractor for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

use crate::extractor::{
    DownloadOutcome, DownloadProgress, DownloadRequest, ExtractorError, MediaExtractor,
    VideoMetadata,
};

use super::fixtures;

/// A recorded download for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedDownload {
    /// The request that was submitted.
    pub request: DownloadRequest,
    /// Whether the download succeeded.
    pub success: bool,
}

/// Mock implementation of the `MediaExtractor` trait.
///
/// Provides controllable behavior for testing:
/// - Track download requests for assertions
/// - Simulate success/failure
/// - Control metadata results per URL
/// - Script the progress percentages a download reports
/// - Optionally write the output file so artifact checks succeed
///
/// # Example
///
/// ```rust,ignore
/// use mediagrab_core::testing::MockExtractor;
///
/// let extractor = MockExtractor::new();
/// extractor.set_progress_script(vec![25.0, 50.0, 99.9]).await;
///
/// // ... run a job against it ...
///
/// let downloads = extractor.recorded_downloads().await;
/// assert_eq!(downloads.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockExtractor {
    /// Recorded downloads.
    downloads: Arc<RwLock<Vec<RecordedDownload>>>,
    /// Pre-configured metadata results by URL.
    metadata_results: Arc<RwLock<HashMap<String, VideoMetadata>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ExtractorError>>>,
    /// Progress percentages sent during a download, in order.
    progress_script: Arc<RwLock<Vec<f32>>>,
    /// Simulated total download duration in milliseconds.
    download_duration_ms: Arc<RwLock<u64>>,
    /// Whether a download writes its output file.
    write_output: Arc<RwLock<bool>>,
}

impl Default for MockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExtractor {
    /// Create a new mock extractor.
    pub fn new() -> Self {
        Self {
            downloads: Arc::new(RwLock::new(Vec::new())),
            metadata_results: Arc::new(RwLock::new(HashMap::new())),
            next_error: Arc::new(RwLock::new(None)),
            progress_script: Arc::new(RwLock::new(vec![25.0, 50.0, 75.0, 100.0])),
            download_duration_ms: Arc::new(RwLock::new(0)),
            write_output: Arc::new(RwLock::new(true)),
        }
    }

    /// Get all recorded downloads.
    pub async fn recorded_downloads(&self) -> Vec<RecordedDownload> {
        self.downloads.read().await.clone()
    }

    /// Get the number of downloads performed.
    pub async fn download_count(&self) -> usize {
        self.downloads.read().await.len()
    }

    /// Set the metadata result for a specific URL.
    pub async fn set_metadata(&self, url: impl Into<String>, metadata: VideoMetadata) {
        self.metadata_results
            .write()
            .await
            .insert(url.into(), metadata);
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ExtractorError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the progress percentages reported during a download.
    pub async fn set_progress_script(&self, script: Vec<f32>) {
        *self.progress_script.write().await = script;
    }

    /// Set the simulated download duration.
    pub async fn set_download_duration(&self, duration: Duration) {
        *self.download_duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Enable or disable writing the output file on download.
    ///
    /// With this disabled, downloads report success without producing an
    /// artifact, which makes the post-download file check fail.
    pub async fn set_write_output(&self, write: bool) {
        *self.write_output.write().await = write;
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ExtractorError> {
        self.next_error.write().await.take()
    }
}

#[async_trait]
impl MediaExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ExtractorError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        if let Some(metadata) = self.metadata_results.read().await.get(url) {
            return Ok(metadata.clone());
        }

        Ok(fixtures::video_metadata())
    }

    async fn download(
        &self,
        request: DownloadRequest,
        progress_tx: mpsc::Sender<DownloadProgress>,
    ) -> Result<DownloadOutcome, ExtractorError> {
        if let Some(err) = self.take_error().await {
            self.downloads.write().await.push(RecordedDownload {
                request,
                success: false,
            });
            return Err(err);
        }

        self.downloads.write().await.push(RecordedDownload {
            request: request.clone(),
            success: true,
        });

        let duration_ms = *self.download_duration_ms.read().await;
        let script = self.progress_script.read().await.clone();
        let step_delay = if script.is_empty() {
            Duration::ZERO
        } else {
            Duration::from_millis(duration_ms / script.len() as u64)
        };

        for percent in script {
            let _ = progress_tx
                .send(DownloadProgress {
                    job_id: request.job_id.clone(),
                    percent,
                })
                .await;
            if !step_delay.is_zero() {
                tokio::time::sleep(step_delay).await;
            }
        }

        if *self.write_output.read().await {
            if let Some(parent) = request.output_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&request.output_path, b"mock artifact data").await?;
        }

        Ok(DownloadOutcome {
            job_id: request.job_id,
            output_path: request.output_path,
            duration_ms,
        })
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(())
    }
}
