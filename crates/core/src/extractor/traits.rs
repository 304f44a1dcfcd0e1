//! Trait definitions for the extractor module.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::ExtractorError;
use super::types::{DownloadOutcome, DownloadProgress, DownloadRequest, VideoMetadata};

/// An extractor that resolves metadata and downloads media from a URL.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Returns the name of this extractor implementation.
    fn name(&self) -> &str;

    /// Resolves metadata for a URL without downloading anything.
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ExtractorError>;

    /// Downloads media to the requested output path with progress reporting.
    ///
    /// Percentages are forwarded exactly as parsed from the extractor's
    /// output, without scaling. If the sender is dropped, the download
    /// continues without progress reporting.
    async fn download(
        &self,
        request: DownloadRequest,
        progress_tx: mpsc::Sender<DownloadProgress>,
    ) -> Result<DownloadOutcome, ExtractorError>;

    /// Validates that the extractor is properly configured and ready.
    async fn validate(&self) -> Result<(), ExtractorError>;
}
