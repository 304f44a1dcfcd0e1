//! Types for the extractor module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata for a video, resolved without downloading it.
///
/// All numeric fields are pre-formatted strings so clients render them
/// consistently. Serializes with the wire field names clients expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title, or `Unknown Title` when the source omits it.
    pub title: String,
    /// Duration formatted as `H:MM:SS` or `M:SS`.
    pub duration: String,
    /// View count in compact notation.
    pub views: String,
    /// Uploader or channel name, or `Unknown Author`.
    pub author: String,
    /// Thumbnail URL, empty when unavailable.
    pub thumbnail: String,
    /// Like count in compact notation.
    pub likes: String,
    /// Comment count in compact notation.
    pub comments: String,
    /// Video description, empty when unavailable.
    pub description: String,
    /// Upload date as reported by the source, empty when unavailable.
    pub upload_date: String,
    /// Tags attached to the video.
    pub tags: Vec<String>,
    /// Quality labels with at least one video stream, sorted ascending.
    #[serde(rename = "availableQualities")]
    pub available_qualities: Vec<String>,
}

/// A download request for a single job.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// ID of the job this download belongs to.
    pub job_id: String,
    /// Source URL.
    pub url: String,
    /// Requested quality label, e.g. `720p`.
    pub quality: String,
    /// Whether to extract audio only.
    pub audio_only: bool,
    /// Path the artifact should be written to.
    pub output_path: PathBuf,
}

/// Progress update during a download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// ID of the job being downloaded.
    pub job_id: String,
    /// Percentage as parsed from the extractor output (0.0 - 100.0).
    pub percent: f32,
}

/// Result of a successful download.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadOutcome {
    /// ID of the downloaded job.
    pub job_id: String,
    /// Path of the written artifact.
    pub output_path: PathBuf,
    /// Download duration in milliseconds.
    pub duration_ms: u64,
}
