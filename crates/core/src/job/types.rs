//! Core job data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Enrichment payload types
// ============================================================================

/// Sentiment percentages attached to an enriched job.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentimentBreakdown {
    /// Positive share, as an integer percentage.
    pub positive: u8,
    /// Negative share, as an integer percentage.
    pub negative: u8,
    /// Neutral share, as an integer percentage.
    pub neutral: u8,
}

/// Engagement counters, pre-formatted for display ("1.2K", "3.4M", "812").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngagementStats {
    pub likes: String,
    pub views: String,
    pub comments: String,
    pub shares: String,
}

/// Analytics attached to a job once the enrichment stage has run.
///
/// The shipped enricher fabricates this payload; nothing downstream may
/// assume the values were computed from real content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrichmentPayload {
    pub sentiment: SentimentBreakdown,
    pub keywords: Vec<String>,
    pub transcript: String,
    pub engagement: EngagementStats,
    pub topics: Vec<String>,
}

// ============================================================================
// Job state machine
// ============================================================================

/// Current state of a job.
///
/// State machine flow:
/// ```text
/// Pending -> Downloading -> Analyzing -> Completed
///                 |             |
///                 v             v
///               Error         Error
/// ```
///
/// `Pending` is the initial state. `Completed` and `Error` are terminal;
/// `Error` is reachable only from `Downloading` and `Analyzing`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobState {
    /// Job created, runner not yet started the external process.
    Pending,

    /// The external extractor process is running.
    Downloading,

    /// Download finished, post-processing (enrichment) in progress.
    Analyzing,

    /// Job finished successfully (terminal).
    Completed,

    /// Job failed (terminal).
    Error {
        /// Human-readable classified failure message.
        message: String,
    },
}

impl JobState {
    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Error { .. })
    }

    /// Returns true if the job is being actively worked on.
    pub fn is_active(&self) -> bool {
        matches!(self, JobState::Downloading | JobState::Analyzing)
    }

    /// Returns the state type as a string (wire format and filtering).
    pub fn state_type(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Downloading => "downloading",
            JobState::Analyzing => "analyzing",
            JobState::Completed => "completed",
            JobState::Error { .. } => "error",
        }
    }

    /// Returns the failure message if the job is in the error state.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            JobState::Error { message } => Some(message),
            _ => None,
        }
    }
}

// ============================================================================
// Job record
// ============================================================================

/// A job representing one download request and its evolving state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    /// Unique identifier (UUID).
    pub id: String,

    /// Source URL, as supplied by the caller.
    pub url: String,

    /// Requested quality label ("360p", "720p", "1080p"); opaque, never
    /// validated against the qualities metadata resolution reported.
    pub quality: String,

    /// Extract audio only (mp3) instead of video (mp4).
    pub audio_only: bool,

    /// Current state.
    pub state: JobState,

    /// Progress in [0, 100]. Live percentages are capped at 80; 85, 95 and
    /// 100 are fixed checkpoints for the post-download phases.
    pub progress: f32,

    /// When the job was created. Listings are ordered by this, newest first.
    pub created_at: DateTime<Utc>,

    /// Title from metadata resolution.
    pub title: String,

    /// Thumbnail URL from metadata resolution (may be empty).
    pub thumbnail: String,

    /// Pre-formatted duration from metadata resolution ("3:45", "1:02:03").
    pub duration: String,

    /// Human-formatted size of the produced artifact ("12.34 MB").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<String>,

    /// Filesystem path of the produced artifact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,

    /// Public URL under which the artifact is served.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    /// Analytics payload, attached during the analyzing phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<EnrichmentPayload>,
}

impl Job {
    /// Returns the failure message if the job failed.
    pub fn error_message(&self) -> Option<&str> {
        self.state.error_message()
    }

    /// File extension of the artifact this job produces.
    pub fn artifact_extension(&self) -> &'static str {
        if self.audio_only {
            "mp3"
        } else {
            "mp4"
        }
    }

    /// Content type of the artifact this job produces.
    pub fn artifact_content_type(&self) -> &'static str {
        if self.audio_only {
            "audio/mpeg"
        } else {
            "video/mp4"
        }
    }
}

/// Request to create a new job.
///
/// Metadata fields are snapshots from a resolution that already succeeded;
/// job creation never fetches metadata itself.
#[derive(Debug, Clone)]
pub struct CreateJobRequest {
    /// Source URL for the download.
    pub url: String,
    /// Requested quality label.
    pub quality: String,
    /// Extract audio only.
    pub audio_only: bool,
    /// Title from metadata resolution.
    pub title: String,
    /// Thumbnail URL from metadata resolution.
    pub thumbnail: String,
    /// Pre-formatted duration from metadata resolution.
    pub duration: String,
}

impl CreateJobRequest {
    /// Create a request with empty metadata fields.
    pub fn new(url: impl Into<String>, quality: impl Into<String>, audio_only: bool) -> Self {
        Self {
            url: url.into(),
            quality: quality.into(),
            audio_only,
            title: String::new(),
            thumbnail: String::new(),
            duration: String::new(),
        }
    }

    /// Attach the metadata snapshot.
    pub fn with_metadata(
        mut self,
        title: impl Into<String>,
        thumbnail: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        self.title = title.into();
        self.thumbnail = thumbnail.into();
        self.duration = duration.into();
        self
    }
}
