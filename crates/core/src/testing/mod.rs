//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of the external service traits,
//! allowing comprehensive E2E testing without a real extractor binary.
//!
//! # Example
//!
//! ```rust,ignore
//! use mediagrab_core::testing::{MockEnricher, MockExtractor};
//!
//! let extractor = MockExtractor::new();
//! let enricher = MockEnricher::new();
//!
//! // Configure mock responses
//! extractor.set_progress_script(vec![25.0, 50.0, 99.9]).await;
//!
//! // Use in a JobRunner / AppState...
//! ```

mod mock_enricher;
mod mock_extractor;

pub use mock_enricher::MockEnricher;
pub use mock_extractor::{MockExtractor, RecordedDownload};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::extractor::VideoMetadata;
    use crate::job::{EngagementStats, EnrichmentPayload, Job, JobState, SentimentBreakdown};

    /// Create a test metadata snapshot with reasonable defaults.
    pub fn video_metadata() -> VideoMetadata {
        VideoMetadata {
            title: "Test Video".to_string(),
            duration: "3:45".to_string(),
            views: "1.2M".to_string(),
            author: "Test Channel".to_string(),
            thumbnail: "https://i.example.com/thumb.jpg".to_string(),
            likes: "12.3K".to_string(),
            comments: "987".to_string(),
            description: "A test video.".to_string(),
            upload_date: "20240101".to_string(),
            tags: vec!["test".to_string(), "video".to_string()],
            available_qualities: vec![
                "360p".to_string(),
                "720p".to_string(),
                "1080p".to_string(),
            ],
        }
    }

    /// Create a test analytics payload with reasonable defaults.
    pub fn enrichment_payload() -> EnrichmentPayload {
        EnrichmentPayload {
            sentiment: SentimentBreakdown {
                positive: 72,
                negative: 10,
                neutral: 18,
            },
            keywords: vec![
                "technology".to_string(),
                "tutorial".to_string(),
                "programming".to_string(),
            ],
            transcript: "This is a sample transcript of the video content.".to_string(),
            engagement: EngagementStats {
                likes: "12.3K".to_string(),
                views: "1.2M".to_string(),
                comments: "987".to_string(),
                shares: "45".to_string(),
            },
            topics: vec!["Technology".to_string(), "Education".to_string()],
        }
    }

    /// Create a pending job with the given title, outside of any store.
    pub fn pending_job(title: &str) -> Job {
        Job {
            id: Uuid::new_v4().to_string(),
            url: "https://youtu.be/abc12345678".to_string(),
            quality: "720p".to_string(),
            audio_only: false,
            state: JobState::Pending,
            progress: 0.0,
            created_at: Utc::now(),
            title: title.to_string(),
            thumbnail: String::new(),
            duration: "3:45".to_string(),
            file_size: None,
            file_path: None,
            download_url: None,
            enrichment: None,
        }
    }
}
