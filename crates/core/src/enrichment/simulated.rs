//! Simulated enricher producing plausible canned analytics.

use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::format;
use crate::job::{EngagementStats, EnrichmentPayload, Job, SentimentBreakdown};

use super::traits::Enricher;
use super::EnrichmentError;

const KEYWORD_POOL: [&str; 8] = [
    "technology",
    "tutorial",
    "programming",
    "web development",
    "javascript",
    "react",
    "coding",
    "software",
];

const TOPICS: [&str; 5] = [
    "Technology",
    "Education",
    "Programming",
    "Web Development",
    "Tutorial",
];

const TRANSCRIPT: &str = "This is a sample transcript of the video content.";

/// Enricher that sleeps for a configured delay and fabricates analytics.
pub struct SimulatedEnricher {
    delay: Duration,
}

impl SimulatedEnricher {
    /// Creates a simulated enricher with the given analysis delay.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Creates a simulated enricher with the default two second delay.
    pub fn with_defaults() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

#[async_trait]
impl Enricher for SimulatedEnricher {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn enrich(&self, job: &Job) -> Result<EnrichmentPayload, EnrichmentError> {
        debug!("Simulating analysis for job {}", job.id);
        sleep(self.delay).await;

        // ThreadRng is not Send; create it after the last await.
        let mut rng = rand::thread_rng();

        let keyword_count = rng.gen_range(3..=6);
        let keywords = KEYWORD_POOL
            .iter()
            .take(keyword_count)
            .map(|k| k.to_string())
            .collect();

        Ok(EnrichmentPayload {
            sentiment: SentimentBreakdown {
                positive: rng.gen_range(50..90),
                negative: rng.gen_range(5..25),
                neutral: rng.gen_range(20..50),
            },
            keywords,
            transcript: TRANSCRIPT.to_string(),
            engagement: EngagementStats {
                likes: format::compact_count(rng.gen_range(0..100_000)),
                views: format::compact_count(rng.gen_range(0..1_000_000)),
                comments: format::compact_count(rng.gen_range(0..10_000)),
                shares: format::compact_count(rng.gen_range(0..1_000)),
            },
            topics: TOPICS.iter().map(|t| t.to_string()).collect(),
        })
    }
}
