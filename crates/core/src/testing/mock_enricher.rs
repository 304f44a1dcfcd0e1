//! Mock enricher for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::enrichment::{Enricher, EnrichmentError};
use crate::job::{EnrichmentPayload, Job};

use super::fixtures;

/// Mock implementation of the `Enricher` trait.
///
/// Returns a fixed payload instantly, tracks which jobs were enriched and
/// can be primed to fail.
#[derive(Debug)]
pub struct MockEnricher {
    /// Payload returned on success.
    payload: Arc<RwLock<EnrichmentPayload>>,
    /// If set, the next enrichment will fail with this error.
    next_error: Arc<RwLock<Option<EnrichmentError>>>,
    /// Ids of jobs that were enriched.
    enriched: Arc<RwLock<Vec<String>>>,
    /// Simulated analysis delay in milliseconds.
    delay_ms: Arc<RwLock<u64>>,
}

impl Default for MockEnricher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnricher {
    /// Create a new mock enricher.
    pub fn new() -> Self {
        Self {
            payload: Arc::new(RwLock::new(fixtures::enrichment_payload())),
            next_error: Arc::new(RwLock::new(None)),
            enriched: Arc::new(RwLock::new(Vec::new())),
            delay_ms: Arc::new(RwLock::new(0)),
        }
    }

    /// Set the payload returned by successful enrichments.
    pub async fn set_payload(&self, payload: EnrichmentPayload) {
        *self.payload.write().await = payload;
    }

    /// Configure the next enrichment to fail with the given error.
    pub async fn set_next_error(&self, error: EnrichmentError) {
        *self.next_error.write().await = Some(error);
    }

    /// Set the simulated analysis delay.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay_ms.write().await = delay.as_millis() as u64;
    }

    /// Get the ids of jobs that were enriched, in order.
    pub async fn enriched_jobs(&self) -> Vec<String> {
        self.enriched.read().await.clone()
    }

    /// Get the number of enrichments performed.
    pub async fn enrich_count(&self) -> usize {
        self.enriched.read().await.len()
    }
}

#[async_trait]
impl Enricher for MockEnricher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn enrich(&self, job: &Job) -> Result<EnrichmentPayload, EnrichmentError> {
        let delay_ms = *self.delay_ms.read().await;
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.enriched.write().await.push(job.id.clone());
        Ok(self.payload.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> Job {
        fixtures::pending_job("Test Video")
    }

    #[tokio::test]
    async fn test_enrich_returns_payload_and_records() {
        let enricher = MockEnricher::new();
        let job = sample_job();

        let payload = enricher.enrich(&job).await.unwrap();
        assert_eq!(payload, fixtures::enrichment_payload());
        assert_eq!(enricher.enriched_jobs().await, vec![job.id.clone()]);
        assert_eq!(enricher.enrich_count().await, 1);
    }

    #[tokio::test]
    async fn test_error_injection_is_consumed() {
        let enricher = MockEnricher::new();
        enricher
            .set_next_error(EnrichmentError::failed("model offline"))
            .await;
        let job = sample_job();

        let err = enricher.enrich(&job).await.unwrap_err();
        assert_eq!(err.to_string(), "Analysis failed: model offline");
        assert_eq!(enricher.enrich_count().await, 0);

        assert!(enricher.enrich(&job).await.is_ok());
        assert_eq!(enricher.enrich_count().await, 1);
    }

    #[tokio::test]
    async fn test_custom_payload() {
        let enricher = MockEnricher::new();
        let mut payload = fixtures::enrichment_payload();
        payload.transcript = "A custom transcript.".to_string();
        enricher.set_payload(payload.clone()).await;

        let job = sample_job();
        let result = enricher.enrich(&job).await.unwrap();
        assert_eq!(result.transcript, "A custom transcript.");
    }
}
