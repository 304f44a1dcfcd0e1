//! Trait definitions for the enrichment module.

use async_trait::async_trait;

use crate::job::{EnrichmentPayload, Job};

use super::EnrichmentError;

/// Produces analytics for a downloaded job.
#[async_trait]
pub trait Enricher: Send + Sync {
    /// Returns the name of this enricher implementation.
    fn name(&self) -> &str;

    /// Produces an analytics payload for the given job.
    ///
    /// Called after the artifact has been downloaded and verified on disk.
    async fn enrich(&self, job: &Job) -> Result<EnrichmentPayload, EnrichmentError>;
}
