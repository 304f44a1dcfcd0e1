//! Enrichment module for producing post-download analytics.
//!
//! This module provides the `Enricher` trait and the simulated
//! implementation that ships today. Real analysis backends plug in by
//! implementing the trait.

mod simulated;
mod traits;

pub use simulated::SimulatedEnricher;
pub use traits::Enricher;

use thiserror::Error;

/// Errors that can occur during enrichment.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The analysis backend failed.
    #[error("Analysis failed: {reason}")]
    Failed { reason: String },
}

impl EnrichmentError {
    /// Creates a new enrichment failure.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }
}
