pub mod config;
pub mod enrichment;
pub mod export;
pub mod extractor;
pub mod format;
pub mod job;
pub mod runner;
pub mod testing;

pub use config::{load_config, load_config_from_str, Config, ConfigError};
pub use enrichment::{Enricher, EnrichmentError, SimulatedEnricher};
pub use extractor::{
    ExtractorConfig, ExtractorError, MediaExtractor, VideoMetadata, YtDlpExtractor,
};
pub use job::{
    CreateJobRequest, EnrichmentPayload, Job, JobError, JobState, JobStore, MemoryJobStore,
};
pub use runner::{JobRunner, RunnerError};
