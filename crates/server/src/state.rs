use std::path::{Path, PathBuf};
use std::sync::Arc;

use mediagrab_core::{JobRunner, JobStore, MediaExtractor};

/// Shared application state
pub struct AppState {
    store: Arc<dyn JobStore>,
    extractor: Arc<dyn MediaExtractor>,
    runner: Arc<JobRunner>,
    downloads_dir: PathBuf,
}

impl AppState {
    pub fn new(
        store: Arc<dyn JobStore>,
        extractor: Arc<dyn MediaExtractor>,
        runner: Arc<JobRunner>,
        downloads_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            extractor,
            runner,
            downloads_dir,
        }
    }

    pub fn store(&self) -> &dyn JobStore {
        self.store.as_ref()
    }

    pub fn extractor(&self) -> &dyn MediaExtractor {
        self.extractor.as_ref()
    }

    pub fn runner(&self) -> &JobRunner {
        &self.runner
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }
}
