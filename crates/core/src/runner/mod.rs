//! Runner module driving jobs through their download lifecycle.
//!
//! The `JobRunner` owns one background task per launched job. The task
//! spawns the extractor, applies capped progress updates, verifies the
//! artifact on disk, runs enrichment and walks the job to a terminal
//! state. Every mutation goes through the injected store, which enforces
//! terminal immutability and monotonic progress.

mod lifecycle;

pub use lifecycle::{JobRunner, RunnerError};
