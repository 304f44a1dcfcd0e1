//! Extractor module for resolving and downloading media from URLs.
//!
//! This module provides the `MediaExtractor` trait and the yt-dlp backed
//! implementation used in production.
//!
//! # Features
//!
//! - Metadata resolution without downloading (`--dump-json`)
//! - Video downloads with quality selection, audio-only extraction to MP3
//! - Progress reporting parsed from the extractor's output
//! - Failure classification from captured diagnostics
//!
//! # Example
//!
//! ```ignore
//! use mediagrab_core::extractor::{MediaExtractor, YtDlpExtractor};
//!
//! let extractor = YtDlpExtractor::with_defaults();
//!
//! // Check yt-dlp is available
//! extractor.validate().await?;
//!
//! let metadata = extractor.fetch_metadata("https://example.com/watch?v=abc").await?;
//! println!("{} ({})", metadata.title, metadata.duration);
//! ```

mod config;
mod error;
mod traits;
mod types;
mod ytdlp;

pub use config::ExtractorConfig;
pub use error::{
    classify_diagnostics, ExtractorError, FailureKind, ACCESS_DENIED_MESSAGE,
    CONTENT_UNAVAILABLE_MESSAGE, DOWNLOAD_FALLBACK, METADATA_FALLBACK,
};
pub use traits::MediaExtractor;
pub use types::{DownloadOutcome, DownloadProgress, DownloadRequest, VideoMetadata};
pub use ytdlp::{format_expression, YtDlpExtractor};
