//! Error types and failure classification for the extractor module.

use std::path::PathBuf;
use thiserror::Error;

/// User-facing message when the source refuses access.
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied: Video may be private or restricted";

/// User-facing message when the content is missing or partially removed.
pub const CONTENT_UNAVAILABLE_MESSAGE: &str =
    "Video fragments unavailable: The video may be private or removed";

/// Fallback message for unclassified metadata failures.
pub const METADATA_FALLBACK: &str = "Failed to get video info";

/// Fallback message for unclassified download failures.
pub const DOWNLOAD_FALLBACK: &str = "Failed to download video";

/// Broad classification of an extractor failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The source refused access (HTTP 403 and similar).
    AccessDenied,
    /// The content is gone or its fragments cannot be fetched.
    ContentUnavailable,
    /// Anything that cannot be classified further.
    Other,
}

impl FailureKind {
    /// Returns the user-facing message for this kind.
    ///
    /// Unclassified failures use the operation-specific fallback so metadata
    /// and download errors read differently.
    pub fn message(&self, fallback: &'static str) -> &'static str {
        match self {
            Self::AccessDenied => ACCESS_DENIED_MESSAGE,
            Self::ContentUnavailable => CONTENT_UNAVAILABLE_MESSAGE,
            Self::Other => fallback,
        }
    }
}

/// Classifies raw diagnostics from the extractor into a failure kind.
///
/// Looks for the markers yt-dlp prints on its error stream. Anything
/// without a known marker classifies as [`FailureKind::Other`].
pub fn classify_diagnostics(diagnostics: &str) -> FailureKind {
    if diagnostics.contains("HTTP Error 403") {
        FailureKind::AccessDenied
    } else if diagnostics.contains("fragment not found") {
        FailureKind::ContentUnavailable
    } else {
        FailureKind::Other
    }
}

/// Errors that can occur during metadata resolution or download.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// Extractor binary not found.
    #[error("Extractor not found at path: {path}")]
    BinaryNotFound { path: PathBuf },

    /// The extractor process ran but failed.
    #[error("{message}")]
    ExtractionFailed {
        /// User-facing message, already classified.
        message: String,
        /// Classification the message was derived from.
        kind: FailureKind,
        /// Raw diagnostics captured from the process, for logging.
        diagnostics: Option<String>,
    },

    /// The extractor produced output that could not be parsed.
    ///
    /// The underlying reason is kept for logs; the display message stays
    /// generic so raw parser noise never reaches clients.
    #[error("Failed to parse video info")]
    ParseFailed { reason: String },

    /// I/O error while running the extractor process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractorError {
    /// Creates an extraction failure classified from captured diagnostics.
    pub fn classified(diagnostics: String, fallback: &'static str) -> Self {
        let kind = classify_diagnostics(&diagnostics);
        Self::ExtractionFailed {
            message: kind.message(fallback).to_string(),
            kind,
            diagnostics: if diagnostics.is_empty() {
                None
            } else {
                Some(diagnostics)
            },
        }
    }

    /// Creates a parse failure, keeping the underlying reason for logs.
    pub fn parse_failed(reason: impl Into<String>) -> Self {
        Self::ParseFailed {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_access_denied() {
        let diagnostics = "ERROR: unable to download video data: HTTP Error 403: Forbidden";
        assert_eq!(classify_diagnostics(diagnostics), FailureKind::AccessDenied);
    }

    #[test]
    fn test_classify_content_unavailable() {
        let diagnostics = "ERROR: fragment not found; skipping fragment 3";
        assert_eq!(
            classify_diagnostics(diagnostics),
            FailureKind::ContentUnavailable
        );
    }

    #[test]
    fn test_classify_unknown_output() {
        assert_eq!(
            classify_diagnostics("ERROR: something exploded"),
            FailureKind::Other
        );
        assert_eq!(classify_diagnostics(""), FailureKind::Other);
    }

    #[test]
    fn test_classify_marker_in_longer_output() {
        let diagnostics = "\
[youtube] abc123: Downloading webpage
WARNING: retrying
ERROR: unable to download video data: HTTP Error 403: Forbidden
";
        assert_eq!(classify_diagnostics(diagnostics), FailureKind::AccessDenied);
    }

    #[test]
    fn test_failure_kind_messages() {
        assert_eq!(
            FailureKind::AccessDenied.message(DOWNLOAD_FALLBACK),
            ACCESS_DENIED_MESSAGE
        );
        assert_eq!(
            FailureKind::ContentUnavailable.message(DOWNLOAD_FALLBACK),
            CONTENT_UNAVAILABLE_MESSAGE
        );
        assert_eq!(FailureKind::Other.message(DOWNLOAD_FALLBACK), DOWNLOAD_FALLBACK);
        assert_eq!(FailureKind::Other.message(METADATA_FALLBACK), METADATA_FALLBACK);
    }

    #[test]
    fn test_classified_constructor_keeps_diagnostics() {
        let err = ExtractorError::classified(
            "HTTP Error 403: Forbidden".to_string(),
            DOWNLOAD_FALLBACK,
        );
        match err {
            ExtractorError::ExtractionFailed {
                message,
                kind,
                diagnostics,
            } => {
                assert_eq!(message, ACCESS_DENIED_MESSAGE);
                assert_eq!(kind, FailureKind::AccessDenied);
                assert_eq!(diagnostics.as_deref(), Some("HTTP Error 403: Forbidden"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_classified_constructor_empty_diagnostics() {
        let err = ExtractorError::classified(String::new(), METADATA_FALLBACK);
        match err {
            ExtractorError::ExtractionFailed {
                message,
                kind,
                diagnostics,
            } => {
                assert_eq!(message, METADATA_FALLBACK);
                assert_eq!(kind, FailureKind::Other);
                assert!(diagnostics.is_none());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_failed_display_is_generic() {
        let err = ExtractorError::parse_failed("expected value at line 1");
        assert_eq!(err.to_string(), "Failed to parse video info");
    }
}
