//! Export of enrichment analytics to portable formats.

use crate::job::{EnrichmentPayload, Job};

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values.
    Csv,
    /// PDF, accepted on the wire but not implemented.
    Pdf,
}

impl ExportFormat {
    /// Parses a wire format label.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "csv" => Some(Self::Csv),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Returns the wire label for this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "pdf",
        }
    }
}

/// Renders the analytics payload of a job as a CSV document.
///
/// One `Metric,Value` row per line; free-text and list values are quoted.
pub fn analytics_csv(job: &Job, payload: &EnrichmentPayload) -> String {
    let mut csv = String::from("Metric,Value\n");
    csv.push_str(&format!("Title,\"{}\"\n", job.title));
    csv.push_str(&format!("Duration,{}\n", job.duration));
    csv.push_str(&format!("Quality,{}\n", job.quality));
    csv.push_str(&format!(
        "Positive Sentiment,{}%\n",
        payload.sentiment.positive
    ));
    csv.push_str(&format!(
        "Negative Sentiment,{}%\n",
        payload.sentiment.negative
    ));
    csv.push_str(&format!(
        "Neutral Sentiment,{}%\n",
        payload.sentiment.neutral
    ));
    csv.push_str(&format!("Keywords,\"{}\"\n", payload.keywords.join(", ")));
    csv.push_str(&format!("Topics,\"{}\"\n", payload.topics.join(", ")));
    csv.push_str(&format!("Likes,{}\n", payload.engagement.likes));
    csv.push_str(&format!("Views,{}\n", payload.engagement.views));
    csv.push_str(&format!("Comments,{}\n", payload.engagement.comments));
    csv.push_str(&format!("Shares,{}\n", payload.engagement.shares));
    csv
}

/// File name offered for a CSV download of a job's analytics.
pub fn csv_filename(title: &str) -> String {
    format!("{}_analytics.csv", title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{EngagementStats, JobState, SentimentBreakdown};
    use chrono::Utc;

    fn enriched_job() -> (Job, EnrichmentPayload) {
        let payload = EnrichmentPayload {
            sentiment: SentimentBreakdown {
                positive: 72,
                negative: 11,
                neutral: 17,
            },
            keywords: vec!["technology".to_string(), "tutorial".to_string()],
            transcript: "This is a sample transcript of the video content.".to_string(),
            engagement: EngagementStats {
                likes: "4.2K".to_string(),
                views: "891.0K".to_string(),
                comments: "312".to_string(),
                shares: "87".to_string(),
            },
            topics: vec!["Technology".to_string(), "Education".to_string()],
        };

        let job = Job {
            id: "job-1".to_string(),
            url: "https://example.com/v".to_string(),
            quality: "720p".to_string(),
            audio_only: false,
            state: JobState::Completed,
            progress: 100.0,
            created_at: Utc::now(),
            title: "Learning Rust".to_string(),
            thumbnail: String::new(),
            duration: "12:34".to_string(),
            file_size: Some("10.5 MB".to_string()),
            file_path: None,
            download_url: None,
            enrichment: Some(payload.clone()),
        };

        (job, payload)
    }

    #[test]
    fn test_analytics_csv_layout() {
        let (job, payload) = enriched_job();
        let csv = analytics_csv(&job, &payload);

        let expected = "\
Metric,Value
Title,\"Learning Rust\"
Duration,12:34
Quality,720p
Positive Sentiment,72%
Negative Sentiment,11%
Neutral Sentiment,17%
Keywords,\"technology, tutorial\"
Topics,\"Technology, Education\"
Likes,4.2K
Views,891.0K
Comments,312
Shares,87
";
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!(ExportFormat::parse("csv"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::parse("pdf"), Some(ExportFormat::Pdf));
        assert_eq!(ExportFormat::parse("xlsx"), None);
        assert_eq!(ExportFormat::parse(""), None);
    }

    #[test]
    fn test_export_format_labels() {
        assert_eq!(ExportFormat::Csv.as_str(), "csv");
        assert_eq!(ExportFormat::Pdf.as_str(), "pdf");
    }

    #[test]
    fn test_csv_filename() {
        assert_eq!(csv_filename("Learning Rust"), "Learning Rust_analytics.csv");
    }
}
