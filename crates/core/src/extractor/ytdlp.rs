//! yt-dlp based extractor implementation.

use async_trait::async_trait;
use regex_lite::Regex;
use serde::Deserialize;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::format;

use super::config::ExtractorConfig;
use super::error::{ExtractorError, DOWNLOAD_FALLBACK, METADATA_FALLBACK};
use super::traits::MediaExtractor;
use super::types::{DownloadOutcome, DownloadProgress, DownloadRequest, VideoMetadata};

/// Quality labels offered when the source lists no video formats.
const DEFAULT_QUALITIES: [&str; 3] = ["360p", "720p", "1080p"];

/// Maps a quality label to a yt-dlp format expression.
pub fn format_expression(quality: &str) -> &'static str {
    match quality {
        "360p" => "bestvideo[height=360][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
        "1080p" => "bestvideo[height=1080][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
        // 720p, and the fallback for unknown labels
        _ => "bestvideo[height=720][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
    }
}

/// yt-dlp based extractor implementation.
pub struct YtDlpExtractor {
    config: ExtractorConfig,
}

impl YtDlpExtractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Creates an extractor with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ExtractorConfig::default())
    }

    /// Builds yt-dlp arguments for metadata resolution.
    fn build_metadata_args(url: &str) -> Vec<String> {
        vec![
            "--dump-json".to_string(),
            "--no-download".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            url.to_string(),
        ]
    }

    /// Builds yt-dlp arguments for a download.
    fn build_download_args(request: &DownloadRequest) -> Vec<String> {
        let mut args = vec![
            "--progress".to_string(),
            "--newline".to_string(),
            "--no-playlist".to_string(),
            request.url.clone(),
            "-o".to_string(),
            request.output_path.to_string_lossy().to_string(),
        ];

        if request.audio_only {
            args.extend([
                "--extract-audio".to_string(),
                "--audio-format".to_string(),
                "mp3".to_string(),
                "--audio-quality".to_string(),
                "0".to_string(),
            ]);
        } else {
            args.extend([
                "-f".to_string(),
                format_expression(&request.quality).to_string(),
            ]);
        }

        args
    }

    /// Extracts the first percentage from a line of extractor output.
    fn capture_percent(regex: Option<&Regex>, line: &str) -> Option<f32> {
        let caps = regex?.captures(line)?;
        caps.get(1)?.as_str().parse::<f32>().ok()
    }

    /// Parses the JSON document yt-dlp prints for `--dump-json`.
    fn parse_dump_output(output: &str) -> Result<VideoMetadata, ExtractorError> {
        #[derive(Deserialize)]
        struct DumpInfo {
            title: Option<String>,
            duration: Option<f64>,
            view_count: Option<u64>,
            uploader: Option<String>,
            channel: Option<String>,
            thumbnail: Option<String>,
            like_count: Option<u64>,
            comment_count: Option<u64>,
            description: Option<String>,
            upload_date: Option<String>,
            tags: Option<Vec<String>>,
            formats: Option<Vec<DumpFormat>>,
        }

        #[derive(Deserialize)]
        struct DumpFormat {
            height: Option<u32>,
            vcodec: Option<String>,
        }

        let info: DumpInfo = serde_json::from_str(output)
            .map_err(|e| ExtractorError::parse_failed(e.to_string()))?;

        // Quality labels come from formats that carry a video stream.
        let mut qualities: Vec<String> = Vec::new();
        for format in info.formats.unwrap_or_default() {
            let height = match format.height {
                Some(h) if h > 0 => h,
                _ => continue,
            };
            if format.vcodec.as_deref() == Some("none") {
                continue;
            }
            let label = format!("{}p", height);
            if !qualities.contains(&label) {
                qualities.push(label);
            }
        }
        qualities.sort_by_key(|q| q.trim_end_matches('p').parse::<u32>().unwrap_or(0));
        if qualities.is_empty() {
            qualities = DEFAULT_QUALITIES.iter().map(|q| q.to_string()).collect();
        }

        let author = info
            .uploader
            .filter(|s| !s.is_empty())
            .or_else(|| info.channel.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| "Unknown Author".to_string());

        Ok(VideoMetadata {
            title: info
                .title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown Title".to_string()),
            duration: format::clock_duration(info.duration.unwrap_or(0.0)),
            views: format::compact_count(info.view_count.unwrap_or(0)),
            author,
            thumbnail: info.thumbnail.unwrap_or_default(),
            likes: format::compact_count(info.like_count.unwrap_or(0)),
            comments: format::compact_count(info.comment_count.unwrap_or(0)),
            description: info.description.unwrap_or_default(),
            upload_date: info.upload_date.unwrap_or_default(),
            tags: info.tags.unwrap_or_default(),
            available_qualities: qualities,
        })
    }
}

#[async_trait]
impl MediaExtractor for YtDlpExtractor {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ExtractorError> {
        let args = Self::build_metadata_args(url);

        let output = Command::new(&self.config.binary)
            .args(&args)
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractorError::BinaryNotFound {
                        path: self.config.binary.clone(),
                    }
                } else {
                    ExtractorError::Io(e)
                }
            })?;

        if !output.status.success() {
            let diagnostics = String::from_utf8_lossy(&output.stderr).to_string();
            warn!("Metadata resolution failed for {}: {}", url, diagnostics.trim());
            return Err(ExtractorError::classified(diagnostics, METADATA_FALLBACK));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Self::parse_dump_output(&stdout)
    }

    async fn download(
        &self,
        request: DownloadRequest,
        progress_tx: mpsc::Sender<DownloadProgress>,
    ) -> Result<DownloadOutcome, ExtractorError> {
        let start = Instant::now();
        let args = Self::build_download_args(&request);

        debug!("Running {} {}", self.config.binary.display(), args.join(" "));

        let mut child = Command::new(&self.config.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractorError::BinaryNotFound {
                        path: self.config.binary.clone(),
                    }
                } else {
                    ExtractorError::Io(e)
                }
            })?;

        let stdout = child.stdout.take().expect("stdout should be captured");
        let stderr = child.stderr.take().expect("stderr should be captured");

        // Accumulate stderr for failure classification after exit.
        let stderr_task = tokio::spawn(async move {
            let mut diagnostics = String::new();
            let mut reader = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = reader.next_line().await {
                debug!("yt-dlp stderr: {}", line);
                diagnostics.push_str(&line);
                diagnostics.push('\n');
            }
            diagnostics
        });

        let percent_regex = Regex::new(r"(\d+\.?\d*)%").ok();
        let mut reader = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = reader.next_line().await {
            if let Some(percent) = Self::capture_percent(percent_regex.as_ref(), &line) {
                // Non-blocking send
                let _ = progress_tx.try_send(DownloadProgress {
                    job_id: request.job_id.clone(),
                    percent,
                });
            }
        }

        let status = child.wait().await?;
        let diagnostics = stderr_task.await.unwrap_or_default();

        if !status.success() {
            warn!(
                "yt-dlp exited with code {:?} for job {}",
                status.code(),
                request.job_id
            );
            return Err(ExtractorError::classified(diagnostics, DOWNLOAD_FALLBACK));
        }

        Ok(DownloadOutcome {
            job_id: request.job_id,
            output_path: request.output_path,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ExtractorError> {
        let result = Command::new(&self.config.binary)
            .arg("--version")
            .output()
            .await;

        if let Err(e) = result {
            if e.kind() == std::io::ErrorKind::NotFound {
                return Err(ExtractorError::BinaryNotFound {
                    path: self.config.binary.clone(),
                });
            }
            return Err(ExtractorError::Io(e));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn video_request() -> DownloadRequest {
        DownloadRequest {
            job_id: "job-1".to_string(),
            url: "https://example.com/watch?v=abc".to_string(),
            quality: "1080p".to_string(),
            audio_only: false,
            output_path: PathBuf::from("/downloads/job-1_My_Video.mp4"),
        }
    }

    #[test]
    fn test_build_metadata_args() {
        let args = YtDlpExtractor::build_metadata_args("https://example.com/v");
        assert_eq!(
            args,
            vec![
                "--dump-json",
                "--no-download",
                "--no-playlist",
                "--no-warnings",
                "https://example.com/v",
            ]
        );
    }

    #[test]
    fn test_build_download_args_video() {
        let args = YtDlpExtractor::build_download_args(&video_request());
        assert_eq!(
            args,
            vec![
                "--progress",
                "--newline",
                "--no-playlist",
                "https://example.com/watch?v=abc",
                "-o",
                "/downloads/job-1_My_Video.mp4",
                "-f",
                "bestvideo[height=1080][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
            ]
        );
    }

    #[test]
    fn test_build_download_args_audio() {
        let mut request = video_request();
        request.audio_only = true;
        request.output_path = PathBuf::from("/downloads/job-1_My_Video.mp3");

        let args = YtDlpExtractor::build_download_args(&request);
        assert!(args.contains(&"--extract-audio".to_string()));
        assert!(args.contains(&"--audio-format".to_string()));
        assert!(args.contains(&"mp3".to_string()));
        assert!(args.contains(&"--audio-quality".to_string()));
        assert!(args.contains(&"0".to_string()));
        assert!(!args.contains(&"-f".to_string()));
    }

    #[test]
    fn test_build_download_args_unknown_quality_falls_back() {
        let mut request = video_request();
        request.quality = "4k".to_string();

        let args = YtDlpExtractor::build_download_args(&request);
        assert!(args.contains(
            &"bestvideo[height=720][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best".to_string()
        ));
    }

    #[test]
    fn test_format_expression() {
        assert_eq!(
            format_expression("360p"),
            "bestvideo[height=360][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"
        );
        assert_eq!(
            format_expression("720p"),
            "bestvideo[height=720][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"
        );
        assert_eq!(
            format_expression("1080p"),
            "bestvideo[height=1080][ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best"
        );
        assert_eq!(format_expression("144p"), format_expression("720p"));
    }

    #[test]
    fn test_capture_percent() {
        let regex = Regex::new(r"(\d+\.?\d*)%").ok();

        let percent = YtDlpExtractor::capture_percent(
            regex.as_ref(),
            "[download]  42.3% of 10.00MiB at 1.00MiB/s ETA 00:05",
        );
        assert_eq!(percent, Some(42.3));

        let percent =
            YtDlpExtractor::capture_percent(regex.as_ref(), "[download] 100% of 10.00MiB");
        assert_eq!(percent, Some(100.0));

        let percent = YtDlpExtractor::capture_percent(regex.as_ref(), "[download] Destination: x");
        assert_eq!(percent, None);
    }

    #[test]
    fn test_parse_dump_output_full() {
        let json = r#"{
            "title": "Learning Rust",
            "duration": 3725,
            "view_count": 1234567,
            "uploader": "Rust Channel",
            "thumbnail": "https://example.com/thumb.jpg",
            "like_count": 4500,
            "comment_count": 321,
            "description": "An introduction.",
            "upload_date": "20240115",
            "tags": ["rust", "tutorial"],
            "formats": [
                {"height": 720, "vcodec": "avc1"},
                {"height": 360, "vcodec": "avc1"},
                {"height": 720, "vcodec": "avc1"},
                {"height": null, "vcodec": "none"},
                {"height": 1080, "vcodec": "none"},
                {"height": 1080, "vcodec": "vp9"}
            ]
        }"#;

        let metadata = YtDlpExtractor::parse_dump_output(json).unwrap();
        assert_eq!(metadata.title, "Learning Rust");
        assert_eq!(metadata.duration, "1:02:05");
        assert_eq!(metadata.views, "1.2M");
        assert_eq!(metadata.author, "Rust Channel");
        assert_eq!(metadata.likes, "4.5K");
        assert_eq!(metadata.comments, "321");
        assert_eq!(metadata.upload_date, "20240115");
        assert_eq!(metadata.tags, vec!["rust", "tutorial"]);
        // Deduplicated, audio-only formats skipped, sorted ascending.
        assert_eq!(metadata.available_qualities, vec!["360p", "720p", "1080p"]);
    }

    #[test]
    fn test_parse_dump_output_defaults() {
        let metadata = YtDlpExtractor::parse_dump_output("{}").unwrap();
        assert_eq!(metadata.title, "Unknown Title");
        assert_eq!(metadata.duration, "0:00");
        assert_eq!(metadata.views, "0");
        assert_eq!(metadata.author, "Unknown Author");
        assert_eq!(metadata.thumbnail, "");
        assert_eq!(metadata.description, "");
        assert_eq!(metadata.upload_date, "");
        assert!(metadata.tags.is_empty());
        assert_eq!(metadata.available_qualities, vec!["360p", "720p", "1080p"]);
    }

    #[test]
    fn test_parse_dump_output_channel_fallback() {
        let json = r#"{"uploader": "", "channel": "Backup Channel"}"#;
        let metadata = YtDlpExtractor::parse_dump_output(json).unwrap();
        assert_eq!(metadata.author, "Backup Channel");
    }

    #[test]
    fn test_parse_dump_output_invalid_json() {
        let err = YtDlpExtractor::parse_dump_output("not json").unwrap_err();
        assert!(matches!(err, ExtractorError::ParseFailed { .. }));
        assert_eq!(err.to_string(), "Failed to parse video info");
    }
}
