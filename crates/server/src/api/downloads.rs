//! Download API handlers.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use mediagrab_core::{CreateJobRequest, EnrichmentPayload, Job, VideoMetadata};

use crate::state::AppState;

/// Quality label used when the caller does not send one.
const DEFAULT_QUALITY: &str = "720p";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for metadata resolution
#[derive(Debug, Deserialize)]
pub struct VideoInfoBody {
    /// Source URL to inspect
    #[serde(default)]
    pub url: Option<String>,
}

/// Request body for starting a download
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDownloadBody {
    /// Source URL to download
    #[serde(default)]
    pub url: Option<String>,
    /// Requested quality label ("360p", "720p", "1080p")
    #[serde(default)]
    pub quality: Option<String>,
    /// Extract audio only (mp3) instead of video (mp4)
    #[serde(default)]
    pub audio_only: Option<bool>,
}

/// Wire representation of a job record.
///
/// Field names and nullability match what polling clients already consume:
/// most optional fields serialize as explicit `null` until set, while
/// `downloadUrl` is absent entirely until the artifact exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    pub id: String,
    pub url: String,
    pub title: String,
    pub quality: String,
    pub audio_only: bool,
    /// State type: pending, downloading, analyzing, completed or error
    pub status: String,
    pub progress: f32,
    pub timestamp: DateTime<Utc>,
    pub thumbnail: String,
    pub duration: String,
    pub file_size: Option<String>,
    pub file_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    pub analytics_data: Option<EnrichmentPayload>,
    pub error_message: Option<String>,
}

impl From<&Job> for DownloadResponse {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            url: job.url.clone(),
            title: job.title.clone(),
            quality: job.quality.clone(),
            audio_only: job.audio_only,
            status: job.state.state_type().to_string(),
            progress: job.progress,
            timestamp: job.created_at,
            thumbnail: job.thumbnail.clone(),
            duration: job.duration.clone(),
            file_size: job.file_size.clone(),
            file_path: job.file_path.clone(),
            download_url: job.download_url.clone(),
            analytics_data: job.enrichment.clone(),
            error_message: job.error_message().map(String::from),
        }
    }
}

/// Response for starting a download
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDownloadResponse {
    pub download_id: String,
    #[serde(flatten)]
    pub download: DownloadResponse,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            error: message.into(),
        })
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Resolve metadata for a URL without creating a job
pub async fn video_info(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VideoInfoBody>,
) -> Result<Json<VideoMetadata>, impl IntoResponse> {
    let url = match body.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => url,
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("URL is required"),
            ));
        }
    };

    match state.extractor().fetch_metadata(url).await {
        Ok(metadata) => Ok(Json(metadata)),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(e.to_string()),
        )),
    }
}

/// Create a job and launch its download
pub async fn create_download(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateDownloadBody>,
) -> Result<Json<CreateDownloadResponse>, impl IntoResponse> {
    let url = match body.url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => url.to_string(),
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("URL is required"),
            ));
        }
    };

    // Metadata resolution happens before the job exists: a URL that cannot
    // be resolved never produces a record.
    let metadata = match state.extractor().fetch_metadata(&url).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!("Rejecting download, metadata resolution failed: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(e.to_string()),
            ));
        }
    };

    let quality = body
        .quality
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| DEFAULT_QUALITY.to_string());
    let audio_only = body.audio_only.unwrap_or(false);

    let request = CreateJobRequest::new(url, quality, audio_only).with_metadata(
        metadata.title,
        metadata.thumbnail,
        metadata.duration,
    );

    let job = match state.store().create(request) {
        Ok(job) => job,
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(e.to_string()),
            ));
        }
    };

    if let Err(e) = state.runner().launch(&job.id).await {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(e.to_string()),
        ));
    }

    info!("Download {} accepted for {}", job.id, job.url);

    // The snapshot taken before launch: clients always see the job begin
    // in pending regardless of how fast the runner moves it on.
    Ok(Json(CreateDownloadResponse {
        download_id: job.id.clone(),
        download: DownloadResponse::from(&job),
    }))
}

/// Get a download by ID
pub async fn get_download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DownloadResponse>, impl IntoResponse> {
    match state.store().get(&id) {
        Ok(Some(job)) => Ok(Json(DownloadResponse::from(&job))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            ErrorResponse::new("Download not found"),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(e.to_string()),
        )),
    }
}

/// List all downloads, newest first
pub async fn list_downloads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DownloadResponse>>, impl IntoResponse> {
    match state.store().list() {
        Ok(jobs) => Ok(Json(jobs.iter().map(DownloadResponse::from).collect())),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(e.to_string()),
        )),
    }
}

/// Send the produced artifact as an attachment
pub async fn fetch_artifact(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let job = match state.store().get(&id) {
        Ok(Some(job)) => job,
        Ok(None) => {
            return Err((StatusCode::NOT_FOUND, ErrorResponse::new("File not found")));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(e.to_string()),
            ));
        }
    };

    let path = match job.file_path.as_ref() {
        Some(path) => path,
        None => {
            return Err((StatusCode::NOT_FOUND, ErrorResponse::new("File not found")));
        }
    };

    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(_) => {
            return Err((
                StatusCode::NOT_FOUND,
                ErrorResponse::new("File not found on disk"),
            ));
        }
    };

    let length = match file.metadata().await {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(format!("Failed to send file: {}", e)),
            ));
        }
    };

    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download")
        .to_string();

    let stream = tokio_util::io::ReaderStream::new(file);
    let headers = [
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
        (
            header::CONTENT_TYPE,
            job.artifact_content_type().to_string(),
        ),
        (header::CONTENT_LENGTH, length.to_string()),
    ];

    Ok((headers, Body::from_stream(stream)))
}
