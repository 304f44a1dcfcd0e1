//! Analytics export handlers.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use mediagrab_core::export::{analytics_csv, csv_filename, ExportFormat};

use crate::state::AppState;

/// Request body for exporting analytics
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBody {
    /// ID of the download whose analytics to export
    #[serde(default)]
    pub download_id: Option<String>,
    /// Export format ("csv" or "pdf")
    #[serde(default)]
    pub format: Option<String>,
}

/// Placeholder response for formats without an implementation
#[derive(Debug, Serialize)]
pub struct ExportMessage {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ExportErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<ExportErrorResponse>) {
    (
        status,
        Json(ExportErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// Export the analytics of a completed download
pub async fn export_analytics(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ExportBody>,
) -> Result<impl IntoResponse, (StatusCode, Json<ExportErrorResponse>)> {
    let job = body
        .download_id
        .as_deref()
        .and_then(|id| state.store().get(id).ok().flatten());

    // Both an unknown id and a job that has not finished analysis look the
    // same to the caller.
    let enriched = job.and_then(|job| {
        let payload = job.enrichment.clone();
        payload.map(|payload| (job, payload))
    });

    let (job, payload) = match enriched {
        Some(pair) => pair,
        None => {
            return Err(error_response(
                StatusCode::NOT_FOUND,
                "Download or analytics data not found",
            ));
        }
    };

    let format = match body.format.as_deref().and_then(ExportFormat::parse) {
        Some(format) => format,
        None => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                "Unsupported export format",
            ));
        }
    };

    match format {
        ExportFormat::Csv => {
            let csv = analytics_csv(&job, &payload);
            let headers = [
                (header::CONTENT_TYPE, "text/csv".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", csv_filename(&job.title)),
                ),
            ];
            Ok((headers, csv).into_response())
        }
        ExportFormat::Pdf => Ok(Json(ExportMessage {
            message: "PDF export is not implemented yet".to_string(),
        })
        .into_response()),
    }
}
