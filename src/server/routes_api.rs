//! API route handlers: upload/analyze, file serving, tool report, health.

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use tokio_util::io::ReaderStream;

use clipcheck_av::{Frame, VideoMetadata};

use super::error::AppError;
use super::AppContext;
use crate::error::Error;
use crate::scoring::{ConfidenceLevel, QualityScore, ScoreBreakdown};

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct QualityAnalysisResponse {
    pub score: u32,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub indicators: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

impl From<QualityScore> for QualityAnalysisResponse {
    fn from(q: QualityScore) -> Self {
        Self {
            score: q.total,
            confidence: q.confidence,
            confidence_level: q.confidence_level,
            indicators: q.indicators,
            breakdown: q.breakdown,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FrameResponse {
    pub index: usize,
    pub timestamp_seconds: f64,
    /// URL path the frame can be fetched from.
    pub reference: String,
}

impl From<Frame> for FrameResponse {
    fn from(f: Frame) -> Self {
        Self {
            index: f.index,
            timestamp_seconds: f.timestamp_seconds,
            reference: format!("/api/files/{}", f.reference),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    /// Caller-supplied display name.
    pub filename: String,
    pub video_info: VideoMetadata,
    pub quality_analysis: QualityAnalysisResponse,
    pub frames: Vec<FrameResponse>,
    pub is_original_likely: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/upload
///
/// Accepts a multipart form with a `file` field, streams it to storage
/// (enforcing the size cap incrementally), runs the analysis pipeline, and
/// returns the result. The uploaded video is removed when analysis ends;
/// extracted frames are retained and served via `/api/files/{name}`.
pub async fn upload_video(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    // A multipart field borrows the stream, so it has to be consumed in
    // full inside the loop; only the finished upload escapes.
    let mut stored = None;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let claimed_name = field
            .file_name()
            .map(|s| s.to_string())
            .ok_or_else(|| Error::Validation("upload has no filename".into()))?;

        // Extension check happens before a single byte is accepted.
        let mut pending = ctx.store.begin(&claimed_name).await?;
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| Error::Validation(format!("upload stream error: {e}")))?
        {
            pending.write_chunk(&chunk).await?;
        }
        stored = Some(pending.finish().await?);
        break;
    }
    let stored = stored.ok_or_else(|| Error::Validation("missing 'file' field".into()))?;

    tracing::info!(name = %stored.original_name, key = %stored.key, bytes = %std::fs::metadata(stored.path()).map(|m| m.len()).unwrap_or(0), "upload received");

    let filename = stored.original_name.clone();
    let result = ctx.analyzer.analyze(stored, &ctx.store).await?;

    Ok(Json(UploadResponse {
        success: true,
        filename,
        video_info: result.video_info,
        quality_analysis: result.quality_analysis.into(),
        frames: result.frames.into_iter().map(FrameResponse::from).collect(),
        is_original_likely: result.is_original_likely,
    }))
}

/// GET /api/files/{filename}
///
/// Serve a stored or generated file (typically an extracted frame).
pub async fn get_file(
    State(ctx): State<AppContext>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let path = ctx.store.resolve(&filename)?;

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| Error::not_found("file", &filename))?;

    let content_type = match path.extension().and_then(|e| e.to_str()) {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    };

    let stream = ReaderStream::new(file);
    let body = Body::from_stream(stream);

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type)],
        body,
    ))
}

/// GET /api/tools
///
/// Availability report for the external tools the pipeline shells out to.
pub async fn tools_report() -> impl IntoResponse {
    let tools = tokio::task::spawn_blocking(clipcheck_av::check_tools)
        .await
        .unwrap_or_default();
    Json(tools)
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "clipcheck",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
