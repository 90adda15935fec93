//! Analysis orchestration: probe, score, and sample one uploaded clip.

use chrono::Utc;
use clipcheck_av::{Frame, FrameSampler, Prober, VideoMetadata};
use serde::Serialize;
use tracing::Instrument;

use crate::config::{AnalysisConfig, ToolsConfig};
use crate::error::{Error, Result};
use crate::scoring::{self, QualityScore};
use crate::storage::{StoredUpload, UploadStore};

/// Pipeline stages, in order. Failure is reachable from any of them and is
/// logged with a literal `failed` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Received,
    Probed,
    Scored,
    Framed,
    Done,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Stage::Received => "received",
            Stage::Probed => "probed",
            Stage::Scored => "scored",
            Stage::Framed => "framed",
            Stage::Done => "done",
        }
    }
}

/// One complete analysis outcome. Held only for the response payload,
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub video_info: VideoMetadata,
    pub quality_analysis: QualityScore,
    pub frames: Vec<Frame>,
    pub is_original_likely: bool,
}

/// Runs the probe → score → frame pipeline for uploaded clips.
#[derive(Debug, Clone)]
pub struct Analyzer {
    prober: Prober,
    sampler: FrameSampler,
    fallback_duration_secs: f64,
}

impl Analyzer {
    /// Build an analyzer from config. Tool paths fall back to PATH lookup
    /// when not configured; a missing tool only surfaces at analysis time,
    /// as probe absence or skipped frames.
    pub fn new(analysis: &AnalysisConfig, tools: &ToolsConfig) -> Self {
        let ffprobe = tools
            .ffprobe_path
            .clone()
            .unwrap_or_else(|| "ffprobe".into());
        let ffmpeg = tools.ffmpeg_path.clone().unwrap_or_else(|| "ffmpeg".into());

        Self {
            prober: Prober::new(ffprobe, analysis.probe_timeout()),
            sampler: FrameSampler::new(ffmpeg, analysis.frame_timeout(), analysis.num_frames),
            fallback_duration_secs: analysis.fallback_duration_secs,
        }
    }

    /// Analyze one stored upload.
    ///
    /// The upload is consumed: its `Drop` guard removes the video file once
    /// analysis finishes, on success and failure alike. Generated frames
    /// are written next to it and retained for serving.
    ///
    /// Fails fast with [`Error::Probe`] when metadata extraction yields
    /// nothing at all — the frame sampler is never invoked in that case.
    pub async fn analyze(&self, upload: StoredUpload, store: &UploadStore) -> Result<AnalysisResult> {
        let span = tracing::info_span!("analyze", key = %upload.key);
        self.analyze_inner(upload, store).instrument(span).await
    }

    async fn analyze_inner(
        &self,
        upload: StoredUpload,
        store: &UploadStore,
    ) -> Result<AnalysisResult> {
        tracing::debug!(stage = Stage::Received.as_str(), name = %upload.original_name, "analysis started");

        let metadata = self
            .prober
            .probe(upload.path(), &upload.original_name)
            .await?;
        if !metadata.has_probe_fields() {
            tracing::debug!(stage = "failed", "no metadata available");
            return Err(Error::Probe("no metadata available for this file".into()));
        }
        tracing::debug!(stage = Stage::Probed.as_str(), ?metadata.duration_seconds, "probe complete");

        let quality = scoring::score(&metadata, Utc::now());
        tracing::debug!(
            stage = Stage::Scored.as_str(),
            total = quality.total,
            confidence = quality.confidence,
            "scoring complete"
        );

        let duration = metadata
            .duration_seconds
            .or(Some(self.fallback_duration_secs));
        let frames = self
            .sampler
            .extract(upload.path(), duration, store.base_dir(), upload.key_stem())
            .await;
        tracing::debug!(stage = Stage::Framed.as_str(), count = frames.len(), "frames extracted");

        let is_original_likely = quality.is_original_likely();
        tracing::info!(
            stage = Stage::Done.as_str(),
            total = quality.total,
            frames = frames.len(),
            is_original_likely,
            "analysis complete"
        );

        // `upload` drops here, removing the video file on this path and on
        // every early return above.
        Ok(AnalysisResult {
            video_info: metadata,
            quality_analysis: quality,
            frames,
            is_original_likely,
        })
    }
}
