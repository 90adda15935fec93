//! Still-frame extraction at evenly spaced timestamps.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::command::ToolCommand;

/// Number of frames extracted per clip unless configured otherwise.
pub const DEFAULT_NUM_FRAMES: usize = 6;

/// Duration assumed when probing couldn't determine one.
pub const DEFAULT_DURATION_SECS: f64 = 60.0;

/// Thumbnail scale passed to the extraction tool.
const FRAME_SCALE: &str = "scale=320:180";

/// One extracted thumbnail.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// Position in the requested sequence (0-based).
    pub index: usize,
    /// Seek position the frame was taken at.
    pub timestamp_seconds: f64,
    /// File name of the generated image, relative to the output directory.
    pub reference: String,
}

/// Compute `n` evenly spaced interior timestamps for a clip.
///
/// `t_i = i * duration / (n + 1)` for `i = 1..=n` — strictly interior, so
/// neither 0 nor the full duration is ever sampled (both tend to produce
/// black frames at container boundaries).
pub fn sample_timestamps(duration: f64, n: usize) -> Vec<f64> {
    (1..=n).map(|i| i as f64 * duration / (n + 1) as f64).collect()
}

/// Extracts thumbnails from video files via the frame-extraction tool.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    ffmpeg: PathBuf,
    timeout: Duration,
    num_frames: usize,
}

impl FrameSampler {
    /// Create a sampler using the given ffmpeg binary path.
    pub fn new(ffmpeg: PathBuf, timeout: Duration, num_frames: usize) -> Self {
        Self {
            ffmpeg,
            timeout,
            num_frames,
        }
    }

    /// Extract up to `num_frames` thumbnails from `source` into `out_dir`.
    ///
    /// Output files are named `{key}_frame_{index}.jpg`. A frame that fails
    /// to extract is logged and skipped — the batch is never aborted and
    /// failures are not retried, so the result may be shorter than
    /// `num_frames`. Order follows the timestamps.
    pub async fn extract(
        &self,
        source: &Path,
        duration_seconds: Option<f64>,
        out_dir: &Path,
        key: &str,
    ) -> Vec<Frame> {
        let duration = duration_seconds
            .filter(|d| d.is_finite() && *d > 0.0)
            .unwrap_or(DEFAULT_DURATION_SECS);

        let mut frames = Vec::with_capacity(self.num_frames);

        for (index, timestamp) in sample_timestamps(duration, self.num_frames)
            .into_iter()
            .enumerate()
        {
            let reference = format!("{key}_frame_{index}.jpg");
            let out_path = out_dir.join(&reference);

            let result = ToolCommand::new(self.ffmpeg.clone())
                .arg("-ss")
                .arg(format!("{timestamp:.3}"))
                .arg("-i")
                .arg(source.to_string_lossy())
                .arg("-vframes")
                .arg("1")
                .arg("-vf")
                .arg(FRAME_SCALE)
                .arg("-y")
                .arg(out_path.to_string_lossy())
                .timeout(self.timeout)
                .execute()
                .await;

            match result {
                Ok(_) if out_path.exists() => {
                    frames.push(Frame {
                        index,
                        timestamp_seconds: timestamp,
                        reference,
                    });
                }
                Ok(_) => {
                    tracing::warn!(
                        index,
                        timestamp,
                        "frame extraction produced no output file; skipping"
                    );
                }
                Err(e) => {
                    tracing::warn!(index, timestamp, error = %e, "frame extraction failed; skipping");
                }
            }
        }

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_are_interior_and_even() {
        let ts = sample_timestamps(70.0, 6);
        assert_eq!(ts, vec![10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
        assert!(ts.iter().all(|t| *t > 0.0 && *t < 70.0));
    }

    #[test]
    fn timestamps_for_single_frame() {
        assert_eq!(sample_timestamps(10.0, 1), vec![5.0]);
    }

    #[test]
    fn timestamps_for_zero_frames() {
        assert!(sample_timestamps(60.0, 0).is_empty());
    }

    #[test]
    fn timestamps_preserve_order() {
        let ts = sample_timestamps(123.4, 6);
        assert_eq!(ts.len(), 6);
        assert!(ts.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn failed_extraction_skips_frames() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("clip.mp4");
        std::fs::write(&source, b"not a real video").unwrap();

        let sampler = FrameSampler::new(
            PathBuf::from("nonexistent_extract_tool_12345"),
            Duration::from_secs(1),
            3,
        );
        let frames = sampler
            .extract(&source, Some(30.0), dir.path(), "abc")
            .await;
        assert!(frames.is_empty());
    }
}
