//! Media probing: invoke the probe tool and assemble a metadata record.
//!
//! The adapter contract is that absence of metadata is a valid terminal
//! outcome, not an error: a missing tool, a timeout, or a non-zero exit all
//! degrade to "no probe output" and the caller decides what that means.

pub mod parser;
pub mod types;

pub use parser::{normalize_bitrate, parse_probe_output, ProbeFields};
pub use types::{QualityTier, Resolution, VideoMetadata};

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::ToolCommand;
use crate::Result;

/// Invokes the probe tool against media files.
#[derive(Debug, Clone)]
pub struct Prober {
    ffprobe: PathBuf,
    timeout: Duration,
}

impl Prober {
    /// Create a prober using the given ffprobe binary path.
    pub fn new(ffprobe: PathBuf, timeout: Duration) -> Self {
        Self { ffprobe, timeout }
    }

    /// Run the probe tool and return its raw output, or `None` when no
    /// metadata is available (tool missing, timeout, non-zero exit).
    pub async fn probe_raw(&self, path: &Path) -> Option<String> {
        let result = ToolCommand::new(self.ffprobe.clone())
            .arg("-v")
            .arg("error")
            .arg("-print_format")
            .arg("json")
            .arg("-show_format")
            .arg("-show_streams")
            .arg(path.to_string_lossy())
            .timeout(self.timeout)
            .execute()
            .await;

        match result {
            Ok(output) => Some(output.stdout),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "probe yielded no metadata");
                None
            }
        }
    }

    /// Probe a file and assemble its [`VideoMetadata`].
    ///
    /// Filesystem facts (size, timestamps) are always populated; the
    /// probe-derived fields stay `None` when the tool produced nothing or
    /// its output didn't contain them.
    pub async fn probe(&self, path: &Path, display_name: &str) -> Result<VideoMetadata> {
        let mut meta = VideoMetadata::from_fs(path, display_name)?;

        if let Some(raw) = self.probe_raw(path).await {
            let fields = parse_probe_output(&raw);
            meta.duration_seconds = fields.duration_seconds;
            meta.resolution = fields.resolution;
            meta.bitrate_mbps = fields.bitrate_mbps;
            meta.quality_tier = fields.resolution.map(|r| QualityTier::from_height(r.height));
        }

        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_tool_degrades_to_none() {
        let prober = Prober::new(
            PathBuf::from("nonexistent_probe_tool_12345"),
            Duration::from_secs(1),
        );
        let raw = prober.probe_raw(Path::new("/tmp/whatever.mp4")).await;
        assert!(raw.is_none());
    }

    #[tokio::test]
    async fn probe_of_unreadable_file_keeps_fs_facts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"not a real video").unwrap();

        let prober = Prober::new(
            PathBuf::from("nonexistent_probe_tool_12345"),
            Duration::from_secs(1),
        );
        let meta = prober.probe(&path, "clip.mp4").await.unwrap();
        assert_eq!(meta.file_size_bytes, Some(16));
        assert!(!meta.has_probe_fields());
        assert!(meta.quality_tier.is_none());
    }
}
