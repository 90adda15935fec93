//! Application configuration types.
//!
//! Every section defaults sensibly so running without a config file works
//! out of the box.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub analysis: AnalysisConfig,
    pub tools: ToolsConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Optional directory with a bundled UI, served as a fallback.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            static_dir: None,
        }
    }
}

/// Upload storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory uploads and generated frames are written to.
    pub upload_dir: PathBuf,
    /// Upload size cap in megabytes, enforced while streaming.
    pub max_upload_mb: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./data/uploads"),
            max_upload_mb: 100,
        }
    }
}

impl StorageConfig {
    /// Cap in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb * 1024 * 1024
    }
}

/// Analysis pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Target number of thumbnails per clip.
    pub num_frames: usize,
    /// Hard timeout for one probe invocation.
    pub probe_timeout_secs: u64,
    /// Hard timeout for one frame extraction.
    pub frame_timeout_secs: u64,
    /// Duration assumed when probing couldn't determine one.
    pub fallback_duration_secs: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            num_frames: clipcheck_av::DEFAULT_NUM_FRAMES,
            probe_timeout_secs: 30,
            frame_timeout_secs: 30,
            fallback_duration_secs: clipcheck_av::DEFAULT_DURATION_SECS,
        }
    }
}

impl AnalysisConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn frame_timeout(&self) -> Duration {
        Duration::from_secs(self.frame_timeout_secs)
    }
}

/// Paths to external CLI tools. Unset entries fall back to PATH lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffprobe_path: Option<PathBuf>,
    pub ffmpeg_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = Config::default();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.storage.max_upload_mb, 100);
        assert_eq!(cfg.storage.max_upload_bytes(), 100 * 1024 * 1024);
        assert_eq!(cfg.analysis.num_frames, 6);
        assert_eq!(cfg.analysis.probe_timeout(), Duration::from_secs(30));
        assert!(cfg.tools.ffprobe_path.is_none());
    }
}
