//! Metadata types produced by probing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Video frame dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Coarse quality tier derived from frame height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    #[serde(rename = "SD")]
    Sd,
    #[serde(rename = "HD")]
    Hd,
    #[serde(rename = "FullHD")]
    FullHd,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl QualityTier {
    /// Map a frame height to its tier. Thresholds are evaluated in
    /// descending order, highest match wins.
    pub fn from_height(height: u32) -> Self {
        if height >= 2160 {
            Self::FourK
        } else if height >= 1440 {
            Self::TwoK
        } else if height >= 1080 {
            Self::FullHd
        } else if height >= 720 {
            Self::Hd
        } else {
            Self::Sd
        }
    }
}

impl std::fmt::Display for QualityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Sd => "SD",
            Self::Hd => "HD",
            Self::FullHd => "FullHD",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        };
        f.write_str(s)
    }
}

/// Partial metadata record for one video file.
///
/// Every probe-derived field is optional: absence means the probe output did
/// not contain it, which is distinct from a zero value and must flow through
/// to scoring as "unknown".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Display name of the file (caller-supplied, not the storage key).
    pub filename: String,
    /// Size on disk in bytes. Always present for a file that was read from
    /// disk, but optional in the record so scoring treats it like any other
    /// partial field.
    pub file_size_bytes: Option<u64>,
    /// Filesystem creation timestamp, if the platform reports one.
    pub created_at: Option<DateTime<Utc>>,
    /// Filesystem modification timestamp.
    pub modified_at: Option<DateTime<Utc>>,
    /// Container duration in seconds.
    pub duration_seconds: Option<f64>,
    /// Frame dimensions of the primary video stream.
    pub resolution: Option<Resolution>,
    /// Overall bit rate, normalized to Mbps.
    pub bitrate_mbps: Option<f64>,
    /// Tier derived from `resolution.height`.
    pub quality_tier: Option<QualityTier>,
}

impl VideoMetadata {
    /// Build a metadata record from filesystem facts alone, with all
    /// probe-derived fields absent.
    pub fn from_fs(path: &Path, display_name: &str) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            filename: display_name.to_string(),
            file_size_bytes: Some(meta.len()),
            created_at: meta.created().ok().map(DateTime::<Utc>::from),
            modified_at: meta.modified().ok().map(DateTime::<Utc>::from),
            duration_seconds: None,
            resolution: None,
            bitrate_mbps: None,
            quality_tier: None,
        })
    }

    /// Whether the probe contributed anything beyond filesystem facts.
    ///
    /// Size and timestamps come from `stat`, so they don't count as
    /// extracted metadata.
    pub fn has_probe_fields(&self) -> bool {
        self.duration_seconds.is_some() || self.resolution.is_some() || self.bitrate_mbps.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_boundaries() {
        assert_eq!(QualityTier::from_height(2160), QualityTier::FourK);
        assert_eq!(QualityTier::from_height(2159), QualityTier::TwoK);
        assert_eq!(QualityTier::from_height(1440), QualityTier::TwoK);
        assert_eq!(QualityTier::from_height(1439), QualityTier::FullHd);
        assert_eq!(QualityTier::from_height(1080), QualityTier::FullHd);
        assert_eq!(QualityTier::from_height(1079), QualityTier::Hd);
        assert_eq!(QualityTier::from_height(720), QualityTier::Hd);
        assert_eq!(QualityTier::from_height(719), QualityTier::Sd);
        assert_eq!(QualityTier::from_height(0), QualityTier::Sd);
    }

    #[test]
    fn tier_serializes_with_display_names() {
        assert_eq!(
            serde_json::to_string(&QualityTier::FourK).unwrap(),
            "\"4K\""
        );
        assert_eq!(
            serde_json::to_string(&QualityTier::FullHd).unwrap(),
            "\"FullHD\""
        );
    }

    #[test]
    fn resolution_display() {
        let r = Resolution {
            width: 1920,
            height: 1080,
        };
        assert_eq!(r.to_string(), "1920x1080");
    }

    #[test]
    fn from_fs_reads_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"0123456789").unwrap();

        let meta = VideoMetadata::from_fs(&path, "clip.mp4").unwrap();
        assert_eq!(meta.filename, "clip.mp4");
        assert_eq!(meta.file_size_bytes, Some(10));
        assert!(meta.modified_at.is_some());
        assert!(!meta.has_probe_fields());
    }
}
