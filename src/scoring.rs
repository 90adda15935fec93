//! Heuristic quality/authenticity scoring over probed metadata.
//!
//! Four independent criteria (resolution, bitrate, age, file size) each
//! contribute a bounded sub-score; the capped sum maps to a confidence
//! bucket. Each criterion is evaluated only when its input field is present:
//! an absent field contributes 0 points and emits no indicator, so the score
//! degrades gracefully on sparse metadata.
//!
//! This is a bounded heuristic, not a forensic determination of provenance.

use chrono::{DateTime, Utc};
use clipcheck_av::VideoMetadata;
use serde::Serialize;

/// Score threshold above which a clip is flagged as likely original.
pub const ORIGINAL_LIKELY_THRESHOLD: u32 = 70;

/// Coarse confidence bucket derived from the total score. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Indicator polarity marker prefixes.
const POSITIVE: &str = "+";
const WARNING: &str = "!";
const NEGATIVE: &str = "-";

/// Per-criterion sub-scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    /// Resolution contribution, 0..=40.
    pub resolution_points: u32,
    /// Bitrate contribution, 0..=35.
    pub bitrate_points: u32,
    /// File-age contribution, 0..=15.
    pub age_points: u32,
    /// File-size contribution, 0..=10.
    pub filesize_points: u32,
}

/// Full scoring result for one metadata record.
#[derive(Debug, Clone, Serialize)]
pub struct QualityScore {
    /// Capped sum of the sub-scores, 0..=100.
    pub total: u32,
    /// Numeric confidence in {0.40, 0.60, 0.80, 0.95}.
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    /// One entry per evaluated criterion, in the fixed order
    /// resolution, bitrate, age, file size. Stable display contract.
    pub indicators: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

impl QualityScore {
    /// Whether the score clears the "likely original" bar.
    pub fn is_original_likely(&self) -> bool {
        self.total >= ORIGINAL_LIKELY_THRESHOLD
    }
}

/// Score a metadata record against the heuristic criteria.
///
/// `now` is passed in so age scoring is deterministic under test.
pub fn score(metadata: &VideoMetadata, now: DateTime<Utc>) -> QualityScore {
    let mut breakdown = ScoreBreakdown::default();
    let mut indicators = Vec::with_capacity(4);

    // Criterion order is a stable contract: resolution, bitrate, age, size.
    if let Some(res) = metadata.resolution {
        let (points, indicator) = score_resolution(res.height);
        breakdown.resolution_points = points;
        indicators.push(indicator);
    }

    if let Some(mbps) = metadata.bitrate_mbps {
        let (points, indicator) = score_bitrate(mbps);
        breakdown.bitrate_points = points;
        indicators.push(indicator);
    }

    if let Some(created_at) = metadata.created_at {
        let age_days = (now - created_at).num_days();
        let (points, indicator) = score_age(age_days);
        breakdown.age_points = points;
        indicators.push(indicator);
    }

    if let Some(bytes) = metadata.file_size_bytes {
        let size_mb = bytes as f64 / (1024.0 * 1024.0);
        let (points, indicator) = score_filesize(size_mb);
        breakdown.filesize_points = points;
        indicators.push(indicator);
    }

    let sum = breakdown.resolution_points
        + breakdown.bitrate_points
        + breakdown.age_points
        + breakdown.filesize_points;
    let total = sum.min(100);

    let (confidence, confidence_level) = confidence_for(total);

    QualityScore {
        total,
        confidence,
        confidence_level,
        indicators,
        breakdown,
    }
}

fn score_resolution(height: u32) -> (u32, String) {
    let (points, marker, label) = if height >= 2160 {
        (40, POSITIVE, "4K")
    } else if height >= 1440 {
        (35, POSITIVE, "2K")
    } else if height >= 1080 {
        (25, POSITIVE, "FullHD")
    } else if height >= 720 {
        (15, WARNING, "HD")
    } else {
        (5, NEGATIVE, "SD")
    };
    (points, format!("{marker} resolution {height}p ({label})"))
}

fn score_bitrate(mbps: f64) -> (u32, String) {
    let (points, marker) = if mbps >= 50.0 {
        (35, POSITIVE)
    } else if mbps >= 20.0 {
        (25, POSITIVE)
    } else if mbps >= 10.0 {
        (15, WARNING)
    } else if mbps >= 5.0 {
        (8, WARNING)
    } else {
        (3, NEGATIVE)
    };
    (points, format!("{marker} bitrate {mbps:.2} Mbps"))
}

fn score_age(age_days: i64) -> (u32, String) {
    let (points, marker) = if age_days > 365 {
        (15, POSITIVE)
    } else if age_days > 180 {
        (10, POSITIVE)
    } else if age_days > 30 {
        (5, WARNING)
    } else {
        (2, NEGATIVE)
    };
    (points, format!("{marker} file age {age_days} days"))
}

fn score_filesize(size_mb: f64) -> (u32, String) {
    let (points, marker) = if size_mb > 500.0 {
        (10, POSITIVE)
    } else if size_mb > 100.0 {
        (7, POSITIVE)
    } else if size_mb > 50.0 {
        (4, WARNING)
    } else {
        (1, NEGATIVE)
    };
    (points, format!("{marker} file size {size_mb:.1} MB"))
}

fn confidence_for(total: u32) -> (f64, ConfidenceLevel) {
    if total >= 85 {
        (0.95, ConfidenceLevel::VeryHigh)
    } else if total >= 70 {
        (0.80, ConfidenceLevel::High)
    } else if total >= 50 {
        (0.60, ConfidenceLevel::Medium)
    } else {
        (0.40, ConfidenceLevel::Low)
    }
}
