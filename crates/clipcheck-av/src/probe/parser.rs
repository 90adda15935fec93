//! Tolerant field extraction from raw probe output.
//!
//! The probe tool's output is treated as loosely structured text: each field
//! is located independently with a pattern search, so a missing or mangled
//! field never prevents extraction of the others. This matches tools that
//! emit the fields as substrings inside larger JSON or free-form output.

use regex::Regex;
use std::sync::LazyLock;

use super::types::Resolution;

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""duration"\s*:\s*"?([0-9]+(?:\.[0-9]+)?)"#).unwrap());
static WIDTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""width"\s*:\s*(\d+)"#).unwrap());
static HEIGHT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""height"\s*:\s*(\d+)"#).unwrap());
static BIT_RATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""bit_rate"\s*:\s*"?([0-9]+(?:\.[0-9]+)?)\s*([kK])?"#).unwrap());

/// Probe-derived fields, each extracted independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeFields {
    pub duration_seconds: Option<f64>,
    pub resolution: Option<Resolution>,
    pub bitrate_mbps: Option<f64>,
}

/// Extract the fields clipcheck cares about from raw probe text.
pub fn parse_probe_output(raw: &str) -> ProbeFields {
    let duration_seconds = DURATION_RE
        .captures(raw)
        .and_then(|c| c[1].parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d >= 0.0);

    let width = WIDTH_RE.captures(raw).and_then(|c| c[1].parse::<u32>().ok());
    let height = HEIGHT_RE
        .captures(raw)
        .and_then(|c| c[1].parse::<u32>().ok());
    let resolution = match (width, height) {
        (Some(width), Some(height)) => Some(Resolution { width, height }),
        _ => None,
    };

    let bitrate_mbps = BIT_RATE_RE.captures(raw).and_then(|c| {
        let value = c[1].parse::<f64>().ok()?;
        let k_marker = c.get(2).is_some();
        normalize_bitrate(value, k_marker)
    });

    ProbeFields {
        duration_seconds,
        resolution,
        bitrate_mbps,
    }
}

/// Normalize a raw bit-rate value to Mbps.
///
/// Probe tools report bit rate as bits/sec, kbps, or pre-formatted Mbps, so
/// the unit has to be guessed from magnitude: values over 1000 are taken as
/// bits/sec, values over 1 with an explicit `k` marker as kbps, anything
/// else as Mbps already. This is a known approximation — a bare "8000"
/// normalizes to 0.008 Mbps even if the source meant kbps. Values near 1000
/// are inherently ambiguous; kept as-is deliberately.
pub fn normalize_bitrate(value: f64, k_marker: bool) -> Option<f64> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    if value > 1000.0 {
        Some(value / 1_000_000.0)
    } else if value > 1.0 && k_marker {
        Some(value / 1_000.0)
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FFPROBE_JSON: &str = r#"{
        "streams": [
            {
                "index": 0,
                "codec_type": "video",
                "codec_name": "h264",
                "width": 1920,
                "height": 1080
            }
        ],
        "format": {
            "filename": "clip.mp4",
            "duration": "70.500000",
            "bit_rate": "8000000"
        }
    }"#;

    #[test]
    fn extracts_all_fields() {
        let fields = parse_probe_output(FFPROBE_JSON);
        assert_eq!(fields.duration_seconds, Some(70.5));
        assert_eq!(
            fields.resolution,
            Some(Resolution {
                width: 1920,
                height: 1080
            })
        );
        assert_eq!(fields.bitrate_mbps, Some(8.0));
    }

    #[test]
    fn missing_fields_are_independent() {
        let fields = parse_probe_output(r#"{"format": {"duration": "12.0"}}"#);
        assert_eq!(fields.duration_seconds, Some(12.0));
        assert_eq!(fields.resolution, None);
        assert_eq!(fields.bitrate_mbps, None);
    }

    #[test]
    fn width_without_height_yields_no_resolution() {
        let fields = parse_probe_output(r#"{"width": 1280}"#);
        assert_eq!(fields.resolution, None);
    }

    #[test]
    fn garbage_yields_empty_fields() {
        let fields = parse_probe_output("not metadata at all");
        assert_eq!(fields, ProbeFields::default());
    }

    #[test]
    fn unquoted_duration_is_accepted() {
        let fields = parse_probe_output(r#""duration": 42.25"#);
        assert_eq!(fields.duration_seconds, Some(42.25));
    }

    #[test]
    fn bitrate_bits_per_sec() {
        // 50 Mbps reported as bits/sec.
        assert_eq!(normalize_bitrate(50_000_000.0, false), Some(50.0));
    }

    #[test]
    fn bitrate_kbps_with_marker() {
        assert_eq!(normalize_bitrate(800.0, true), Some(0.8));
    }

    #[test]
    fn bitrate_already_mbps() {
        assert_eq!(normalize_bitrate(0.9, false), Some(0.9));
        assert_eq!(normalize_bitrate(0.9, true), Some(0.9));
    }

    #[test]
    fn bitrate_magnitude_heuristic_limitation() {
        // A bare "8000" (no k marker) is taken as bits/sec. Documented
        // limitation of the magnitude guess.
        assert_eq!(normalize_bitrate(8000.0, false), Some(0.008));
        // With a k marker the >1000 rule still wins.
        assert_eq!(normalize_bitrate(8000.0, true), Some(0.008));
    }

    #[test]
    fn bitrate_k_marker_in_text() {
        let fields = parse_probe_output(r#""bit_rate": "800k""#);
        assert_eq!(fields.bitrate_mbps, Some(0.8));
    }

    #[test]
    fn negative_bitrate_rejected() {
        assert_eq!(normalize_bitrate(-5.0, false), None);
    }
}
