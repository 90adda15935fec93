//! # clipcheck-av
//!
//! External media tool plumbing for clipcheck.
//!
//! This crate provides:
//!
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support for running external processes.
//! - **Tool discovery** ([`check_tools`], [`require_tool`]) -- locate ffprobe
//!   and ffmpeg and report their versions.
//! - **Probing** ([`probe::Prober`]) -- run the probe tool against a file and
//!   assemble a partial [`VideoMetadata`] record with tolerant field parsing.
//! - **Frame sampling** ([`frames::FrameSampler`]) -- extract still-frame
//!   thumbnails at evenly spaced interior timestamps.

mod error;

pub mod command;
pub mod frames;
pub mod probe;
pub mod tools;

// Re-exports
pub use command::{ToolCommand, ToolOutput, DEFAULT_TIMEOUT};
pub use error::{Error, Result};
pub use frames::{Frame, FrameSampler, DEFAULT_DURATION_SECS, DEFAULT_NUM_FRAMES};
pub use probe::{Prober, QualityTier, Resolution, VideoMetadata};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
