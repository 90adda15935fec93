//! Unified error type for the clipcheck application.
//!
//! Service-layer failures funnel into [`Error`], which carries enough
//! context for API handlers to derive an HTTP status code via
//! [`Error::http_status`].

use std::fmt;

/// Unified error type covering clipcheck's failure modes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "file").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Metadata extraction yielded nothing usable.
    #[error("Probe error: {0}")]
    Probe(String),

    /// An external tool (ffprobe, ffmpeg) returned an error.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::Validation(_) => 400,
            Error::Probe(_) => 422,
            Error::Tool { .. } => 502,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

impl From<clipcheck_av::Error> for Error {
    fn from(e: clipcheck_av::Error) -> Self {
        match e {
            clipcheck_av::Error::ToolNotFound { tool } => {
                Error::tool(tool, "not found on this system")
            }
            clipcheck_av::Error::ToolFailed { tool, message } => Error::tool(tool, message),
            clipcheck_av::Error::ToolTimeout { tool, timeout } => {
                Error::tool(tool, format!("timed out after {timeout:?}"))
            }
            clipcheck_av::Error::Io(source) => Error::Io { source },
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = Error::not_found("file", "frame_0.jpg");
        assert_eq!(err.to_string(), "file not found: frame_0.jpg");
        assert_eq!(err.http_status(), 404);
    }

    #[test]
    fn validation_display() {
        let err = Error::Validation("extension not allowed".into());
        assert_eq!(err.to_string(), "Validation error: extension not allowed");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn probe_display() {
        let err = Error::Probe("no metadata available".into());
        assert_eq!(err.to_string(), "Probe error: no metadata available");
        assert_eq!(err.http_status(), 422);
    }

    #[test]
    fn tool_display() {
        let err = Error::tool("ffmpeg", "exit code 1");
        assert_eq!(err.to_string(), "Tool error [ffmpeg]: exit code 1");
        assert_eq!(err.http_status(), 502);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn av_tool_errors_map_to_tool() {
        let err = Error::from(clipcheck_av::Error::tool_not_found("ffprobe"));
        assert!(matches!(err, Error::Tool { .. }));
        assert_eq!(err.http_status(), 502);
    }
}
