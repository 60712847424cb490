use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    StartupToolFailure,
    LogToolFailure,
    StreamReadFailure,
    InvalidRequest,
    IoError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartupToolFailure => write!(f, "STARTUP_TOOL_FAILURE"),
            Self::LogToolFailure => write!(f, "LOG_TOOL_FAILURE"),
            Self::StreamReadFailure => write!(f, "STREAM_READ_FAILURE"),
            Self::InvalidRequest => write!(f, "INVALID_REQUEST"),
            Self::IoError => write!(f, "IO_ERROR"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityError {
    pub code: ErrorCode,
    pub message: String,
}

impl fmt::Display for ActivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ActivityError {}

impl ActivityError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The file listing (`git ls-tree`) could not be obtained.
    pub fn startup_tool(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StartupToolFailure, message)
    }

    /// The log producer could not be started, attached to, or exited non-zero.
    pub fn log_tool(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LogToolFailure, message)
    }

    pub fn stream_read(err: &std::io::Error) -> Self {
        Self::new(
            ErrorCode::StreamReadFailure,
            format!("Failed to read git log output: {err}"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_code_and_message() {
        let err = ActivityError::log_tool("git log exited with status 128");
        assert_eq!(
            err.to_string(),
            "[LOG_TOOL_FAILURE] git log exited with status 128"
        );
    }

    #[test]
    fn stream_read_wraps_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err = ActivityError::stream_read(&io);
        assert_eq!(err.code, ErrorCode::StreamReadFailure);
        assert!(err.message.contains("pipe closed"));
    }

    #[test]
    fn codes_serialize_as_variant_names() {
        let json = serde_json::to_string(&ErrorCode::StartupToolFailure).unwrap();
        assert_eq!(json, "\"StartupToolFailure\"");
        assert_eq!(ErrorCode::IoError.to_string(), "IO_ERROR");
    }
}
