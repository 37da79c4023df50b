use std::path::PathBuf;
use std::time::Duration;

use tracecraft_core::errors::{error_code, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum SandboxError {
    #[error("sandbox I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("anchor at line {line} drifted beyond the ±{window} search window")]
    AnchorDrift { line: usize, window: usize },
    #[error("path escapes the scratch jail: {0}")]
    Jail(PathBuf),
    #[error("validator timed out after {0:?}")]
    ValidatorTimeout(Duration),
}

impl ErrorCode for SandboxError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::AnchorDrift { .. } => error_code::ANCHOR_DRIFT,
            Self::ValidatorTimeout(_) => error_code::VALIDATION_FAILURE,
            Self::Io(_) | Self::Jail(_) => error_code::SANDBOX_VIOLATION,
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::AnchorDrift { .. } | Self::ValidatorTimeout(_))
    }
}
