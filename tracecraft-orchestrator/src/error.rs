//! `OrchestratorError` — terminal, whole-file failures (spec.md §7).
//! Per-construct failures never reach here; they're folded into the
//! `FileReport` the attempt loop returns instead.

use tracecraft_core::errors::{error_code, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("source is not valid {0}")]
    Analysis(#[from] tracecraft_analysis::AnalysisError),
    #[error("cache error: {0}")]
    Cache(#[from] tracecraft_cache::CacheError),
    #[error("learning store error: {0}")]
    Learning(#[from] tracecraft_learning::StoreError),
    #[error("sandbox error: {0}")]
    Sandbox(#[from] tracecraft_sandbox::SandboxError),
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("run was cancelled")]
    Cancelled,
}

impl ErrorCode for OrchestratorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Analysis(e) => e.error_code(),
            Self::Cache(e) => e.error_code(),
            Self::Learning(e) => e.error_code(),
            Self::Sandbox(e) => e.error_code(),
            Self::Io(_) => error_code::SANDBOX_VIOLATION,
            Self::Cancelled => error_code::VALIDATION_FAILURE,
        }
    }

    fn is_recoverable(&self) -> bool {
        false
    }
}
