use tracecraft_core::errors::{error_code, ErrorCode};

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt cache entry at {path}: {source}")]
    Corrupt { path: String, source: serde_json::Error },
    #[error("failed to acquire the advisory lock for cache entry {fingerprint}")]
    Locked { fingerprint: String },
}

impl ErrorCode for CacheError {
    fn error_code(&self) -> &'static str {
        error_code::CACHE_ERROR
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Locked { .. })
    }
}
