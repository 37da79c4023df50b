use tracecraft_core::errors::ErrorCode;
use tracecraft_core::traits::model_client::ModelClientError;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("construct has an empty body, nothing to fingerprint")]
    EmptyConstructBody,
    #[error("anchor at line {line} falls outside the construct's span ({start}..={end})")]
    AnchorOutOfSpan { line: usize, start: usize, end: usize },
    #[error("model call failed: {0}")]
    Model(#[from] ModelClientError),
    #[error("model output was not a valid script: {0}")]
    Unparsable(String),
    #[error("model output rejected: {0}")]
    Rejected(&'static str),
}

impl ErrorCode for GenerateError {
    fn error_code(&self) -> &'static str {
        use tracecraft_core::errors::error_code as codes;
        match self {
            Self::EmptyConstructBody | Self::AnchorOutOfSpan { .. } => codes::PARSE_ERROR,
            Self::Model(_) => codes::MODEL_ERROR,
            Self::Unparsable(_) | Self::Rejected(_) => codes::VALIDATION_FAILURE,
        }
    }

    fn is_recoverable(&self) -> bool {
        // Every slow-path failure is worth a retry with a different
        // prompt; fast-path span violations indicate a bug in the
        // synthesizer, not a transient condition.
        !matches!(self, Self::EmptyConstructBody | Self::AnchorOutOfSpan { .. })
    }
}
