//! The abstract model-client interface consumed by `tracecraft-script`'s
//! slow path. Any provider — the core never names one.

use std::time::Duration;

/// A single generation request.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub timeout: Duration,
}

/// A single generation response, with enough metadata for budget tracking.
#[derive(Debug, Clone)]
pub struct ModelResponse {
    pub text: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    /// Cost of this call in the provider's own unit (USD, credits, ...).
    /// The orchestrator only ever sums and compares these; it never
    /// interprets the unit.
    pub cost: f64,
}

/// Abstract text-in/text-out model collaborator.
///
/// Implementations are responsible for their own retries, rate limiting,
/// and provider selection — none of that is this crate's concern.
#[async_trait::async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, request: ModelRequest) -> Result<ModelResponse, ModelClientError>;

    /// Total cost accrued across every call this client has served so far
    /// in the current process, used by the orchestrator's budget cutoff.
    fn accrued_cost(&self) -> f64;
}

#[derive(Debug, thiserror::Error)]
pub enum ModelClientError {
    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
    #[error("model call failed: {0}")]
    ProviderError(String),
    #[error("model returned output that could not be parsed: {0}")]
    UnparsableOutput(String),
}
