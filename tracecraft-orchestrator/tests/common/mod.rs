//! Shared test fixtures for the golden end-to-end scenarios in spec.md §8.

use std::path::PathBuf;
use std::sync::Arc;

use tracecraft_core::traits::model_client::ModelClientError;
use tracecraft_core::types::language::Language;
use tracecraft_core::{CancellationToken, ModelClient, ModelRequest, ModelResponse};
use tracecraft_orchestrator::ProcessFileInput;
use tracecraft_validate::BuildCommands;

/// A model client the fast path should never call. Scenarios that are
/// supposed to resolve without a repair attempt panic loudly if they
/// fall through to the slow path instead of silently mis-reporting.
pub struct UnreachableModelClient;

#[async_trait::async_trait]
impl ModelClient for UnreachableModelClient {
    async fn generate(&self, _request: ModelRequest) -> Result<ModelResponse, ModelClientError> {
        panic!("the fast path should instrument this construct without a model call");
    }

    fn accrued_cost(&self) -> f64 {
        0.0
    }
}

#[allow(clippy::too_many_arguments)]
pub fn input(
    path: PathBuf,
    source: &str,
    language: Language,
    cache_root: PathBuf,
    learning_root: PathBuf,
    build_commands: BuildCommands,
) -> ProcessFileInput {
    ProcessFileInput {
        path,
        source: source.as_bytes().to_vec(),
        language,
        runtime_api_version: 1,
        model: Arc::new(UnreachableModelClient) as Arc<dyn ModelClient>,
        cache_root,
        learning_root,
        config: Default::default(),
        cancellation: CancellationToken::new(),
        build_commands,
        runtime_template: None,
    }
}
