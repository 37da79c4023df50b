//! Configuration for the per-file retry orchestrator and its collaborators.
//!
//! Every field is optional so a partial TOML/JSON document layers over
//! sane defaults; `effective_*()` accessors resolve the default. Parsing
//! the document itself (file location, env overrides, CLI flags) is a
//! caller concern — this crate only defines the shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Maximum attempts per construct before giving up. Default: 3.
    pub retry_ceiling: Option<u32>,
    /// Failure streak at which a cached Script Record is evicted. Default: 3.
    pub cache_failure_streak_limit: Option<u32>,
    /// Bounded local search window (±K lines) for anchor-drift recovery. Default: 3.
    pub anchor_drift_window: Option<usize>,
    /// Minimum occurrence count before a Learning Store group consolidates
    /// into a Pattern. Default: 2.
    pub learning_consolidation_min: Option<u32>,
    /// Max patterns injected into a generation/repair prompt. Default: 3.
    pub prompt_injection_k: Option<usize>,
    /// Wall-clock cap for sandboxed interpreted-language validation, in
    /// milliseconds. Default: 15000.
    pub interpreted_timeout_ms: Option<u64>,
    /// Wall-clock cap for sandboxed compiled-language builds, in
    /// milliseconds. Default: 60000.
    pub compiled_timeout_ms: Option<u64>,
    /// Total model-call cost budget for one run, in the model client's own
    /// cost units. `None` means unbounded.
    pub model_cost_budget: Option<f64>,
    /// The runtime-utility API version this run targets.
    pub runtime_api_version: Option<u32>,
}

impl OrchestratorConfig {
    pub fn effective_retry_ceiling(&self) -> u32 {
        self.retry_ceiling.unwrap_or(3)
    }

    pub fn effective_cache_failure_streak_limit(&self) -> u32 {
        self.cache_failure_streak_limit.unwrap_or(3)
    }

    pub fn effective_anchor_drift_window(&self) -> usize {
        self.anchor_drift_window.unwrap_or(3)
    }

    pub fn effective_learning_consolidation_min(&self) -> u32 {
        self.learning_consolidation_min.unwrap_or(2)
    }

    pub fn effective_prompt_injection_k(&self) -> usize {
        self.prompt_injection_k.unwrap_or(3)
    }

    pub fn effective_interpreted_timeout_ms(&self) -> u64 {
        self.interpreted_timeout_ms.unwrap_or(15_000)
    }

    pub fn effective_compiled_timeout_ms(&self) -> u64 {
        self.compiled_timeout_ms.unwrap_or(60_000)
    }

    pub fn effective_runtime_api_version(&self) -> u32 {
        self.runtime_api_version.unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_applied_when_unset() {
        let cfg = OrchestratorConfig::default();
        assert_eq!(cfg.effective_retry_ceiling(), 3);
        assert_eq!(cfg.effective_anchor_drift_window(), 3);
        assert_eq!(cfg.effective_runtime_api_version(), 1);
    }

    #[test]
    fn partial_config_overrides_only_set_fields() {
        let json = r#"{ "retry_ceiling": 5 }"#;
        let cfg: OrchestratorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.effective_retry_ceiling(), 5);
        assert_eq!(cfg.effective_cache_failure_streak_limit(), 3);
    }
}
