//! `process_file` — the sole public entry point (spec.md §4.8, §6).

use std::path::Path;
use std::time::Duration;

use tracecraft_analysis::analyze;
use tracecraft_cache::ScriptCache;
use tracecraft_learning::{consolidate, LearningStore};
use tracecraft_validate::validator_for;

use crate::attempt::{run_attempt_loop, AttemptContext, Outcome};
use crate::error::OrchestratorError;
use crate::flatten::flatten;
use crate::input::ProcessFileInput;
use crate::report::FileReport;

/// In-memory hot-layer capacity for the script cache. One process
/// instance per file-processing worker, so a modest fixed size is enough
/// (tune at the scheduler level, not here).
const CACHE_MEMORY_CAPACITY: u64 = 10_000;

pub async fn process_file(input: ProcessFileInput) -> Result<FileReport, OrchestratorError> {
    let mut report = FileReport::default();

    if input.cancellation.is_cancelled() {
        return Err(OrchestratorError::Cancelled);
    }

    let path_display = input.path.display().to_string();
    let first_pass = analyze(&input.source, input.language, &path_display)?;
    report.constructs_found = flatten(&first_pass.constructs).len();
    report.constructs_skipped = first_pass.skipped.len();

    let cache = ScriptCache::new(&input.cache_root, CACHE_MEMORY_CAPACITY)
        .with_failure_streak_limit(input.config.effective_cache_failure_streak_limit());
    let learning = LearningStore::new(&input.learning_root);
    let records = learning.load_all()?;
    let patterns = consolidate(&records, input.config.effective_learning_consolidation_min() as usize);
    let validator = validator_for(input.language, &input.build_commands);

    let wall_clock_cap = if input.language.requires_build() {
        Duration::from_millis(input.config.effective_compiled_timeout_ms())
    } else {
        Duration::from_millis(input.config.effective_interpreted_timeout_ms())
    };

    let scratch = tempfile::tempdir()?;
    let working_path = scratch.path().join(
        input
            .path
            .file_name()
            .map(Path::new)
            .unwrap_or_else(|| Path::new("working")),
    );

    let ctx = AttemptContext {
        language: input.language,
        runtime_api_version: input.runtime_api_version,
        snippet_synthesis_version: 1,
        model: input.model.as_ref(),
        cache: &cache,
        learning: &learning,
        validator: validator.as_ref(),
        retry_ceiling: input.config.effective_retry_ceiling(),
        model_timeout: Duration::from_secs(30),
        wall_clock_cap,
        runtime_template: input.runtime_template.as_ref().map(|(name, bytes)| (name.as_str(), bytes.as_slice())),
        model_cost_budget: input.config.model_cost_budget,
        prompt_injection_k: input.config.effective_prompt_injection_k(),
        cancellation: &input.cancellation,
        patterns: &patterns,
    };

    let mut baseline = String::from_utf8_lossy(&input.source).into_owned();
    let mut processed = 0usize;

    loop {
        // Re-analyze against the current baseline so every construct's
        // span reflects lines already shifted by earlier instrumentation
        // (spec.md §5: constructs processed in source order; edits must
        // stay internally consistent as the file grows).
        let pass = analyze(baseline.as_bytes(), input.language, &path_display)?;
        let flat = flatten(&pass.constructs);
        let Some(construct) = flat.get(processed).copied() else {
            break;
        };

        match run_attempt_loop(construct, &baseline, &working_path, &ctx, &mut report).await? {
            Outcome::Instrumented(new_text) => baseline = new_text,
            Outcome::Unchanged => {}
            Outcome::Cancelled => return Err(OrchestratorError::Cancelled),
        }
        processed += 1;
    }

    crate::writeback::write_atomic(&input.path, baseline.as_bytes())?;
    if let Some((name, contents)) = &input.runtime_template {
        if let Some(parent) = input.path.parent() {
            crate::writeback::write_atomic(&parent.join(name), contents)?;
        }
    }

    report.cost = input.model.accrued_cost();
    Ok(report)
}
