//! The per-construct attempt loop (spec.md §4.8): fast path first, then
//! model-assisted repair attempts consulting C9, up to a configurable
//! retry ceiling.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use xxhash_rust::xxh3::xxh3_64;

use tracecraft_analysis::Construct;
use tracecraft_cache::ScriptCache;
use tracecraft_core::{CancellationToken, Language, ModelClient};
use tracecraft_learning::{LearningRecord, LearningStore, Pattern};
use tracecraft_sandbox::SandboxError;
use tracecraft_script::{fast_path, slow_path, Fingerprint};
use tracecraft_validate::LanguageValidator;
use tracing::{debug, warn};

use crate::report::FileReport;
use crate::validate::validate_candidate;

pub struct AttemptContext<'a> {
    pub language: Language,
    pub runtime_api_version: u32,
    pub snippet_synthesis_version: u32,
    pub model: &'a dyn ModelClient,
    pub cache: &'a ScriptCache,
    pub learning: &'a LearningStore,
    pub validator: &'a dyn LanguageValidator,
    pub retry_ceiling: u32,
    pub model_timeout: Duration,
    pub wall_clock_cap: Duration,
    pub runtime_template: Option<(&'a str, &'a [u8])>,
    pub model_cost_budget: Option<f64>,
    pub prompt_injection_k: usize,
    pub cancellation: &'a CancellationToken,
    pub patterns: &'a [Pattern],
}

pub enum Outcome {
    /// The construct was instrumented; carries the file's new full text.
    Instrumented(String),
    /// Left unchanged: either no attempt succeeded, or the budget was
    /// exhausted before a repair could be attempted.
    Unchanged,
    Cancelled,
}

/// Run the attempt loop for one construct against `working_path`, which
/// must currently hold `baseline_text` on disk (the caller keeps it in
/// sync as earlier constructs succeed).
pub async fn run_attempt_loop(
    construct: &Construct,
    baseline_text: &str,
    working_path: &Path,
    ctx: &AttemptContext<'_>,
    report: &mut FileReport,
) -> Result<Outcome, crate::error::OrchestratorError> {
    let lines: Vec<&str> = baseline_text.lines().collect();

    let mut last_failure: Option<String> = None;
    let mut attempt: u32 = 0;

    while attempt < ctx.retry_ceiling {
        if ctx.cancellation.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        attempt += 1;
        report.attempts_used += 1;

        let generation = if attempt == 1 {
            fast_path_or_cache(construct, &lines, ctx, report)?
        } else {
            if let Some(budget) = ctx.model_cost_budget {
                if ctx.model.accrued_cost() >= budget {
                    report.record_diagnostic(construct.kind, construct.span.start_line, tracecraft_core::errors::error_code::BUDGET_EXHAUSTED, "model cost budget exhausted; no further repair attempts");
                    break;
                }
            }
            let patterns = ctx.learning.prompt_view(
                ctx.patterns,
                ctx.language,
                construct.kind,
                last_failure.as_deref().unwrap_or(""),
                ctx.prompt_injection_k,
            );
            match slow_path::generate(
                construct,
                &lines,
                &patterns,
                last_failure.as_deref(),
                ctx.snippet_synthesis_version,
                ctx.runtime_api_version,
                ctx.model,
                ctx.model_timeout,
            )
            .await
            {
                Ok(result) => Some(result),
                Err(e) => {
                    last_failure = Some(e.to_string());
                    None
                }
            }
        };

        let Some((fingerprint, script)) = generation else {
            continue;
        };

        if ctx.cancellation.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        std::fs::write(working_path, baseline_text)?;
        let apply_result = tracecraft_sandbox::apply(ctx.language, working_path, &script, ctx.runtime_template);

        let outcome = match apply_result {
            Ok(outcome) => outcome,
            Err(SandboxError::AnchorDrift { line, window }) => {
                // Recoverable: regenerate on the next attempt (spec.md §7).
                last_failure = Some(format!("anchor at line {line} drifted beyond the ±{window} search window"));
                record_learning(ctx, construct, attempt, false, "anchor_drift", &script_excerpt(&script), None)?;
                continue;
            }
            Err(other) => return Err(other.into()),
        };

        let validation = validate_candidate(
            ctx.validator,
            &outcome.candidate_path,
            &outcome.candidate_text,
            outcome.scratch_dir.path(),
            ctx.wall_clock_cap,
        )
        .await?;

        if validation.ok {
            debug!(kind = ?construct.kind, attempt, "construct validated");
            ctx.cache.store(ctx.language, fingerprint, script, ctx.runtime_api_version)?;
            ctx.cache.mark_success(ctx.language, &fingerprint)?;
            record_learning(
                ctx,
                construct,
                attempt,
                true,
                "",
                &outcome.candidate_text,
                Some(format!("validated on attempt {attempt}")),
            )?;
            report.constructs_instrumented += 1;
            return Ok(Outcome::Instrumented(outcome.candidate_text));
        }

        if validation.kind == tracecraft_validate::ValidationKind::ConfigError {
            // Terminal for this construct: no repair can supply a missing
            // build command.
            report.record_diagnostic(construct.kind, construct.span.start_line, tracecraft_core::errors::error_code::CONFIG_ERROR, validation.stderr_excerpt.clone());
            record_learning(ctx, construct, attempt, false, &validation.pattern_key, &script_excerpt(&script), None)?;
            break;
        }

        warn!(kind = ?construct.kind, attempt, pattern = %validation.pattern_key, "construct failed validation");
        ctx.cache.mark_failure(ctx.language, &fingerprint)?;
        record_learning(ctx, construct, attempt, false, &validation.pattern_key, &script_excerpt(&script), None)?;
        last_failure = Some(validation.stderr_excerpt.clone());
    }

    report.constructs_failed += 1;
    report.record_diagnostic(
        construct.kind,
        construct.span.start_line,
        tracecraft_core::errors::error_code::VALIDATION_FAILURE,
        last_failure.unwrap_or_else(|| "no attempt produced a script".to_string()),
    );
    Ok(Outcome::Unchanged)
}

fn fast_path_or_cache(
    construct: &Construct,
    lines: &[&str],
    ctx: &AttemptContext<'_>,
    report: &mut FileReport,
) -> Result<Option<(Fingerprint, tracecraft_script::InsertionScript)>, crate::error::OrchestratorError> {
    let (fingerprint, script) = match fast_path::generate(construct, lines, ctx.snippet_synthesis_version, ctx.runtime_api_version) {
        Ok(result) => result,
        Err(_) => return Ok(None),
    };

    if let Some(cached) = ctx.cache.lookup(ctx.language, &fingerprint, ctx.runtime_api_version)? {
        report.cache_hits += 1;
        return Ok(Some((fingerprint, cached.script)));
    }
    report.cache_misses += 1;
    Ok(Some((fingerprint, script)))
}

fn script_excerpt(script: &tracecraft_script::InsertionScript) -> String {
    script
        .ops()
        .iter()
        .map(|op| format!("{op:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn record_learning(
    ctx: &AttemptContext<'_>,
    construct: &Construct,
    attempt: u32,
    success: bool,
    failure_pattern: &str,
    snippet_excerpt: &str,
    fix_description: Option<String>,
) -> Result<(), crate::error::OrchestratorError> {
    let record = LearningRecord {
        language: ctx.language,
        construct_kind: construct.kind,
        attempt,
        success,
        failure_pattern: failure_pattern.to_string(),
        snippet_excerpt: snippet_excerpt.to_string(),
        fix_description,
        timestamp: Utc::now(),
        content_hash: xxh3_64(snippet_excerpt.as_bytes()),
    };
    ctx.learning.append(&record)?;
    Ok(())
}
