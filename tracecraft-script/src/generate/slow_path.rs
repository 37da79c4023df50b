//! Slow path: model-assisted script generation for constructs the fast
//! path doesn't cover, or whose fast-path script failed validation.
//!
//! `PromptBuilder` is modeled on `drift-context`'s depth-budgeted context
//! assembly: fixed sections, each truncated to its own budget rather than
//! one global character limit, so the rules section is never crowded out
//! by a long pattern list.

use serde::Deserialize;
use tracecraft_analysis::Construct;
use tracecraft_core::traits::model_client::{ModelClient, ModelRequest};
use tracecraft_learning::Pattern;

use crate::fingerprint::Fingerprint;
use crate::generate::GenerateError;
use crate::script::{Anchor, InsertionScript, ScriptOp};

const FORBIDDEN_MARKER: &str = "```";
const MAX_PATTERNS_IN_PROMPT: usize = 3;

/// System + user prompt pair for one slow-path attempt.
pub struct PromptBuilder<'a> {
    construct: &'a Construct,
    source_excerpt: &'a str,
    patterns: &'a [Pattern],
    repair_context: Option<&'a str>,
}

impl<'a> PromptBuilder<'a> {
    pub fn new(construct: &'a Construct, source_excerpt: &'a str, patterns: &'a [Pattern]) -> Self {
        Self {
            construct,
            source_excerpt,
            patterns,
            repair_context: None,
        }
    }

    /// Attach the previous attempt's validation failure, turning this into
    /// a repair prompt rather than a first attempt.
    pub fn with_repair_context(mut self, failure: &'a str) -> Self {
        self.repair_context = Some(failure);
        self
    }

    pub fn build(&self) -> (String, String) {
        let system = format!(
            "You generate telemetry instrumentation for {language} source code.\n\
             Every identifier you introduce must start with `_tel`.\n\
             Never emit a line containing `{marker}`.\n\
             Respond with a JSON array of objects: \
             {{\"placement\": \"before\"|\"after\"|\"wrap_return\", \"line\": <0-indexed line>, \"text\": <string>}}.\n\
             `line` must fall within the construct's span, inclusive.",
            language = self.construct.language,
            marker = FORBIDDEN_MARKER,
        );

        let mut user = String::new();
        user.push_str(&format!(
            "Construct: {kind} at lines {start}-{end} (enclosing function: {enclosing}).\n\n",
            kind = self.construct.kind.as_str(),
            start = self.construct.span.start_line,
            end = self.construct.span.end_line,
            enclosing = self.construct.enclosing_function.as_deref().unwrap_or("<module>"),
        ));
        user.push_str("Source:\n");
        user.push_str(self.source_excerpt);
        user.push('\n');

        if !self.patterns.is_empty() {
            user.push_str("\nKnown failure patterns for this construct kind:\n");
            for pattern in self.patterns.iter().take(MAX_PATTERNS_IN_PROMPT) {
                user.push_str(&format!(
                    "- why: {why}\n  bad: {bad}\n  good: {good}\n  how: {how}\n",
                    why = pattern.why,
                    bad = pattern.bad_example,
                    good = pattern.good_example,
                    how = pattern.how,
                ));
            }
        }

        if let Some(failure) = self.repair_context {
            user.push_str(&format!("\nThe previous attempt failed validation:\n{failure}\n"));
        }

        (system, user)
    }
}

#[derive(Debug, Deserialize)]
struct ModelOp {
    placement: String,
    line: usize,
    text: String,
}

pub async fn generate(
    construct: &Construct,
    source_lines: &[&str],
    patterns: &[Pattern],
    repair_context: Option<&str>,
    snippet_synthesis_version: u32,
    runtime_api_version: u32,
    model: &dyn ModelClient,
    timeout: std::time::Duration,
) -> Result<(Fingerprint, InsertionScript), GenerateError> {
    let start = construct.span.start_line;
    let end = construct.span.end_line.min(source_lines.len().saturating_sub(1));
    let excerpt = if start <= end {
        source_lines[start..=end].join("\n")
    } else {
        String::new()
    };

    let mut builder = PromptBuilder::new(construct, &excerpt, patterns);
    if let Some(failure) = repair_context {
        builder = builder.with_repair_context(failure);
    }
    let (system_prompt, user_prompt) = builder.build();

    let response = model
        .generate(ModelRequest {
            system_prompt,
            user_prompt,
            timeout,
        })
        .await?;

    let model_ops: Vec<ModelOp> =
        serde_json::from_str(&response.text).map_err(|e| GenerateError::Unparsable(e.to_string()))?;

    let mut ops = Vec::with_capacity(model_ops.len());
    let mut return_index = 0usize;
    for model_op in model_ops {
        if model_op.text.contains(FORBIDDEN_MARKER) {
            return Err(GenerateError::Rejected("forbidden marker in generated snippet"));
        }
        if model_op.line < start || model_op.line > construct.span.end_line {
            return Err(GenerateError::AnchorOutOfSpan {
                line: model_op.line,
                start,
                end: construct.span.end_line,
            });
        }
        let source_line = source_lines.get(model_op.line).copied().unwrap_or("");
        let anchor = Anchor::new(model_op.line, source_line);
        ops.push(match model_op.placement.as_str() {
            "before" => ScriptOp::InsertLine {
                anchor,
                before: true,
                text: model_op.text,
            },
            "after" => ScriptOp::InsertLine {
                anchor,
                before: false,
                text: model_op.text,
            },
            "wrap_return" => {
                // Index-suffixed for the same reason as the fast path:
                // two returns in one function scope can't both declare
                // `_tel_ret` in JS/TS.
                let capture_var = format!("_tel_ret_{return_index}");
                return_index += 1;
                ScriptOp::RewriteReturn {
                    anchor,
                    capture_var,
                    text: model_op.text,
                }
            }
            other => {
                return Err(GenerateError::Unparsable(format!("unknown placement '{other}'")));
            }
        });
    }

    // Stable ordering: ascending by anchor line, so two runs of the same
    // model output (or a human reading a diff) see a deterministic script.
    ops.sort_by_key(|op| op.anchor_line());

    let fingerprint = Fingerprint::of(
        construct.language,
        construct.kind,
        &excerpt,
        snippet_synthesis_version,
        runtime_api_version,
    );

    Ok((fingerprint, InsertionScript::new(ops)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracecraft_analysis::analyze;
    use tracecraft_core::types::language::Language;

    #[test]
    fn prompt_always_states_the_reserved_prefix_rule() {
        let source = "def f(x):\n    return x\n";
        let output = analyze(source.as_bytes(), Language::Python, "f.py").unwrap();
        let func = &output.constructs[0];
        let builder = PromptBuilder::new(func, source, &[]);
        let (system, _user) = builder.build();
        assert!(system.contains("_tel"));
    }

    #[test]
    fn repair_context_is_appended_to_the_user_prompt() {
        let source = "def f(x):\n    return x\n";
        let output = analyze(source.as_bytes(), Language::Python, "f.py").unwrap();
        let func = &output.constructs[0];
        let builder = PromptBuilder::new(func, source, &[]).with_repair_context("undefined: _tel_rt");
        let (_system, user) = builder.build();
        assert!(user.contains("undefined: _tel_rt"));
    }
}
