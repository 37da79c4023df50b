//! Applies an `InsertionScript` to one file inside a scratch directory
//! (spec.md §4.6, steps 1-4).

use std::fs;
use std::path::{Path, PathBuf};

use tracecraft_core::types::language::Language;
use tracecraft_script::{Anchor, ScriptOp};

use crate::error::SandboxError;
use crate::jail::jailed_path;

/// Bounded local search radius (±K) for anchor drift recovery.
pub const ANCHOR_SEARCH_WINDOW: usize = 3;

/// A line consisting solely of a markdown code fence — upstream
/// contamination the forbidden-marker post-pass strips as defense in
/// depth (spec.md §4.6 step 4).
pub const FORBIDDEN_MARKER: &str = "```";

pub struct ApplyOutcome {
    pub candidate_path: PathBuf,
    pub candidate_text: String,
    /// Kept alive for the caller: the validator runs inside this
    /// directory, and dropping it removes the scratch tree.
    pub scratch_dir: tempfile::TempDir,
}

/// Copy `original_path` into a scratch directory, apply every op in
/// `script` in descending anchor-line order, strip forbidden-marker-only
/// lines, and optionally stage a runtime-utility template file alongside
/// the candidate. Returns the scratch directory and candidate text.
pub fn apply(
    language: Language,
    original_path: &Path,
    script: &tracecraft_script::InsertionScript,
    runtime_template: Option<(&str, &[u8])>,
) -> Result<ApplyOutcome, SandboxError> {
    let scratch = tempfile::tempdir()?;
    let file_name = original_path
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("candidate"));
    let candidate_path = jailed_path(scratch.path(), &file_name)?;

    let original_text = fs::read_to_string(original_path)?;
    let mut lines: Vec<String> = original_text.lines().map(str::to_string).collect();

    let mut ops: Vec<&ScriptOp> = script.ops().iter().collect();
    // Descending line order so an earlier insertion never shifts a later
    // op's anchor out from under it.
    ops.sort_by(|a, b| b.anchor_line().cmp(&a.anchor_line()));

    for op in ops {
        apply_one(&mut lines, op, language)?;
    }

    strip_forbidden_marker_lines(&mut lines);

    let candidate_text = format!("{}\n", lines.join("\n"));
    fs::write(&candidate_path, &candidate_text)?;

    if let Some((name, contents)) = runtime_template {
        let template_path = jailed_path(scratch.path(), Path::new(name))?;
        fs::write(&template_path, contents)?;
    }

    Ok(ApplyOutcome {
        candidate_path,
        candidate_text,
        scratch_dir: scratch,
    })
}

fn apply_one(lines: &mut Vec<String>, op: &ScriptOp, language: Language) -> Result<(), SandboxError> {
    match op {
        ScriptOp::InsertLine { anchor, before, text } => {
            let idx = resolve_anchor(lines, anchor)?;
            let insert_at = if *before { idx } else { idx + 1 };
            lines.insert(insert_at, text.clone());
        }
        ScriptOp::ReplaceLine { anchor, text } => {
            let idx = resolve_anchor(lines, anchor)?;
            lines[idx] = text.clone();
        }
        ScriptOp::WrapBlock {
            start,
            end,
            prelude,
            postlude,
        } => {
            let start_idx = resolve_anchor(lines, start)?;
            let end_idx = resolve_anchor(lines, end)?;
            // Postlude first: inserting after `end_idx` doesn't disturb
            // `start_idx`, which the prelude insertion still needs.
            lines.insert(end_idx + 1, postlude.clone());
            lines.insert(start_idx, prelude.clone());
        }
        ScriptOp::RewriteReturn {
            anchor,
            capture_var,
            text,
        } => {
            let idx = resolve_anchor(lines, anchor)?;
            let rewritten = rewrite_return(&lines[idx], capture_var, text, language);
            lines.splice(idx..=idx, rewritten);
        }
    }
    Ok(())
}

/// Resolve an anchor: exact line first, then a bounded ±K local search.
fn resolve_anchor(lines: &[String], anchor: &Anchor) -> Result<usize, SandboxError> {
    if let Some(line) = lines.get(anchor.line) {
        if anchor.matches(line) {
            return Ok(anchor.line);
        }
    }

    for offset in 1..=ANCHOR_SEARCH_WINDOW {
        for candidate in [anchor.line.checked_sub(offset), Some(anchor.line + offset)]
            .into_iter()
            .flatten()
        {
            if let Some(line) = lines.get(candidate) {
                if anchor.matches(line) {
                    return Ok(candidate);
                }
            }
        }
    }

    Err(SandboxError::AnchorDrift {
        line: anchor.line,
        window: ANCHOR_SEARCH_WINDOW,
    })
}

/// Turn a bare `return <expr>` line into a declare-capture / telemetry /
/// return sequence. Never invoked for a language whose `return` can carry
/// multiple values (spec.md DESIGN NOTES, "Return-rewriting risk") — the
/// synthesizer routes those through a plain `InsertLine` instead.
fn rewrite_return(original_line: &str, capture_var: &str, telemetry_call: &str, language: Language) -> Vec<String> {
    let indent: String = original_line.chars().take_while(|c| c.is_whitespace()).collect();
    let trimmed = original_line.trim_start();
    let expr = trimmed.strip_prefix("return").unwrap_or(trimmed).trim();
    // Strip a trailing statement terminator so it isn't doubled when we
    // re-append `terminator` below, and so the final `return` line — which
    // never had one to begin with — gets exactly one.
    let expr = expr.strip_suffix(';').map(str::trim_end).unwrap_or(expr);

    let (declare_kw, terminator) = match language {
        Language::Python => ("", ""),
        Language::JavaScript | Language::TypeScript => ("let ", ";"),
        Language::Go => ("", ""), // unreachable: Go has multi-value return.
    };

    if expr.is_empty() {
        vec![format!("{indent}{telemetry_call}{terminator}"), format!("{indent}return{terminator}")]
    } else {
        vec![
            format!("{indent}{declare_kw}{capture_var} = {expr}{terminator}"),
            format!("{indent}{telemetry_call}{terminator}"),
            format!("{indent}return {capture_var}{terminator}"),
        ]
    }
}

fn strip_forbidden_marker_lines(lines: &mut Vec<String>) {
    lines.retain(|line| line.trim() != FORBIDDEN_MARKER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use proptest::prelude::*;
    use tracecraft_script::{Anchor, InsertionScript};

    fn write_source(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn insert_after_exact_anchor() {
        let dir = tempfile::tempdir().unwrap();
        let source = "def f(x):\n    return x\n";
        let path = write_source(dir.path(), "f.py", source);

        let anchor = Anchor::new(0, "def f(x):");
        let script = InsertionScript::new(vec![ScriptOp::InsertLine {
            anchor,
            before: false,
            text: "    __tracecraft_rt.record_entry(\"f\")".to_string(),
        }]);

        let outcome = apply(Language::Python, &path, &script, None).unwrap();
        assert!(outcome.candidate_text.contains("record_entry"));
        assert_eq!(outcome.candidate_text.lines().nth(1).unwrap().trim(), "__tracecraft_rt.record_entry(\"f\")");
    }

    #[test]
    fn anchor_drift_within_window_recovers() {
        let dir = tempfile::tempdir().unwrap();
        // Anchor recorded for "    return x" at line 1, but the real file
        // has one extra line inserted above it (simulating drift).
        let source = "def f(x):\n    y = x\n    return x\n";
        let path = write_source(dir.path(), "f.py", source);

        let anchor = Anchor::new(1, "    return x");
        let script = InsertionScript::new(vec![ScriptOp::ReplaceLine {
            anchor,
            text: "    return x  # patched".to_string(),
        }]);

        let outcome = apply(Language::Python, &path, &script, None).unwrap();
        assert!(outcome.candidate_text.contains("# patched"));
    }

    #[test]
    fn anchor_drift_beyond_window_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let source = "a\nb\nc\nd\ne\nf\ng\nh\n";
        let path = write_source(dir.path(), "f.py", source);

        let anchor = Anchor::new(0, "nonexistent line");
        let script = InsertionScript::new(vec![ScriptOp::ReplaceLine {
            anchor,
            text: "x".to_string(),
        }]);

        let result = apply(Language::Python, &path, &script, None);
        assert!(matches!(result, Err(SandboxError::AnchorDrift { .. })));
    }

    #[test]
    fn rewrite_return_captures_expression_for_python() {
        let dir = tempfile::tempdir().unwrap();
        let source = "def f(x, y):\n    return x + y\n";
        let path = write_source(dir.path(), "f.py", source);

        let anchor = Anchor::new(1, "    return x + y");
        let script = InsertionScript::new(vec![ScriptOp::RewriteReturn {
            anchor,
            capture_var: "_tel_ret".to_string(),
            text: "__tracecraft_rt.record_exit(\"f\", true)".to_string(),
        }]);

        let outcome = apply(Language::Python, &path, &script, None).unwrap();
        assert!(outcome.candidate_text.contains("_tel_ret = x + y"));
        assert!(outcome.candidate_text.contains("return _tel_ret"));
    }

    #[test]
    fn rewrite_return_strips_and_reapplies_semicolon_for_javascript() {
        let dir = tempfile::tempdir().unwrap();
        let source = "function f(x, y) {\n    return x + y;\n}\n";
        let path = write_source(dir.path(), "f.js", source);

        let anchor = Anchor::new(1, "    return x + y;");
        let script = InsertionScript::new(vec![ScriptOp::RewriteReturn {
            anchor,
            capture_var: "_tel_ret_0".to_string(),
            text: "__tracecraft_rt.record_exit(\"f\", true)".to_string(),
        }]);

        let outcome = apply(Language::JavaScript, &path, &script, None).unwrap();
        assert!(outcome.candidate_text.contains("let _tel_ret_0 = x + y;"));
        assert!(!outcome.candidate_text.contains(";;"));
        assert!(outcome.candidate_text.contains("return _tel_ret_0;"));
    }

    #[test]
    fn forbidden_marker_only_lines_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let source = "```\ndef f():\n    pass\n```\n";
        let path = write_source(dir.path(), "f.py", source);

        let script = InsertionScript::default();
        let outcome = apply(Language::Python, &path, &script, None).unwrap();
        assert!(!outcome.candidate_text.contains("```"));
    }

    proptest! {
        /// An anchor recorded at `prefix_lines` resolves iff the matching
        /// line has drifted by at most `ANCHOR_SEARCH_WINDOW` lines; any
        /// further and it's rejected rather than silently mismatched.
        #[test]
        fn anchor_drift_recovers_exactly_within_the_search_window(
            prefix_lines in 0usize..6,
            offset in 0usize..(ANCHOR_SEARCH_WINDOW * 3),
        ) {
            let target_line = prefix_lines + offset;
            let mut lines: Vec<String> = (0..target_line).map(|i| format!("filler line {i}")).collect();
            lines.push("TARGET".to_string());
            lines.push("tail".to_string());

            let anchor = Anchor::new(prefix_lines, "TARGET");
            let result = resolve_anchor(&lines, &anchor);

            if offset <= ANCHOR_SEARCH_WINDOW {
                prop_assert_eq!(result.unwrap(), target_line);
            } else {
                prop_assert!(result.is_err());
            }
        }
    }
}
