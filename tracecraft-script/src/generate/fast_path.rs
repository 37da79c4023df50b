//! Fast path: deterministic anchor placement from `tracecraft_analysis`'s
//! template catalog, no model call. Handles the overwhelming majority of
//! constructs (spec.md §4.4).

use tracecraft_analysis::snippets::{synthesize, Placement};
use tracecraft_analysis::Construct;

use crate::fingerprint::Fingerprint;
use crate::generate::GenerateError;
use crate::script::{Anchor, InsertionScript, ScriptOp};

/// Generate a Fingerprint + InsertionScript for `construct` against the
/// full original source (`source_lines`, one entry per 0-indexed line).
pub fn generate(
    construct: &Construct,
    source_lines: &[&str],
    snippet_synthesis_version: u32,
    runtime_api_version: u32,
) -> Result<(Fingerprint, InsertionScript), GenerateError> {
    let body = construct_body(construct, source_lines)?;
    let fingerprint = Fingerprint::of(
        construct.language,
        construct.kind,
        &body,
        snippet_synthesis_version,
        runtime_api_version,
    );

    let sites = synthesize(construct);
    let mut ops = Vec::with_capacity(sites.len());
    for site in sites {
        if !construct.span.contains_line(site.line) {
            return Err(GenerateError::AnchorOutOfSpan {
                line: site.line,
                start: construct.span.start_line,
                end: construct.span.end_line,
            });
        }
        let source_line = source_lines.get(site.line).copied().unwrap_or("");
        let anchor = Anchor::new(site.line, source_line);
        ops.push(match site.placement {
            Placement::BeforeLine => ScriptOp::InsertLine {
                anchor,
                before: true,
                text: site.text,
            },
            Placement::AfterLine => ScriptOp::InsertLine {
                anchor,
                before: false,
                text: site.text,
            },
            Placement::WrapReturn => ScriptOp::RewriteReturn {
                anchor,
                // `reserved_locals[0]` is the index-suffixed capture name
                // C3 picked for this exit site, so two returns in the same
                // function scope never collide on one declared name.
                capture_var: site
                    .reserved_locals
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "_tel_ret".to_string()),
                text: site.text,
            },
        });
    }

    Ok((fingerprint, InsertionScript::new(ops)))
}

fn construct_body(construct: &Construct, source_lines: &[&str]) -> Result<String, GenerateError> {
    let start = construct.span.start_line;
    let end = construct.span.end_line;
    if start > end || start >= source_lines.len() {
        return Err(GenerateError::EmptyConstructBody);
    }
    let end = end.min(source_lines.len().saturating_sub(1));
    Ok(source_lines[start..=end].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracecraft_analysis::analyze;
    use tracecraft_core::types::language::Language;

    #[test]
    fn two_arg_function_generates_entry_and_exit_ops() {
        let source = "def calculate(x, y):\n    return x + y\n";
        let output = analyze(source.as_bytes(), Language::Python, "calc.py").unwrap();
        let lines: Vec<&str> = source.lines().collect();
        let func = &output.constructs[0];

        let (_fp, script) = generate(func, &lines, 1, 1).unwrap();
        assert_eq!(script.ops().len(), 2);
    }

    #[test]
    fn same_construct_generated_twice_yields_equal_fingerprints() {
        let source = "def calculate(x, y):\n    return x + y\n";
        let output = analyze(source.as_bytes(), Language::Python, "calc.py").unwrap();
        let lines: Vec<&str> = source.lines().collect();
        let func = &output.constructs[0];

        let (fp1, _) = generate(func, &lines, 1, 1).unwrap();
        let (fp2, _) = generate(func, &lines, 1, 1).unwrap();
        assert_eq!(fp1, fp2);
    }
}
