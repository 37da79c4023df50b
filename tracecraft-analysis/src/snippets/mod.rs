//! C3 Snippet Synthesizer.
//!
//! Template-driven, model-free generation of telemetry call text for the
//! construct shapes the catalog below covers. This is the "fast path":
//! every `Construct` the analyzer emits gets a deterministic attempt here
//! first. Nothing in this module talks to a model or inspects the sandbox
//! result — escalation to the slow (model-assisted) path happens one layer
//! up, when a fast-path script fails validation.
//!
//! Every emitted local/identifier is prefixed `_tel` so generated code can
//! never collide with a name already live in the instrumented scope.

use tracecraft_core::types::language::Language;

use crate::ast::types::{Construct, ConstructKind, ExitKind};

/// Where a snippet's text lands relative to an anchor line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Insert a new line immediately before the anchor line.
    BeforeLine,
    /// Insert a new line immediately after the anchor line.
    AfterLine,
    /// Rewrite the anchor line itself (a `return` statement gains a
    /// telemetry call ahead of the returned value).
    WrapReturn,
}

/// One template-produced insertion point. `tracecraft-script` turns these
/// into anchored `ScriptOp`s against the original source.
#[derive(Debug, Clone)]
pub struct SnippetSite {
    pub placement: Placement,
    /// 0-indexed line in the original source this site anchors to.
    pub line: usize,
    pub text: String,
    pub reserved_locals: Vec<String>,
}

const RUNTIME_MODULE: &str = "__tracecraft_rt";

/// Every synthesized local/identifier starts with this prefix. C1 uses it
/// to recognize and skip a capture variable a prior instrumentation pass
/// introduced, rather than re-detecting it as a user assignment on the
/// next `analyze()` pass over the growing baseline.
pub const RESERVED_TELEMETRY_PREFIX: &str = "_tel";

/// Produce every template-covered insertion point for `construct`. Never
/// recurses into `construct.children` — callers walk the tree and call
/// this once per construct.
pub fn synthesize(construct: &Construct) -> Vec<SnippetSite> {
    match construct.kind {
        ConstructKind::Function => synthesize_function(construct),
        ConstructKind::Loop => vec![synthesize_loop(construct)],
        ConstructKind::Conditional => vec![synthesize_conditional(construct)],
        ConstructKind::VariableAssignment => vec![synthesize_assignment(construct)],
        ConstructKind::ExceptionHandler => vec![synthesize_exception_handler(construct)],
    }
}

fn synthesize_function(construct: &Construct) -> Vec<SnippetSite> {
    let name = construct.name.as_deref().unwrap_or("<anonymous>");
    let mut sites = Vec::new();

    let entry_reserved = format!("_tel_entry_{name}");
    sites.push(SnippetSite {
        placement: Placement::AfterLine,
        line: construct.span.start_line,
        text: call(
            construct.language,
            "record_entry",
            &[quote(name), param_list(construct.language, &construct.params)],
        ),
        reserved_locals: vec![entry_reserved],
    });

    let mut return_index = 0usize;
    for exit in &construct.exits {
        let had_return = exit.kind == ExitKind::Return;
        // Languages whose `return` can carry multiple values make
        // rewriting the return expression unsafe (capturing the result
        // would have to match an arity we don't know statically), so the
        // exit call goes on its own line immediately before the `return`
        // instead of wrapping it.
        if had_return && !construct.language.has_multi_value_return() {
            // Index-suffixed so two returns in the same function scope
            // never declare the same capture name twice — JS/TS's `let`
            // would reject a second `let _tel_ret` in one scope.
            let capture_var = format!("_tel_ret_{return_index}");
            return_index += 1;
            sites.push(SnippetSite {
                placement: Placement::WrapReturn,
                line: exit.line,
                text: call(construct.language, "record_exit", &[quote(name), "true".to_string()]),
                reserved_locals: vec![capture_var],
            });
        } else {
            sites.push(SnippetSite {
                placement: Placement::BeforeLine,
                line: exit.line,
                text: call(
                    construct.language,
                    "record_exit",
                    &[quote(name), had_return.to_string()],
                ),
                reserved_locals: Vec::new(),
            });
        }
    }

    sites
}

fn synthesize_loop(construct: &Construct) -> SnippetSite {
    SnippetSite {
        placement: Placement::AfterLine,
        line: construct.span.start_line,
        text: call(construct.language, "record_loop_iter", &[quote("loop")]),
        reserved_locals: vec!["_tel_iter".to_string()],
    }
}

fn synthesize_conditional(construct: &Construct) -> SnippetSite {
    SnippetSite {
        placement: Placement::AfterLine,
        line: construct.span.start_line,
        text: call(
            construct.language,
            "record_branch",
            &[construct.branch_count.to_string()],
        ),
        reserved_locals: Vec::new(),
    }
}

fn synthesize_assignment(construct: &Construct) -> SnippetSite {
    let name = construct.assigned_name.as_deref().unwrap_or("<unknown>");
    let line = construct.assigned_line.unwrap_or(construct.span.start_line);
    SnippetSite {
        placement: Placement::AfterLine,
        line,
        text: call(construct.language, "record_assignment", &[quote(name), name.to_string()]),
        reserved_locals: Vec::new(),
    }
}

fn synthesize_exception_handler(construct: &Construct) -> SnippetSite {
    SnippetSite {
        placement: Placement::AfterLine,
        line: construct.span.start_line,
        text: call(construct.language, "record_exception_entry", &[]),
        reserved_locals: Vec::new(),
    }
}

fn param_list(language: Language, params: &[String]) -> String {
    match language {
        Language::Python => {
            let pairs: Vec<String> = params.iter().map(|p| format!("(\"{p}\", {p})")).collect();
            format!("[{}]", pairs.join(", "))
        }
        Language::JavaScript | Language::TypeScript => {
            let pairs: Vec<String> = params.iter().map(|p| format!("[\"{p}\", {p}]")).collect();
            format!("[{}]", pairs.join(", "))
        }
        Language::Go => {
            // Go rejects unused locals, so the parameter capture must
            // reference every name to avoid a compile error on the
            // generated code itself.
            let pairs: Vec<String> = params.iter().map(|p| format!("\"{p}\": {p}")).collect();
            format!("map[string]interface{{}}{{{}}}", pairs.join(", "))
        }
    }
}

fn quote(s: &str) -> String {
    format!("\"{s}\"")
}

fn call(language: Language, function: &str, args: &[String]) -> String {
    let joined = args.join(", ");
    match language {
        Language::Python => format!("{RUNTIME_MODULE}.{function}({joined})"),
        Language::JavaScript | Language::TypeScript => format!("{RUNTIME_MODULE}.{function}({joined})"),
        Language::Go => format!("{RUNTIME_MODULE}.{}({joined})", to_camel(function)),
    }
}

fn to_camel(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = true;
    for ch in snake.chars() {
        if ch == '_' {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::types::{ExitSite, Span};

    fn span() -> Span {
        Span {
            start_byte: 0,
            end_byte: 10,
            start_line: 4,
            end_line: 6,
        }
    }

    #[test]
    fn function_entry_uses_reserved_local_prefix() {
        let construct = Construct::function(
            "calculate".to_string(),
            vec!["x".to_string(), "y".to_string()],
            span(),
            vec![ExitSite {
                kind: ExitKind::Return,
                line: 5,
            }],
            Language::Python,
        );
        let sites = synthesize(&construct);
        assert_eq!(sites.len(), 2);
        assert!(sites[0].reserved_locals[0].starts_with("_tel"));
        assert!(sites[0].text.contains("record_entry"));
    }

    #[test]
    fn go_param_capture_references_every_name_to_satisfy_unused_local_rule() {
        let construct = Construct::function(
            "Div".to_string(),
            vec!["a".to_string(), "b".to_string()],
            span(),
            vec![],
            Language::Go,
        );
        let sites = synthesize(&construct);
        assert!(sites[0].text.contains("\"a\": a"));
        assert!(sites[0].text.contains("\"b\": b"));
    }

    #[test]
    fn fallthrough_exit_is_inserted_before_the_implicit_end_line() {
        let construct = Construct::function(
            "noop".to_string(),
            vec![],
            span(),
            vec![ExitSite {
                kind: ExitKind::FallThrough,
                line: 6,
            }],
            Language::Python,
        );
        let sites = synthesize(&construct);
        let fallthrough = &sites[1];
        assert_eq!(fallthrough.placement, Placement::BeforeLine);
        assert_eq!(fallthrough.line, 6);
    }
}
