//! End-to-end scenario from spec.md §8 #5: a model response contaminated
//! with a markdown code fence must never reach a candidate file.
//!
//! `slow_path::generate` already rejects any op text containing the
//! forbidden marker before a script is ever built (see
//! `tracecraft-script/src/generate/slow_path.rs`), so there's no way to
//! drive this scenario through `process_file`'s public API — by the time
//! a script exists, the marker can only appear as a whole line the model
//! left outside any op's text (e.g. wrapping its entire JSON reply in a
//! fence a parsing bug failed to strip). That residual case is what
//! `tracecraft_sandbox::apply`'s own forbidden-marker pass exists for, so
//! this test drives the sandbox directly: build a script with a
//! contaminated source line already present, apply it, and confirm the
//! candidate that reaches the validator is clean and compiles.

use tracecraft_core::types::language::Language;
use tracecraft_sandbox::apply;
use tracecraft_sandbox::run_validator;
use tracecraft_script::{Anchor, InsertionScript, ScriptOp};
use tracecraft_validate::LanguageValidator;
use tracecraft_validate::languages::python::PythonValidator;

#[tokio::test]
async fn a_stray_code_fence_line_is_stripped_before_validation() {
    let dir = tempfile::tempdir().unwrap();
    let source = "def calculate(x, y):\n```\n    return x + y\n";
    let path = dir.path().join("calc.py");
    std::fs::write(&path, source).unwrap();

    let anchor = Anchor::new(0, "def calculate(x, y):");
    let script = InsertionScript::new(vec![ScriptOp::InsertLine {
        anchor,
        before: false,
        text: "    __tracecraft_rt.record_entry(\"calculate\", [(\"x\", x), (\"y\", y)])".to_string(),
    }]);

    let outcome = apply(Language::Python, &path, &script, None).unwrap();
    assert!(!outcome.candidate_text.contains("```"));
    assert!(outcome.candidate_text.contains("record_entry"));

    // Isolated construct: referencing an undefined `__tracecraft_rt`
    // would fail compilation for an unrelated reason, so stub it in
    // alongside the candidate for this syntax-only check.
    std::fs::write(
        outcome.candidate_path.parent().unwrap().join("__tracecraft_rt.py"),
        "def record_entry(*args, **kwargs):\n    pass\n",
    )
    .unwrap();
    std::fs::write(
        &outcome.candidate_path,
        outcome.candidate_text.replacen(
            "def calculate",
            "import __tracecraft_rt\n\n\ndef calculate",
            1,
        ),
    )
    .unwrap();

    let validator = PythonValidator;
    let command = validator.build_command(&outcome.candidate_path).unwrap();
    let output = run_validator(&command, outcome.scratch_dir.path(), std::time::Duration::from_secs(5))
        .await
        .unwrap();
    let result = validator.classify(&output, &outcome.candidate_text);
    assert!(result.ok, "stderr: {}", String::from_utf8_lossy(&output.stderr));
}
