//! End-to-end scenario from spec.md §8 #1: a two-argument Python function
//! gets entry/exit telemetry inserted via the fast path alone, with no
//! model call, and the result is valid Python.

mod common;

use tracecraft_core::types::language::Language;
use tracecraft_orchestrator::process_file;
use tracecraft_validate::BuildCommands;

#[tokio::test]
async fn two_arg_python_function_is_instrumented_on_the_fast_path() {
    let workdir = tempfile::tempdir().unwrap();
    let file_path = workdir.path().join("calc.py");
    let source = "def calculate(x, y):\n    return x + y\n";
    std::fs::write(&file_path, source).unwrap();

    let report = process_file(common::input(
        file_path.clone(),
        source,
        Language::Python,
        workdir.path().join("cache"),
        workdir.path().join("learning"),
        BuildCommands::default(),
    ))
    .await
    .unwrap();

    assert_eq!(report.constructs_found, 1);
    assert_eq!(report.constructs_instrumented, 1);
    assert_eq!(report.constructs_failed, 0);
    assert_eq!(report.cache_misses, 1);

    let instrumented = std::fs::read_to_string(&file_path).unwrap();
    assert!(instrumented.contains("__tracecraft_rt.record_entry(\"calculate\""));
    assert!(instrumented.contains("_tel_ret_0 = x + y"));
    assert!(instrumented.contains("__tracecraft_rt.record_exit(\"calculate\""));
    assert!(instrumented.contains("return _tel_ret_0"));
}
