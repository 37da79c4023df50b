//! Shared stderr-parsing helpers for the per-language validators.

use std::process::Output;

pub fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Pull every `:<line>:` or `line <line>` occurrence out of a stderr blob,
/// in the order they appear. Used to populate `ValidationResult::locations`.
pub fn extract_line_numbers(stderr: &str, re: &regex::Regex) -> Vec<usize> {
    re.captures_iter(stderr)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<usize>().ok())
        .collect()
}

/// Build a stable pattern key from a short identifying token and the
/// exception/error class name, e.g. `("py", "NameError")` -> `py_nameerror`.
pub fn pattern_key(prefix: &str, class: &str) -> String {
    format!("{prefix}_{}", class.to_ascii_lowercase())
}
