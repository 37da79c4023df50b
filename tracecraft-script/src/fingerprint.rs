//! `Fingerprint` — the cache key (spec.md §3: "stable hash of language,
//! construct kind, normalized construct body, snippet-synthesis version,
//! and runtime-utility API version").

use tracecraft_core::types::language::Language;
use tracecraft_analysis::ConstructKind;

/// Content address of one Construct under one generation configuration.
/// Equal fingerprints must yield behaviorally equivalent Insertion
/// Scripts — this is a pure function of its five inputs, never of wall
/// clock or any process-local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(blake3::Hash);

impl Fingerprint {
    pub fn of(
        language: Language,
        kind: ConstructKind,
        body: &str,
        snippet_synthesis_version: u32,
        runtime_api_version: u32,
    ) -> Self {
        let normalized = normalize_body(language, body);
        let mut hasher = blake3::Hasher::new();
        hasher.update(language.as_str().as_bytes());
        hasher.update(kind.as_str().as_bytes());
        hasher.update(normalized.as_bytes());
        hasher.update(&snippet_synthesis_version.to_le_bytes());
        hasher.update(&runtime_api_version.to_le_bytes());
        Self(hasher.finalize())
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }

    /// Reconstruct from a raw hash, used only when deserializing a
    /// `ScriptRecord` from its hex-encoded on-disk form.
    pub fn from_hash(hash: blake3::Hash) -> Self {
        Self(hash)
    }

    /// First two hex characters, used as the on-disk cache's bucket
    /// directory so no single directory ends up with one entry per
    /// Construct ever generated.
    pub fn bucket(&self) -> String {
        self.to_hex()[..2].to_string()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Whitespace-collapsed, full-line-comment-stripped body text. Two
/// constructs that differ only in indentation or comments must fingerprint
/// identically, since the emitted telemetry call is the same either way.
fn normalize_body(language: Language, body: &str) -> String {
    let comment_prefix = match language {
        Language::Python => "#",
        Language::JavaScript | Language::TypeScript | Language::Go => "//",
    };
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(comment_prefix))
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fingerprint_is_stable_across_indentation_changes() {
        let a = Fingerprint::of(Language::Python, ConstructKind::Function, "def f(x):\n    return x", 1, 1);
        let b = Fingerprint::of(Language::Python, ConstructKind::Function, "def f(x):\n        return x", 1, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn fingerprint_ignores_full_line_comments() {
        let a = Fingerprint::of(Language::Python, ConstructKind::Function, "def f(x):\n    return x", 1, 1);
        let b = Fingerprint::of(
            Language::Python,
            ConstructKind::Function,
            "def f(x):\n    # a comment\n    return x",
            1,
            1,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn different_runtime_api_version_changes_the_fingerprint() {
        let a = Fingerprint::of(Language::Go, ConstructKind::Function, "func f() {}", 1, 1);
        let b = Fingerprint::of(Language::Go, ConstructKind::Function, "func f() {}", 1, 2);
        assert_ne!(a, b);
    }

    proptest! {
        /// Fingerprint::of is a pure function of its five inputs — equal
        /// inputs must always produce an equal fingerprint, never one
        /// that depends on wall clock or call order.
        #[test]
        fn fingerprint_is_deterministic_for_arbitrary_bodies(
            body in "[a-zA-Z0-9_(): \n]{0,120}",
            synthesis_version in 0u32..50,
            runtime_version in 0u32..50,
        ) {
            let a = Fingerprint::of(Language::Python, ConstructKind::Function, &body, synthesis_version, runtime_version);
            let b = Fingerprint::of(Language::Python, ConstructKind::Function, &body, synthesis_version, runtime_version);
            prop_assert_eq!(a, b);
        }

        /// Per-line leading indentation never changes the fingerprint,
        /// since two constructs differing only in indentation emit the
        /// same telemetry call.
        #[test]
        fn fingerprint_is_stable_under_arbitrary_reindentation(
            body in "[a-zA-Z0-9_]{1,20}(\n[a-zA-Z0-9_]{1,20}){0,4}",
            indent in 0usize..8,
        ) {
            let pad = " ".repeat(indent);
            let indented: String = body
                .lines()
                .map(|line| format!("{pad}{line}"))
                .collect::<Vec<_>>()
                .join("\n");
            let a = Fingerprint::of(Language::Go, ConstructKind::Function, &body, 1, 1);
            let b = Fingerprint::of(Language::Go, ConstructKind::Function, &indented, 1, 1);
            prop_assert_eq!(a, b);
        }
    }
}
