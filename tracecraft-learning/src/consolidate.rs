//! Pattern consolidation: group records by (language, construct kind,
//! failure pattern), promote groups past the occurrence threshold.
//!
//! Two passes, the same shape `FrameworkLearner` uses for convention
//! detection: first accumulate frequency per group, then derive the
//! representative examples for every group that clears the threshold.

use rustc_hash::FxHashMap;

use crate::record::LearningRecord;
use crate::store::Pattern;

/// Consolidate `records` into Patterns. A group (language, construct kind,
/// failure pattern) is promoted once it has at least `min_occurrences`
/// records (default 2 per spec.md §4.9).
pub fn consolidate(records: &[LearningRecord], min_occurrences: usize) -> Vec<Pattern> {
    let mut groups: FxHashMap<(tracecraft_core::types::language::Language, tracecraft_analysis::ConstructKind, String), Vec<&LearningRecord>> =
        FxHashMap::default();

    for record in records.iter().filter(|r| !r.failure_pattern.is_empty()) {
        groups
            .entry((record.language, record.construct_kind, record.failure_pattern.clone()))
            .or_default()
            .push(record);
    }

    let mut patterns = Vec::new();
    for ((language, construct_kind, failure_pattern), group) in groups {
        if group.len() < min_occurrences {
            continue;
        }
        patterns.push(build_pattern(language, construct_kind, failure_pattern, &group));
    }
    patterns
}

fn build_pattern(
    language: tracecraft_core::types::language::Language,
    construct_kind: tracecraft_analysis::ConstructKind,
    failure_pattern: String,
    group: &[&LearningRecord],
) -> Pattern {
    let occurrence_count = group.len();

    // Most frequent bad example: the failing snippet excerpt that recurs
    // most often within this group.
    let mut bad_counts: FxHashMap<&str, usize> = FxHashMap::default();
    for record in group.iter().filter(|r| !r.success) {
        *bad_counts.entry(record.snippet_excerpt.as_str()).or_insert(0) += 1;
    }
    let bad_example = bad_counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(text, _)| text.to_string())
        .unwrap_or_default();

    // Best-rated good example: among successful attempts, the one with
    // the lowest attempt number (fewest retries needed to reach success),
    // breaking ties by recency.
    let good = group
        .iter()
        .filter(|r| r.success)
        .min_by_key(|r| (r.attempt, std::cmp::Reverse(r.timestamp)))
        .copied();

    let good_example = good.map(|r| r.snippet_excerpt.clone()).unwrap_or_default();
    let success_count = group.iter().filter(|r| r.success).count();
    let success_rate = success_count as f64 / occurrence_count as f64;

    let how = good
        .and_then(|r| r.fix_description.clone())
        .unwrap_or_else(|| "no recorded fix description yet".to_string());

    Pattern {
        language,
        construct_kind,
        failure_pattern,
        bad_example,
        good_example,
        why: format!("seen {occurrence_count} times across recent attempts"),
        how,
        occurrence_count,
        success_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tracecraft_analysis::ConstructKind;
    use tracecraft_core::types::language::Language;

    fn record(success: bool, attempt: u32, fix: Option<&str>) -> LearningRecord {
        LearningRecord {
            language: Language::Go,
            construct_kind: ConstructKind::Function,
            attempt,
            success,
            failure_pattern: "go_undefined_tel".to_string(),
            snippet_excerpt: if success { "good".into() } else { "bad".into() },
            fix_description: fix.map(str::to_string),
            timestamp: Utc::now(),
            content_hash: 0,
        }
    }

    #[test]
    fn group_below_threshold_is_not_promoted() {
        let records = vec![record(false, 1, None)];
        assert!(consolidate(&records, 2).is_empty());
    }

    #[test]
    fn group_at_threshold_produces_one_pattern_with_success_rate() {
        let records = vec![
            record(false, 1, None),
            record(false, 1, None),
            record(true, 2, Some("import the runtime package")),
        ];
        let patterns = consolidate(&records, 2);
        assert_eq!(patterns.len(), 1);
        let pattern = &patterns[0];
        assert_eq!(pattern.occurrence_count, 3);
        assert!((pattern.success_rate - (1.0 / 3.0)).abs() < 1e-9);
        assert_eq!(pattern.how, "import the runtime package");
    }
}
