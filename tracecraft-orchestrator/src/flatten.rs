//! Flattens the analyzer's `Construct` tree into the single linear,
//! source-ordered sequence the attempt loop processes (spec.md §5:
//! "constructs are processed in source order").

use tracecraft_analysis::Construct;

/// Pre-order walk: a parent construct (e.g. a function) is yielded before
/// the constructs nested in its body. Each entry is processed and applied
/// independently — a nested loop inside a function is its own Script, not
/// part of the function's.
pub fn flatten(constructs: &[Construct]) -> Vec<&Construct> {
    let mut out = Vec::new();
    for construct in constructs {
        flatten_one(construct, &mut out);
    }
    out
}

fn flatten_one<'a>(construct: &'a Construct, out: &mut Vec<&'a Construct>) {
    out.push(construct);
    for child in &construct.children {
        flatten_one(child, out);
    }
}
