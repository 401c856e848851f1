#![allow(dead_code)]

use pybang::{Options, expand_source};

/// Helper: expand a source with default options, panicking with the
/// source on failure.
pub fn expand(source: &str) -> String {
    expand_source(source, &Options::default())
        .unwrap_or_else(|e| panic!("expand failed: {e}\n--- source ---\n{source}"))
}

/// Helper: expand a source and assert the generated program body.
pub fn assert_expands(source: &str, expected: &str) {
    let output = expand(source);
    assert_eq!(
        output, expected,
        "expansion mismatch:\n--- source ---\n{source}\n\
         --- expected ---\n{expected}\n--- got ---\n{output}"
    );
}
