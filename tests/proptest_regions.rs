//! Property-based tests with proptest.
//!
//! Region splitting never loses or duplicates text: whenever a source
//! splits successfully, concatenating each region's host text and
//! command pieces must rebuild the source byte for byte. Sources with
//! no special characters must also expand to themselves.

use proptest::prelude::*;
use pybang::{Options, Region, expand_source, split_regions};

fn rebuild(regions: &[Region]) -> String {
    let mut out = String::new();
    for region in regions {
        out.push_str(&region.host);
        if let Some(cmd) = &region.command {
            out.push_str(&cmd.input_expr);
            out.push_str(&cmd.flags);
            out.push('!');
            out.push_str(&cmd.body);
        }
    }
    out
}

proptest! {
    /// Splitting partitions the source: no byte is dropped, invented,
    /// or reordered.
    #[test]
    fn split_partitions_any_source(source in ".*") {
        if let Ok(regions) = split_regions(&source) {
            prop_assert_eq!(rebuild(&regions), source);
        }
    }

    /// Sources without bangs, dollars, comments, quotes or brackets
    /// pass through expansion untouched.
    #[test]
    fn plain_sources_expand_to_themselves(source in "[a-z0-9 ._=,:\\n]{0,64}") {
        let out = expand_source(&source, &Options::default()).expect("expand failed");
        prop_assert_eq!(out, source);
    }

    /// Splitting is total modulo the unterminated-region error: it
    /// must never panic, whatever the input.
    #[test]
    fn split_never_panics(source in "[(){}\\[\\]\"'!$#>a-z \\n]{0,48}") {
        let _ = split_regions(&source);
    }
}
