//! Region splitting over realistic whole scripts.

use pybang::{Region, RegionError, split_regions};

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

#[test]
fn realistic_script_partitions_exactly() {
    let source = "\
import time

start = time.time()
! mkdir -p build
files = (l! ls build)
for f in files:
    print(f)
# done!
print(\"took\", time.time() - start)
";
    let regions = split_regions(source).expect("split failed");
    assert_eq!(rebuild(&regions), source);
}

#[test]
fn commands_are_found_in_source_order() {
    let source = "! first\nx = (o! second)\n(\"data\" i! third)\n";
    let regions = split_regions(source).expect("split failed");
    let flags: Vec<String> = regions
        .iter()
        .filter_map(|r| r.command.as_ref())
        .map(|c| c.flags.clone())
        .collect();
    assert_eq!(flags, vec!["", "o", "i"]);
}

#[test]
fn quotes_hide_bangs_and_brackets() {
    let source = "a = \"( ho! \"\nb = 'why!'\n";
    let regions = split_regions(source).expect("split failed");
    assert!(regions.iter().all(|r| r.command.is_none()));
    assert_eq!(rebuild(&regions), source);
}

#[test]
fn brackets_keep_a_statement_open_across_lines() {
    let source = "xs = f(\n    1,\n    2,\n)\n! wc -l\n";
    let regions = split_regions(source).expect("split failed");
    // The parenthesised call must not be cut at its inner newlines.
    assert_eq!(rebuild(&regions), source);
    let cmds: Vec<_> = regions.iter().filter_map(|r| r.command.as_ref()).collect();
    assert_eq!(cmds.len(), 1);
    assert_eq!(cmds[0].body, " wc -l");
}

#[test]
fn unclosed_paren_command_reports_the_tail() {
    let err = split_regions("before = 1\nx = (o! ls\n").expect_err("must fail");
    let RegionError::Unterminated { tail } = err;
    assert!(tail.contains("x = (o! ls"));
    assert!(!tail.contains("before"));
}
