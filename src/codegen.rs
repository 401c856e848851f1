//! Assembles call expressions for shell regions and expands whole
//! sources.

use log::trace;

use crate::Error;
use crate::color::Palette;
use crate::command::parse_command;
use crate::preamble::preamble;
use crate::region::{BangCommand, split_regions};
use crate::render::{RenderError, Strictness, expand_dollar, render_argument};

/// Compilation options, passed explicitly to every entry point.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Substitute a no-op `echo` for every real invocation.
    pub dry_run: bool,
    /// Decorate generated code fragments with ANSI colors.
    pub color: bool,
}

/// Flags that already request some form of output capture.
const OUTPUT_FLAGS: [char; 3] = ['o', 'e', 'r'];

/// Select the output-conversion function for a flag string. The
/// two-letter combinations are substring matches and beat their
/// single letters; any splitting converter beats a numeric one.
fn flags_to_converter(flags: &str) -> &'static str {
    if flags.contains("lf") {
        "split_lines_fields"
    } else if flags.contains("fl") {
        "split_fields_lines"
    } else if flags.contains('l') {
        "str.splitlines"
    } else if flags.contains('f') {
        "str.split"
    } else if flags.contains('j') {
        "json.loads"
    } else if flags.contains('d') {
        "float"
    } else if flags.contains('i') {
        "int"
    } else {
        "None"
    }
}

/// Wrap a raw file expression in an `open()` call, soft-expanding
/// dollar references in it.
fn render_file(raw: &str, mode: char) -> String {
    format!("open({}, \"{mode}\")", expand_dollar(raw, Strictness::Soft))
}

/// Compile one shell command into a `bang_call` expression.
///
/// `in_expression` marks a command embedded in a host expression
/// rather than standing as a bare statement; such commands capture
/// stdout by default so the call yields a usable value.
///
/// # Errors
///
/// Returns [`RenderError`] when an argument literal or embedded
/// expression cannot be rendered.
pub fn compile_command(
    cmd: &BangCommand,
    in_expression: bool,
    opts: &Options,
) -> Result<String, RenderError> {
    let palette = Palette::new(opts.color);
    let mut flags = cmd.flags.clone();

    // Input as a Python expression: a file to read, data, or nothing.
    let in_expr = cmd.input_expr.trim();
    let infile = in_expr.strip_suffix('>').map_or_else(
        || {
            if in_expr.is_empty() {
                "None".to_string()
            } else {
                in_expr.to_string()
            }
        },
        |path| render_file(path, 'r'),
    );

    let parsed = parse_command(cmd.body.trim(), &flags);
    let mut must_capture = in_expression;
    let outfile = parsed.redirect.as_ref().map_or_else(
        || "None".to_string(),
        |target| {
            must_capture = true;
            render_file(target, 'w')
        },
    );

    if must_capture && !flags.chars().any(|f| OUTPUT_FLAGS.contains(&f)) {
        flags.push('o'); // Capture stdout by default inside expressions.
    }

    let mut args = parsed
        .args
        .iter()
        .map(|arg| render_argument(arg, &palette))
        .collect::<Result<Vec<_>, _>>()?;
    if opts.dry_run {
        args.insert(0, "\"echo\"".to_string());
    }

    let convert = flags_to_converter(&flags);
    let call = format!(
        "bang_call([{}], \"{flags}\", ({infile}), {convert}, {outfile})",
        args.join(", ")
    );
    trace!("compiled command with flags {flags:?}");
    Ok(call)
}

/// Expand every shell region of a source into host-language calls,
/// and rewrite dollar references in the host text to soft lookups.
///
/// # Errors
///
/// Returns [`enum@Error`] on an unterminated bang region or an
/// unrenderable argument.
pub fn expand_source(source: &str, opts: &Options) -> Result<String, Error> {
    let palette = Palette::new(opts.color);
    let mut out = String::new();

    for region in split_regions(source)? {
        out.push_str(&expand_dollar(&region.host, Strictness::Soft));
        let Some(cmd) = &region.command else {
            continue;
        };
        if cmd.body.is_empty() {
            continue;
        }
        let stripped = region.host.trim();
        let in_expression = !stripped.is_empty() && stripped != "(";
        out.push_str(&palette.gray(&compile_command(cmd, in_expression, opts)?));
    }
    Ok(out)
}

/// Compile a full source: the helper preamble followed by the
/// expanded program body.
///
/// # Errors
///
/// Returns [`enum@Error`] on an unterminated bang region or an
/// unrenderable argument.
pub fn compile_str(source: &str, opts: &Options) -> Result<String, Error> {
    let mut out = preamble();
    out.push_str(&expand_source(source, opts)?);
    Ok(out)
}
