//! Renders parsed arguments and dollar references into Python
//! expressions.

use std::fmt::Write as _;

use crate::color::Palette;
use crate::command::Argument;
use crate::scanner::is_word;

/// Evaluation mode for dollar references.
///
/// Strict lookups raise immediately when the value is absent; soft
/// lookups yield a `MissingValue` placeholder that only fails on
/// first real use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    Strict,
    Soft,
}

/// Error produced while rendering an argument or expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// A quoted argument opened with `"` but never closed.
    #[error("dangling quote: {0}")]
    DanglingQuote(String),
    /// An embedded expression with a leading or trailing brace but
    /// not both.
    #[error("malformed expression: {0}")]
    MalformedExpression(String),
}

/// Escape a string for embedding in a double-quoted Python literal:
/// backslashes and both quote characters gain a backslash prefix.
#[must_use]
pub fn escape_py(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '\'' | '"') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render an argument literal: strip the outer quotes of a
/// double-quoted argument, then escape for embedding.
fn render_literal(arg: &str) -> Result<String, RenderError> {
    let arg = arg.trim();
    if let Some(stripped) = arg.strip_prefix('"') {
        let inner = stripped
            .strip_suffix('"')
            .ok_or_else(|| RenderError::DanglingQuote(arg.to_string()))?;
        Ok(escape_py(inner))
    } else {
        Ok(escape_py(arg))
    }
}

/// Render one embedded expression into Python: `{...}` contents
/// expand softly, explicit `$` references expand strictly.
pub fn render_expr(expr: &str) -> Result<String, RenderError> {
    let braced = expr.starts_with('{');
    if braced != expr.ends_with('}') {
        return Err(RenderError::MalformedExpression(expr.to_string()));
    }
    if braced {
        Ok(expand_dollar(&expr[1..expr.len() - 1], Strictness::Soft))
    } else if expr.starts_with('$') {
        Ok(expand_dollar(expr, Strictness::Strict))
    } else {
        Err(RenderError::MalformedExpression(expr.to_string()))
    }
}

/// Render a full argument into a Python expression string.
///
/// A plain argument becomes a quoted literal; a lone expression
/// becomes `str(expr)`; a mix becomes a `format()` call on the
/// placeholder template.
pub fn render_argument(arg: &Argument, palette: &Palette) -> Result<String, RenderError> {
    let literal = render_literal(&arg.template)?;
    if arg.exprs.is_empty() {
        return Ok(format!("\"{}\"", palette.orange(&literal)));
    }
    let rendered: Vec<String> = arg
        .exprs
        .iter()
        .map(|e| render_expr(e).map(|r| palette.green(&r)))
        .collect::<Result<_, _>>()?;
    if arg.template == "{}" {
        // A single expression with no surrounding text needs no
        // format() wrapper, only stringification.
        return Ok(format!("str({})", rendered[0]));
    }
    Ok(format!(
        "\"{}\".format({})",
        palette.orange(&literal),
        rendered.join(", ")
    ))
}

/// Rewrite `$1`, `$*` and `$name` references in Python text into
/// their lookup expressions. Everything else passes through
/// untouched.
#[must_use]
pub fn expand_dollar(py: &str, strictness: Strictness) -> String {
    let bytes = py.as_bytes();
    let mut out = String::with_capacity(py.len());
    let mut flushed = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' || i + 1 >= bytes.len() {
            i += 1;
            continue;
        }
        let next = bytes[i + 1];
        if next == b'*' {
            out.push_str(&py[flushed..i]);
            out.push_str("sys.argv[1:]");
            i += 2;
            flushed = i;
        } else if next.is_ascii_digit() {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            out.push_str(&py[flushed..i]);
            let index = &py[i + 1..j];
            match strictness {
                Strictness::Strict => {
                    let _ = write!(out, "sys.argv[{index}]");
                }
                Strictness::Soft => {
                    let _ = write!(out, "softindex(sys.argv, {index})");
                }
            }
            i = j;
            flushed = i;
        } else if is_word(next) {
            let mut j = i + 1;
            while j < bytes.len() && is_word(bytes[j]) {
                j += 1;
            }
            out.push_str(&py[flushed..i]);
            let name = &py[i + 1..j];
            match strictness {
                Strictness::Strict => {
                    let _ = write!(out, "os.environ[\"{name}\"]");
                }
                Strictness::Soft => {
                    let _ = write!(out, "softget(os.environ, \"{name}\")");
                }
            }
            i = j;
            flushed = i;
        } else {
            i += 1;
        }
    }
    out.push_str(&py[flushed..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_leaves_plain_text() {
        assert_eq!(escape_py("nothing"), "nothing");
        assert_eq!(escape_py("with spaces"), "with spaces");
        assert_eq!(escape_py(""), "");
    }

    #[test]
    fn escape_doubles_specials() {
        assert_eq!(escape_py("with \\s"), "with \\\\s");
        assert_eq!(escape_py("keep \"d\" and 's'"), "keep \\\"d\\\" and \\'s\\'");
        assert_eq!(escape_py("with \\\"s"), "with \\\\\\\"s");
    }

    #[test]
    fn literal_strips_outer_quotes() {
        assert_eq!(render_literal("\"a b\"").expect("render"), "a b");
        assert_eq!(render_literal("plain").expect("render"), "plain");
    }

    #[test]
    fn dangling_quote_is_an_error() {
        let err = render_literal("\"oops").expect_err("must fail");
        assert!(matches!(err, RenderError::DanglingQuote(_)));
    }

    #[test]
    fn strict_references() {
        assert_eq!(
            expand_dollar("$1 $* $HOME", Strictness::Strict),
            "sys.argv[1] sys.argv[1:] os.environ[\"HOME\"]"
        );
    }

    #[test]
    fn soft_references() {
        assert_eq!(
            expand_dollar("$1 $* $HOME", Strictness::Soft),
            "softindex(sys.argv, 1) sys.argv[1:] softget(os.environ, \"HOME\")"
        );
    }

    #[test]
    fn lone_dollar_passes_through() {
        assert_eq!(expand_dollar("a $ b", Strictness::Soft), "a $ b");
        assert_eq!(expand_dollar("cost$", Strictness::Soft), "cost$");
    }

    #[test]
    fn digits_stop_a_positional_reference() {
        assert_eq!(
            expand_dollar("$2nd", Strictness::Strict),
            "sys.argv[2]nd"
        );
    }

    #[test]
    fn brace_expression_renders_softly() {
        assert_eq!(
            render_expr("{$HOME}").expect("render"),
            "softget(os.environ, \"HOME\")"
        );
    }

    #[test]
    fn dollar_expression_renders_strictly() {
        assert_eq!(render_expr("$HOME").expect("render"), "os.environ[\"HOME\"]");
    }

    #[test]
    fn half_braced_expression_is_malformed() {
        assert!(matches!(
            render_expr("{oops"),
            Err(RenderError::MalformedExpression(_))
        ));
        assert!(matches!(
            render_expr("oops}"),
            Err(RenderError::MalformedExpression(_))
        ));
    }

    #[test]
    fn plain_argument_renders_quoted() {
        let arg = Argument {
            template: "plain".to_string(),
            exprs: Vec::new(),
        };
        let out = render_argument(&arg, &Palette::new(false)).expect("render");
        assert_eq!(out, "\"plain\"");
    }

    #[test]
    fn lone_expression_renders_as_str() {
        let arg = Argument {
            template: "{}".to_string(),
            exprs: vec!["{1+1}".to_string()],
        };
        let out = render_argument(&arg, &Palette::new(false)).expect("render");
        assert_eq!(out, "str(1+1)");
    }

    #[test]
    fn mixed_argument_renders_as_format() {
        let arg = Argument {
            template: "a_{}_{}".to_string(),
            exprs: vec!["{x}".to_string(), "$USER".to_string()],
        };
        let out = render_argument(&arg, &Palette::new(false)).expect("render");
        assert_eq!(out, "\"a_{}_{}\".format(x, os.environ[\"USER\"])");
    }

    #[test]
    fn literal_brace_sentinel_renders_as_quoted_braces() {
        let arg = Argument {
            template: "{}".to_string(),
            exprs: vec!["{\"{}\"}".to_string()],
        };
        let out = render_argument(&arg, &Palette::new(false)).expect("render");
        assert_eq!(out, "str(\"{}\")");
    }
}
