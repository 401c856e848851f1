//! Splits a shell command body into arguments and embedded
//! expressions.
//!
//! Arguments are separated by unquoted whitespace. Inside an argument,
//! `{...}` spans (brace-balanced, quote-aware) and `$word` references
//! become embedded expressions, replaced in the argument's literal
//! template by a `{}` placeholder. An unquoted `>` stops argument
//! parsing: the rest of the body is the output-destination expression.

use crate::scanner::{Scanner, SymbolSet};

/// One command argument: a literal template with `{}` placeholders and
/// the embedded expressions filling them, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub template: String,
    pub exprs: Vec<String>,
}

/// Result of parsing a command body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    pub args: Vec<Argument>,
    /// Trailing `> expr` output destination, trimmed, if present.
    pub redirect: Option<String>,
}

enum Found<'a> {
    /// Unquoted whitespace: argument boundary.
    Boundary,
    /// Unquoted `>`: the rest is the output destination.
    Redirect,
    /// A `{...}` or `$word` embedded expression.
    Expr(&'a str),
}

/// Parse a command body into arguments, honoring the flag string:
/// shell-mode flags (`s` or `h`) suppress `$` parsing so the external
/// shell performs its own substitution.
#[must_use]
pub fn parse_command(body: &str, flags: &str) -> ParsedCommand {
    let parse_dollar = !flags.contains('s') && !flags.contains('h');
    let mut parsed = ParsedCommand::default();
    let mut template = String::new();
    let mut exprs = Vec::new();

    let mut flush = |template: &mut String, exprs: &mut Vec<String>, args: &mut Vec<Argument>| {
        if !template.is_empty() {
            args.push(Argument {
                template: std::mem::take(template),
                exprs: std::mem::take(exprs),
            });
        }
    };

    let mut rest = body;
    while !rest.is_empty() {
        let (before, found, after) = next_symbol(rest, parse_dollar);
        template.push_str(before);
        match found {
            None => {}
            Some(Found::Redirect) => {
                flush(&mut template, &mut exprs, &mut parsed.args);
                parsed.redirect = Some(after.trim().to_string());
                return parsed;
            }
            Some(Found::Boundary) => {
                flush(&mut template, &mut exprs, &mut parsed.args);
            }
            Some(Found::Expr(expr)) => {
                template.push_str("{}");
                // A literal `{}` argument piece is re-quoted so it
                // survives the format() substitution.
                if expr == "{}" {
                    exprs.push("{\"{}\"}".to_string());
                } else {
                    exprs.push(expr.to_string());
                }
            }
        }
        rest = after;
    }
    flush(&mut template, &mut exprs, &mut parsed.args);
    parsed
}

/// Extract the next embedded expression, argument boundary, or
/// redirection marker from `s`. Returns the text before the symbol,
/// the symbol (or `None` when the rest is plain text), and the text
/// after it.
fn next_symbol(s: &str, parse_dollar: bool) -> (&str, Option<Found<'_>>, &str) {
    for open in Scanner::new(s, SymbolSet::ExprOpen, 0) {
        let start = open.capture.start;
        let end = open.capture.end;
        let text = &s[open.capture.clone()];

        if text == "{" {
            for close in Scanner::new(s, SymbolSet::ExprClose, end) {
                if !close.quoted && close.depth == 0 {
                    let stop = close.capture.end;
                    return (&s[..start], Some(Found::Expr(&s[start..stop])), &s[stop..]);
                }
            }
            break; // No matching brace: treat the rest as plain text.
        }
        if text == "$" {
            if !parse_dollar {
                continue;
            }
            if let Some(close) = Scanner::new(s, SymbolSet::DollarWord, end).next() {
                let stop = close.capture.end;
                return (&s[..start], Some(Found::Expr(&s[start..stop])), &s[stop..]);
            }
            break;
        }
        // Whitespace and `>` are plain characters inside quotes.
        if !open.quoted {
            if text == ">" {
                return (&s[..start], Some(Found::Redirect), &s[end..]);
            }
            return (&s[..start], Some(Found::Boundary), &s[end..]);
        }
    }
    (s, None, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn templates(parsed: &ParsedCommand) -> Vec<&str> {
        parsed.args.iter().map(|a| a.template.as_str()).collect()
    }

    #[test]
    fn splits_on_whitespace() {
        let parsed = parse_command("echo a  b", "");
        assert_eq!(templates(&parsed), vec!["echo", "a", "b"]);
    }

    #[test]
    fn brace_expression_and_dollar_reference() {
        let parsed = parse_command("echo {1+1} plain $HOME", "");
        assert_eq!(templates(&parsed), vec!["echo", "{}", "plain", "{}"]);
        assert_eq!(parsed.args[1].exprs, vec!["{1+1}"]);
        assert_eq!(parsed.args[3].exprs, vec!["$HOME"]);
    }

    #[test]
    fn quoted_whitespace_stays_in_argument() {
        let parsed = parse_command("echo \"a b\" c", "");
        assert_eq!(templates(&parsed), vec!["echo", "\"a b\"", "c"]);
    }

    #[test]
    fn expression_mixed_with_text() {
        let parsed = parse_command("prefix_{x}_suffix", "");
        assert_eq!(parsed.args[0].template, "prefix_{}_suffix");
        assert_eq!(parsed.args[0].exprs, vec!["{x}"]);
    }

    #[test]
    fn nested_braces_span_one_expression() {
        let parsed = parse_command("show {d['k']} end", "");
        assert_eq!(parsed.args[1].exprs, vec!["{d['k']}"]);
    }

    #[test]
    fn literal_braces_become_sentinel() {
        let parsed = parse_command("find . -exec cat {} +", "");
        let arg = &parsed.args[4];
        assert_eq!(arg.template, "{}");
        assert_eq!(arg.exprs, vec!["{\"{}\"}"]);
    }

    #[test]
    fn redirect_target_is_split_off() {
        let parsed = parse_command("cat file > \"out.txt\"", "");
        assert_eq!(templates(&parsed), vec!["cat", "file"]);
        assert_eq!(parsed.redirect.as_deref(), Some("\"out.txt\""));
    }

    #[test]
    fn quoted_redirect_is_an_argument_character() {
        let parsed = parse_command("echo \"a > b\"", "");
        assert_eq!(templates(&parsed), vec!["echo", "\"a > b\""]);
        assert!(parsed.redirect.is_none());
    }

    #[test]
    fn shell_mode_keeps_dollars_literal() {
        let parsed = parse_command("echo $A", "s");
        assert_eq!(templates(&parsed), vec!["echo", "$A"]);
        assert!(parsed.args[1].exprs.is_empty());
    }

    #[test]
    fn dollar_parsing_enabled_by_default() {
        let parsed = parse_command("echo $A", "o");
        assert_eq!(parsed.args[1].exprs, vec!["$A"]);
    }

    #[test]
    fn unclosed_brace_is_plain_text() {
        let parsed = parse_command("echo {oops", "");
        assert_eq!(templates(&parsed), vec!["echo", "{oops"]);
        assert!(parsed.args[1].exprs.is_empty());
    }
}
