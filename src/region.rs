//! Splits a source file into host-code and shell-command regions.
//!
//! Walks the whole source once with the bang-open symbol set and, for
//! each bang found, scans forward for its close: the matching `)` when
//! the bang sits inside parentheses, a bare end-of-line otherwise.
//! Statement boundaries (end-of-line outside any bracket) are emitted
//! as plain host regions so later passes see one statement at a time.

use log::debug;

use crate::scanner::{Scanner, SymbolSet};

/// A shell-command occurrence inside a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BangCommand {
    /// Python expression preceding the flags, feeding stdin. Often
    /// empty.
    pub input_expr: String,
    /// Flag letters, without the trailing `!`.
    pub flags: String,
    /// Raw command text between the bang and its close.
    pub body: String,
}

/// A maximal span of source: host text, optionally followed by one
/// shell command.
///
/// Concatenating `host + input_expr + flags + "!" + body` over a
/// region sequence reconstructs the source exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub host: String,
    pub command: Option<BangCommand>,
}

/// Error produced while splitting regions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// The scan finished before consuming the whole source, which
    /// means a bang region never found a valid close.
    #[error("did not consume all of the source: <{tail}>")]
    Unterminated { tail: String },
}

/// Split a source string into its sequence of regions.
///
/// # Errors
///
/// Returns [`RegionError::Unterminated`] when a bang region has no
/// valid close (for example an unclosed `(flags! ...` expression).
pub fn split_regions(source: &str) -> Result<Vec<Region>, RegionError> {
    let mut regions = Vec::new();
    let mut last_cut = 0;

    for open in Scanner::new(source, SymbolSet::BangOpen, 0) {
        if open.quoted || open.capture.start < last_cut {
            continue;
        }

        let text = &source[open.capture.clone()];
        if let Some(flags) = text.strip_suffix('!') {
            // Found a bang; look for the end of the expression.
            for close in Scanner::new(source, SymbolSet::BangClose, open.capture.end) {
                if close.quoted || close.depth > 0 {
                    continue;
                }
                if open.depth > 0 && &source[close.capture.clone()] != ")" {
                    // Inside `(flags! ...)`: wait for the closing
                    // parenthesis, not a bare end-of-line.
                    continue;
                }

                let bang_start = open.capture.start;
                let cmd_start = open.capture.end;
                let stop = close.capture.start;
                // Parenthesis-wrapped: the input expression reaches
                // back to the opening paren, which stays in host text.
                // The paren may sit inside an already-consumed region
                // (pathological nesting); clamp to keep the partition.
                let in_start = match open.open_end {
                    Some(end) if open.depth > 0 => end.max(last_cut),
                    _ => bang_start,
                };

                regions.push(Region {
                    host: source[last_cut..in_start].to_string(),
                    command: Some(BangCommand {
                        input_expr: source[in_start..bang_start].to_string(),
                        flags: flags.to_string(),
                        body: source[cmd_start..stop].to_string(),
                    }),
                });
                last_cut = stop;
                break;
            }
        } else if open.depth == 0 {
            // End of a statement: emit the host text through the
            // end-of-line match.
            let stop = open.capture.end;
            regions.push(Region {
                host: source[last_cut..stop].to_string(),
                command: None,
            });
            last_cut = stop;
        }
    }

    if last_cut != source.len() {
        return Err(RegionError::Unterminated {
            tail: source[last_cut..].to_string(),
        });
    }
    debug!("split source into {} regions", regions.len());
    Ok(regions)
}
