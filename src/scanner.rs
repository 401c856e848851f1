//! Quote- and bracket-aware symbol scanner.
//!
//! A single-pass matcher over a fixed symbol set. It walks the input
//! once, toggling quote state and maintaining a count-based bracket
//! stack for every symbol it sees, and yields one [`Scan`] per capture
//! occurrence with the enclosing state at that point. Captures found
//! inside quotes are still yielded (with `quoted` set) so that callers
//! decide whether to honor them.
//!
//! Bracket depth is tracked by count only: `(`, `{` and `[` are
//! interchangeable for depth accounting. Backslash escapes of quote
//! characters are not interpreted.

use std::ops::Range;

/// Symbol sets the scanner can match, one per scanning context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolSet {
    /// Captures a word run ending in `!` (but not `!=`) or an
    /// end-of-line, optionally preceded by whitespace and a `#`
    /// comment. Tracks parentheses and quotes.
    BangOpen,
    /// Captures a lone `)` or an end-of-line. Tracks every bracket
    /// kind and quotes.
    BangClose,
    /// Captures a whitespace run, `{`, `>`, or `$`. Tracks quotes
    /// only.
    ExprOpen,
    /// Captures `}`. Tracks curly braces and quotes.
    ExprClose,
    /// Captures a maximal run of word characters. Tracks nothing
    /// else.
    DollarWord,
}

impl SymbolSet {
    /// Whether this set matches a zero-width end-of-line symbol.
    const fn has_eol(self) -> bool {
        matches!(self, Self::BangOpen | Self::BangClose)
    }

    /// Bracket characters visible to this set.
    const fn brackets(self) -> (&'static [u8], &'static [u8]) {
        match self {
            Self::BangOpen => (b"(", b")"),
            Self::BangClose => (b"({[", b")}]"),
            Self::ExprClose => (b"{", b"}"),
            Self::ExprOpen | Self::DollarWord => (b"", b""),
        }
    }

    /// Whether quote characters toggle quoting state in this set.
    const fn tracks_quotes(self) -> bool {
        !matches!(self, Self::DollarWord)
    }
}

/// One capture occurrence together with the scanner state at the
/// moment it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scan {
    /// Byte range of the captured text. May be empty for zero-width
    /// end-of-line captures.
    pub capture: Range<usize>,
    /// True when the capture lies inside an active quote.
    pub quoted: bool,
    /// Unmatched opening brackets pending at the capture.
    pub depth: usize,
    /// End offset of the innermost pending opening bracket.
    pub open_end: Option<usize>,
}

/// Iterator over the captures of one symbol set, from a starting
/// offset to the end of input.
pub struct Scanner<'a> {
    input: &'a [u8],
    set: SymbolSet,
    pos: usize,
    in_quotes: bool,
    in_dquotes: bool,
    /// End offsets of pending opening brackets.
    stack: Vec<usize>,
}

impl<'a> Scanner<'a> {
    #[must_use]
    pub const fn new(input: &'a str, set: SymbolSet, pos: usize) -> Self {
        Self {
            input: input.as_bytes(),
            set,
            pos,
            in_quotes: false,
            in_dquotes: false,
            stack: Vec::new(),
        }
    }

    const fn quoted(&self) -> bool {
        self.in_quotes || self.in_dquotes
    }

    fn scan_at(&self, capture: Range<usize>) -> Scan {
        Scan {
            capture,
            quoted: self.quoted(),
            depth: self.stack.len(),
            open_end: self.stack.last().copied(),
        }
    }

    /// Emit a capture: snapshot the state, then apply the bracket
    /// side effect of the captured text itself (a captured `)` still
    /// pops, a captured `{` still pushes).
    fn emit(&mut self, capture: Range<usize>) -> Scan {
        let scan = self.scan_at(capture.clone());
        if capture.len() == 1 && !self.quoted() {
            let (openings, closings) = self.set.brackets();
            let c = self.input[capture.start];
            if openings.contains(&c) {
                self.stack.push(capture.end);
            } else if closings.contains(&c) && !self.stack.is_empty() {
                self.stack.pop();
            }
        }
        // A zero-width capture advances by one so scanning makes
        // progress; a sized one resumes at its end.
        self.pos = if capture.is_empty() {
            capture.start + 1
        } else {
            capture.end
        };
        scan
    }

    /// Try to match a capture alternative at the current position.
    /// Returns the capture range, or `None` when the position holds
    /// no capture (the caller then handles brackets and quotes).
    /// `Some` with an advanced `skip` means "no symbol possible up to
    /// `skip`".
    fn capture_at(&self, pos: usize) -> CaptureResult {
        match self.set {
            SymbolSet::BangOpen => self.bang_open_at(pos),
            SymbolSet::BangClose => Self::bang_close_at(self.input, pos),
            SymbolSet::ExprOpen => Self::expr_open_at(self.input, pos),
            SymbolSet::ExprClose => {
                if self.input[pos] == b'}' {
                    CaptureResult::Capture(pos..pos + 1)
                } else {
                    CaptureResult::None
                }
            }
            SymbolSet::DollarWord => {
                if is_word(self.input[pos]) {
                    CaptureResult::Capture(pos..word_end(self.input, pos))
                } else {
                    CaptureResult::None
                }
            }
        }
    }

    fn bang_open_at(&self, pos: usize) -> CaptureResult {
        let input = self.input;
        let b = input[pos];
        if is_word(b) {
            let end = word_end(input, pos);
            if input.get(end) == Some(&b'!') && input.get(end + 1) != Some(&b'=') {
                return CaptureResult::Capture(pos..end + 1);
            }
            // No symbol can begin inside a word run.
            return CaptureResult::Skip(end);
        }
        if b == b'!' {
            if input.get(pos + 1) == Some(&b'=') {
                return CaptureResult::Skip(pos + 1);
            }
            return CaptureResult::Capture(pos..pos + 1);
        }
        if is_space(b) || b == b'#' {
            return Self::eol_at(input, pos);
        }
        CaptureResult::None
    }

    /// End-of-line alternative: optional whitespace, optional `#`
    /// comment, anchored at a newline or end of input. Greedy over
    /// the whitespace run, backtracking to the last newline in it.
    fn eol_at(input: &[u8], pos: usize) -> CaptureResult {
        let mut j = pos;
        while j < input.len() && is_space(input[j]) {
            j += 1;
        }
        if j < input.len() && input[j] == b'#' {
            let mut k = j;
            while k < input.len() && input[k] != b'\n' {
                k += 1;
            }
            return CaptureResult::Capture(pos..k);
        }
        if j == input.len() {
            return CaptureResult::Capture(pos..j);
        }
        // Whitespace followed by regular text: anchor at the last
        // newline inside the run, if any.
        input[pos..j]
            .iter()
            .rposition(|&c| c == b'\n')
            .map_or(CaptureResult::Skip(j), |off| {
                CaptureResult::Capture(pos..pos + off)
            })
    }

    fn bang_close_at(input: &[u8], pos: usize) -> CaptureResult {
        match input[pos] {
            b')' => CaptureResult::Capture(pos..pos + 1),
            b'\n' => CaptureResult::Capture(pos..pos),
            _ => CaptureResult::None,
        }
    }

    fn expr_open_at(input: &[u8], pos: usize) -> CaptureResult {
        let b = input[pos];
        if is_space(b) {
            let mut j = pos;
            while j < input.len() && is_space(input[j]) {
                j += 1;
            }
            return CaptureResult::Capture(pos..j);
        }
        if matches!(b, b'{' | b'>' | b'$') {
            return CaptureResult::Capture(pos..pos + 1);
        }
        CaptureResult::None
    }
}

enum CaptureResult {
    Capture(Range<usize>),
    Skip(usize),
    None,
}

impl Iterator for Scanner<'_> {
    type Item = Scan;

    fn next(&mut self) -> Option<Scan> {
        while self.pos <= self.input.len() {
            if self.pos == self.input.len() {
                // Terminal zero-width end-of-line capture; `emit`
                // pushes `pos` past the end so it fires once.
                if self.set.has_eol() {
                    return Some(self.emit(self.pos..self.pos));
                }
                return None;
            }
            match self.capture_at(self.pos) {
                CaptureResult::Capture(range) => return Some(self.emit(range)),
                CaptureResult::Skip(next) => {
                    self.pos = next;
                    continue;
                }
                CaptureResult::None => {}
            }

            let c = self.input[self.pos];
            if self.set.tracks_quotes() && c == b'\'' {
                self.in_quotes = !self.in_quotes;
            } else if self.set.tracks_quotes() && c == b'"' {
                self.in_dquotes = !self.in_dquotes;
            } else if !self.quoted() {
                let (openings, closings) = self.set.brackets();
                if openings.contains(&c) {
                    self.stack.push(self.pos + 1);
                } else if closings.contains(&c) && !self.stack.is_empty() {
                    self.stack.pop();
                }
            }
            self.pos += 1;
        }
        None
    }
}

pub(crate) const fn is_word(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub(crate) const fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b'\x0b' | b'\x0c')
}

fn word_end(input: &[u8], pos: usize) -> usize {
    let mut end = pos;
    while end < input.len() && is_word(input[end]) {
        end += 1;
    }
    end
}
