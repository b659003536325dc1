//! Single-pass range scanner.
//!
//! Walks lines in order and bytes left to right, keeping one lexical [`Mode`]
//! at a time. Every position is checked against the rules below in a fixed
//! order; the first rule that applies decides what happens:
//!
//! 1. `//` in code skips the rest of the line
//! 2. `*/` inside a block comment closes it
//! 3. anything else inside a block comment is skipped
//! 4. `/*` outside a block comment opens one (even inside a string)
//! 5. the opening quote inside a string closes it unless preceded by `\`
//! 6. anything else inside a string is skipped
//! 7. `'` or `"` in code opens a string
//! 8. `{` in code pushes its line
//! 9. `}` in code pops the innermost open line; stray `}` are ignored
//!
//! All delimiters are ASCII, so scanning UTF-8 bytes never splits a delimiter
//! and never mistakes a continuation byte for one.

use serde::Serialize;

use super::source::{LineSource, TextLines};

/// What kind of delimiter pair produced a [`Match`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// `{ ... }`, and also multi-line string literals
    BraceBlock,
    /// `/* ... */`
    BlockComment,
}

impl MatchKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::BraceBlock => "brace_block",
            MatchKind::BlockComment => "block_comment",
        }
    }
}

/// A delimiter pair whose opening and closing lines differ
///
/// `start` is the zero-based line holding the opening delimiter, `end` the
/// line holding the closing one. `end > start` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub kind: MatchKind,
}

impl Match {
    #[must_use]
    pub fn new(start: usize, end: usize, kind: MatchKind) -> Self {
        Self { start, end, kind }
    }

    /// Number of lines between the opening and closing delimiter lines
    #[must_use]
    pub fn span(&self) -> usize {
        self.end - self.start
    }
}

/// Lexical context at the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Mode {
    #[default]
    Code,
    BlockComment {
        start: usize,
    },
    Str {
        start: usize,
        quote: u8,
    },
}

/// Outcome of examining one position
enum Step {
    Advance(usize),
    EndOfLine,
}

/// Scanner state for one pass; dropped when the pass returns
#[derive(Debug, Default)]
struct RangeScanner {
    mode: Mode,
    braces: Vec<usize>,
    matches: Vec<Match>,
}

impl RangeScanner {
    fn scan_line(&mut self, line_index: usize, line: &str) {
        let bytes = line.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            match self.step(line_index, bytes, pos) {
                Step::Advance(n) => pos += n,
                Step::EndOfLine => break,
            }
        }
    }

    fn step(&mut self, line_index: usize, bytes: &[u8], pos: usize) -> Step {
        let c = bytes[pos];
        let next = bytes.get(pos + 1).copied();

        if self.mode == Mode::Code && c == b'/' && next == Some(b'/') {
            return Step::EndOfLine;
        }

        if let Mode::BlockComment { start } = self.mode {
            if c == b'*' && next == Some(b'/') {
                self.close(start, line_index, MatchKind::BlockComment);
                return Step::Advance(2);
            }
            return Step::Advance(1);
        }

        // Not gated on string mode: `/*` inside a literal still opens a comment.
        if c == b'/' && next == Some(b'*') {
            self.mode = Mode::BlockComment { start: line_index };
            return Step::Advance(2);
        }

        if let Mode::Str { start, quote } = self.mode {
            let escaped = pos > 0 && bytes[pos - 1] == b'\\';
            if c == quote && !escaped {
                self.close(start, line_index, MatchKind::BraceBlock);
            }
            return Step::Advance(1);
        }

        match c {
            b'\'' | b'"' => {
                self.mode = Mode::Str {
                    start: line_index,
                    quote: c,
                };
            }
            b'{' => self.braces.push(line_index),
            b'}' => {
                if let Some(start) = self.braces.pop() {
                    self.record(start, line_index, MatchKind::BraceBlock);
                }
            }
            _ => {}
        }
        Step::Advance(1)
    }

    /// Leave the current comment/string mode, recording its range
    fn close(&mut self, start: usize, end: usize, kind: MatchKind) {
        self.mode = Mode::Code;
        self.record(start, end, kind);
    }

    fn record(&mut self, start: usize, end: usize, kind: MatchKind) {
        if end > start {
            self.matches.push(Match::new(start, end, kind));
        }
    }

    /// Unterminated comments, strings and braces are dropped here
    fn finish(self) -> Vec<Match> {
        self.matches
    }
}

/// Scan `line_count` lines supplied by `line_at`
///
/// `line_at(i)` is called exactly once for each `i` in `0..line_count`, in
/// increasing order. Never fails: malformed input only yields fewer matches.
pub fn scan<F, L>(line_count: usize, mut line_at: F) -> Vec<Match>
where
    F: FnMut(usize) -> L,
    L: AsRef<str>,
{
    let mut scanner = RangeScanner::default();
    for index in 0..line_count {
        let line = line_at(index);
        scanner.scan_line(index, line.as_ref());
    }
    scanner.finish()
}

/// Scan every line of a [`LineSource`]
pub fn scan_source<S: LineSource + ?Sized>(source: &S) -> Vec<Match> {
    scan(source.line_count(), |i| source.line_at(i))
}

/// Split `text` into lines and scan them
#[must_use]
pub fn scan_text(text: &str) -> Vec<Match> {
    scan_source(&TextLines::new(text))
}
