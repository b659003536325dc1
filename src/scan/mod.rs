//! Foldable range detection for PHP-like source text.
//!
//! This module provides the scanning infrastructure:
//! - [`LineSource`]: Read-only, index-addressable view over the lines of a document
//! - [`TextLines`]: `LineSource` over a whole text, split on `\n` / `\r\n`
//! - [`scan`] / [`scan_source`] / [`scan_text`]: Single-pass scanner that pairs
//!   `{`/`}` and `/*`/`*/` across lines while ignoring delimiters inside string
//!   literals and `//` comments
//!
//! Matches come back in completion order: a range is recorded when its closing
//! delimiter is seen, so inner blocks precede the blocks that enclose them.

pub mod scanner;
pub mod source;

pub use scanner::{scan, scan_source, scan_text, Match, MatchKind};
pub use source::{LineSource, TextLines};
