//! Mapping scanner matches to editor folding regions.
//!
//! The scanner reports the lines holding both delimiters. Editors usually keep
//! the closing line visible, so by default a region ends one line before the
//! closing delimiter. Block comments carry the `comment` folding kind; brace
//! blocks carry none.

use serde::Serialize;

use crate::scan::{Match, MatchKind};

/// Folding kind attached to a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FoldingKind {
    Comment,
}

/// A collapsible range as presented to an editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldingRegion {
    pub start_line: usize,
    pub end_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<FoldingKind>,
}

/// Options controlling the match-to-region mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldOptions {
    /// End regions on the line before the closing delimiter
    pub exclude_closing_line: bool,
    /// Keep block comment matches
    pub fold_comments: bool,
    /// Drop matches spanning fewer lines than this
    pub min_lines: usize,
    /// Report 1-based line numbers
    pub one_based: bool,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self {
            exclude_closing_line: true,
            fold_comments: true,
            min_lines: 1,
            one_based: false,
        }
    }
}

impl FoldingRegion {
    fn from_match(m: &Match, options: &FoldOptions) -> Self {
        let base = usize::from(options.one_based);
        let end = if options.exclude_closing_line {
            m.end - 1
        } else {
            m.end
        };
        let kind = match m.kind {
            MatchKind::BlockComment => Some(FoldingKind::Comment),
            MatchKind::BraceBlock => None,
        };
        Self {
            start_line: m.start + base,
            end_line: end + base,
            kind,
        }
    }
}

/// Convert matches to folding regions, preserving their order
#[must_use]
pub fn to_folding_regions(matches: &[Match], options: &FoldOptions) -> Vec<FoldingRegion> {
    matches
        .iter()
        .filter(|m| m.span() >= options.min_lines)
        .filter(|m| options.fold_comments || m.kind != MatchKind::BlockComment)
        .map(|m| FoldingRegion::from_match(m, options))
        .collect()
}
