//! phpfold - Folding range detection for PHP-like source code
//!
//! Finds multi-line brace blocks and block comments with a single-pass
//! character scanner that ignores delimiters inside string literals and `//`
//! comments, and maps them to editor folding regions.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::struct_excessive_bools)]

pub mod cli;
pub mod config;
pub mod error;
pub mod fold;
pub mod process;
pub mod scan;

// Re-export commonly used types
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use error::Result;
pub use fold::{to_folding_regions, FoldOptions, FoldingKind, FoldingRegion};
pub use scan::{scan, scan_source, scan_text, LineSource, Match, MatchKind, TextLines};
