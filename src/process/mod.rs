//! Processing pipeline.
//!
//! Reads a whole source, splits it into lines, runs the range scanner and
//! either reports the raw matches or maps them to folding regions with the
//! active [`crate::Config`]. Reports render as text or JSON Lines.

pub mod pipeline;

pub use pipeline::{
    fold_reader, process_reader, scan_reader, write_report, OutputFormat, Report,
};
