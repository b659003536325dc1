//! Read → scan → fold → report pipeline

use std::fmt;
use std::io::{BufRead, Read, Write};
use std::str::FromStr;

use serde::Serialize;

use crate::config::Config;
use crate::fold::{to_folding_regions, FoldingKind, FoldingRegion};
use crate::scan::{scan_text, Match};
use crate::Result;

/// How reports are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// `name:START-END[ kind]`, one entry per line
    #[default]
    Text,
    /// One JSON object per input (JSON Lines)
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown output format {other:?} (expected text or json)"),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Result of processing one input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Folding regions after the configured mapping
    Regions(Vec<FoldingRegion>),
    /// Raw scanner matches, zero-based
    Matches(Vec<Match>),
}

impl Report {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Regions(regions) => regions.len(),
            Self::Matches(matches) => matches.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Serialize)]
struct JsonRegions<'a> {
    path: &'a str,
    regions: &'a [FoldingRegion],
}

#[derive(Serialize)]
struct JsonMatches<'a> {
    path: &'a str,
    matches: &'a [Match],
}

/// Read an entire source, decoding invalid UTF-8 lossily
fn read_source<R: BufRead>(mut reader: R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

/// Scan a source and return raw matches in completion order
pub fn scan_reader<R: BufRead>(reader: R) -> Result<Vec<Match>> {
    let text = read_source(reader)?;
    Ok(scan_text(&text))
}

/// Scan a source and map the matches to folding regions
pub fn fold_reader<R: BufRead>(reader: R, config: &Config) -> Result<Vec<FoldingRegion>> {
    let matches = scan_reader(reader)?;
    Ok(to_folding_regions(&matches, &config.fold_options()))
}

/// Process one source into a [`Report`]
///
/// With `raw` set the scanner matches are reported as-is; otherwise they go
/// through the folding options in `config`.
pub fn process_reader<R: BufRead>(reader: R, config: &Config, raw: bool) -> Result<Report> {
    if raw {
        Ok(Report::Matches(scan_reader(reader)?))
    } else {
        Ok(Report::Regions(fold_reader(reader, config)?))
    }
}

/// Render a report for the input called `name`
pub fn write_report<W: Write>(
    output: &mut W,
    name: &str,
    report: &Report,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(output, name, report)?,
        OutputFormat::Json => {
            match report {
                Report::Regions(regions) => serde_json::to_writer(
                    &mut *output,
                    &JsonRegions {
                        path: name,
                        regions,
                    },
                )?,
                Report::Matches(matches) => serde_json::to_writer(
                    &mut *output,
                    &JsonMatches {
                        path: name,
                        matches,
                    },
                )?,
            }
            writeln!(output)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(output: &mut W, name: &str, report: &Report) -> std::io::Result<()> {
    match report {
        Report::Regions(regions) => {
            for region in regions {
                write!(output, "{name}:{}-{}", region.start_line, region.end_line)?;
                match region.kind {
                    Some(FoldingKind::Comment) => writeln!(output, " comment")?,
                    None => writeln!(output)?,
                }
            }
        }
        Report::Matches(matches) => {
            for m in matches {
                writeln!(output, "{name}:{}-{} {}", m.start, m.end, m.kind.as_str())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::scan::MatchKind;

    const SOURCE: &str = "<?php\n/**\n * Doc\n */\nclass Foo {\n}\n";

    #[test]
    fn test_scan_reader() {
        let matches = scan_reader(Cursor::new(SOURCE)).unwrap();
        assert_eq!(
            matches,
            vec![
                Match::new(1, 3, MatchKind::BlockComment),
                Match::new(4, 5, MatchKind::BraceBlock),
            ]
        );
    }

    #[test]
    fn test_fold_reader_defaults() {
        let regions = fold_reader(Cursor::new(SOURCE), &Config::default()).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!((regions[0].start_line, regions[0].end_line), (1, 2));
        assert_eq!(regions[0].kind, Some(FoldingKind::Comment));
        assert_eq!((regions[1].start_line, regions[1].end_line), (4, 4));
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let bytes: &[u8] = b"{\n\xff\xfe '}'\n}\n";
        let matches = scan_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(matches, vec![Match::new(0, 2, MatchKind::BraceBlock)]);
    }

    #[test]
    fn test_text_report() {
        let report = process_reader(Cursor::new(SOURCE), &Config::default(), false).unwrap();
        let mut out = Vec::new();
        write_report(&mut out, "a.php", &report, OutputFormat::Text).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a.php:1-2 comment\na.php:4-4\n");
    }

    #[test]
    fn test_raw_text_report() {
        let report = process_reader(Cursor::new(SOURCE), &Config::default(), true).unwrap();
        let mut out = Vec::new();
        write_report(&mut out, "a.php", &report, OutputFormat::Text).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "a.php:1-3 block_comment\na.php:4-5 brace_block\n"
        );
    }

    #[test]
    fn test_json_report() {
        let report = process_reader(Cursor::new("{\n}\n"), &Config::default(), true).unwrap();
        let mut out = Vec::new();
        write_report(&mut out, "stdin", &report, OutputFormat::Json).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{\"path\":\"stdin\",\"matches\":[{\"start\":0,\"end\":1,\"kind\":\"brace_block\"}]}\n"
        );
    }

    #[test]
    fn test_empty_report() {
        let report = process_reader(Cursor::new(""), &Config::default(), false).unwrap();
        assert!(report.is_empty());
        let mut out = Vec::new();
        write_report(&mut out, "empty.php", &report, OutputFormat::Text).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
