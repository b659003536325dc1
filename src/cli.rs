//! Command-line interface for phpfold.
//!
//! Defines CLI arguments using clap builder API

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use crate::process::OutputFormat;

/// CLI arguments parsed from command line
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Files or directories to scan
    pub inputs: Vec<PathBuf>,

    /// Output format
    pub format: OutputFormat,

    /// Print raw scanner matches instead of folding regions
    pub raw: bool,

    /// Report 1-based line numbers
    pub one_based: bool,

    /// Keep the closing delimiter line inside regions
    pub keep_closing_line: bool,

    /// Drop block comment regions
    pub no_comments: bool,

    /// Minimum distance between opening and closing lines
    pub min_lines: Option<usize>,

    /// Config file path
    pub config: Option<PathBuf>,

    /// Recursive directory processing
    pub recursive: bool,

    /// Exclude patterns for files/directories (glob patterns)
    pub exclude: Vec<String>,

    /// Custom PHP file extensions (in addition to defaults)
    pub extensions: Vec<String>,

    /// Number of parallel jobs (0 = auto, 1 = sequential)
    pub jobs: Option<usize>,

    /// Silent mode (no progress or summary output)
    pub silent: bool,

    /// Enable debug output
    pub debug: bool,
}

/// Build the clap Command for parsing CLI arguments
#[must_use]
pub fn build_cli() -> Command {
    Command::new("phpfold")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Find foldable brace blocks and block comments in PHP source")
        .arg(
            Arg::new("inputs")
                .help("Files or directories to scan ('-' or none reads stdin)")
                .value_name("FILE")
                .num_args(1..)
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("format")
                .short('o')
                .long("format")
                .help("Output format [default: text]")
                .value_name("FORMAT")
                .value_parser(["text", "json"]),
        )
        .arg(
            Arg::new("raw")
                .long("raw")
                .help("Print scanner matches (zero-based, closing line included) instead of folding regions")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("one-based")
                .long("one-based")
                .help("Report 1-based line numbers")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("keep-closing-line")
                .long("keep-closing-line")
                .help("Include the closing delimiter line in each region")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-comments")
                .long("no-comments")
                .help("Don't report block comments")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("min-lines")
                .long("min-lines")
                .help("Skip ranges whose closing line is fewer than NUM lines below the opening line [default: 1]")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("Path to configuration file (overrides auto-discovery)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("recursive")
                .short('r')
                .long("recursive")
                .help("Recursively scan directories")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .help("Exclude files/directories matching pattern (glob syntax, can be repeated)")
                .value_name("PATTERN")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("ext")
                .short('x')
                .long("ext")
                .help("Additional PHP file extension (can be repeated, e.g., -x module -x tpl)")
                .value_name("EXT")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .help("Number of parallel jobs (0=auto, 1=sequential)")
                .value_name("NUM")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("debug")
                .short('D')
                .long("debug")
                .help("Enable debug logging (config discovery, per-file counts)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("silent")
                .short('S')
                .long("silent")
                .help("Silent mode (no summary, for editor integration)")
                .action(ArgAction::SetTrue),
        )
}

/// Parse CLI arguments from command line
#[must_use]
pub fn parse_args() -> CliArgs {
    args_from_matches(&build_cli().get_matches())
}

/// Parse CLI arguments from an iterator (for testing)
#[must_use]
pub fn parse_args_from<I, T>(args: I) -> CliArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    args_from_matches(&build_cli().get_matches_from(args))
}

/// Convert clap `ArgMatches` to `CliArgs`
fn args_from_matches(matches: &clap::ArgMatches) -> CliArgs {
    let format = matches
        .get_one::<String>("format")
        .and_then(|f| f.parse().ok())
        .unwrap_or_default();

    CliArgs {
        inputs: matches
            .get_many::<PathBuf>("inputs")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        format,
        raw: matches.get_flag("raw"),
        one_based: matches.get_flag("one-based"),
        keep_closing_line: matches.get_flag("keep-closing-line"),
        no_comments: matches.get_flag("no-comments"),
        min_lines: matches.get_one::<usize>("min-lines").copied(),
        config: matches.get_one::<PathBuf>("config").cloned(),
        recursive: matches.get_flag("recursive"),
        exclude: matches
            .get_many::<String>("exclude")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        extensions: matches
            .get_many::<String>("ext")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default(),
        jobs: matches.get_one::<usize>("jobs").copied(),
        silent: matches.get_flag("silent"),
        debug: matches.get_flag("debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_builds() {
        let cmd = build_cli();
        assert_eq!(cmd.get_name(), "phpfold");
    }

    #[test]
    fn test_cli_defaults() {
        let args = parse_args_from(vec!["phpfold"]);
        assert!(args.inputs.is_empty());
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.raw);
        assert!(!args.one_based);
        assert!(!args.keep_closing_line);
        assert!(!args.no_comments);
        assert_eq!(args.min_lines, None);
        assert_eq!(args.jobs, None);
    }

    #[test]
    fn test_format_json() {
        let args = parse_args_from(vec!["phpfold", "--format", "json", "a.php"]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.inputs, vec![PathBuf::from("a.php")]);
    }

    #[test]
    fn test_format_rejects_unknown() {
        let result = build_cli().try_get_matches_from(vec!["phpfold", "-o", "yaml"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_folding_flags() {
        let args = parse_args_from(vec![
            "phpfold",
            "--one-based",
            "--keep-closing-line",
            "--no-comments",
            "--min-lines",
            "3",
            "a.php",
        ]);
        assert!(args.one_based);
        assert!(args.keep_closing_line);
        assert!(args.no_comments);
        assert_eq!(args.min_lines, Some(3));
    }

    #[test]
    fn test_raw_flag() {
        let args = parse_args_from(vec!["phpfold", "--raw", "-"]);
        assert!(args.raw);
        assert_eq!(args.inputs, vec![PathBuf::from("-")]);
    }

    #[test]
    fn test_exclude_multiple() {
        let args = parse_args_from(vec![
            "phpfold",
            "-r",
            "-e",
            "vendor",
            "--exclude",
            "*.blade.php",
            "src/",
        ]);
        assert!(args.recursive);
        assert_eq!(args.exclude, vec!["vendor", "*.blade.php"]);
    }

    #[test]
    fn test_extensions() {
        let args = parse_args_from(vec!["phpfold", "-x", "module", "--ext", "tpl", "src/"]);
        assert_eq!(args.extensions, vec!["module", "tpl"]);
    }

    #[test]
    fn test_jobs_and_debug() {
        let args = parse_args_from(vec!["phpfold", "-j", "4", "-D", "-S", "a.php"]);
        assert_eq!(args.jobs, Some(4));
        assert!(args.debug);
        assert!(args.silent);
    }
}
