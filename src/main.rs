//! phpfold - Folding range detection for PHP-like source code

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fs::File;
use std::io::{self, BufReader, Cursor, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use glob::Pattern;
use phpfold::process::{process_reader, write_report, Report};
use phpfold::{parse_args, CliArgs, Config, Result};
use rayon::prelude::*;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use walkdir::WalkDir;

/// PHP file extensions to process
const PHP_EXTENSIONS: &[&str] = &[
    "php", "phtml", "php3", "php4", "php5", "php7", "phps", "inc", "PHP", "PHTML",
];

/// Files larger than this are skipped to prevent memory exhaustion (100 MB)
const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

fn main() -> Result<()> {
    let args = parse_args();
    init_logging(args.debug);

    let use_stdin =
        args.inputs.is_empty() || (args.inputs.len() == 1 && args.inputs[0].as_os_str() == "-");

    if args.inputs.is_empty() && io::stdin().is_terminal() {
        print_usage();
        return Ok(());
    }

    if use_stdin {
        let config = build_config(&args, None)?;
        return process_stdin(&config, &args);
    }

    // An explicit config applies to every file; otherwise each file discovers its own
    let base_config = if args.config.is_some() {
        Some(build_config(&args, None)?)
    } else {
        None
    };

    if let Some(jobs) = args.jobs {
        if jobs > 0 {
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(jobs)
                .build_global()
            {
                tracing::warn!("failed to configure thread pool: {e}");
            }
        }
    }

    let extensions = collect_extensions(&args, base_config.as_ref());
    let files = collect_files(&args, &extensions);

    if files.is_empty() {
        if !args.silent {
            eprintln!("No PHP files found.");
        }
        return Ok(());
    }

    let process = |path: &PathBuf| match base_config.as_ref() {
        Some(config) => process_single_file(path, config, &args),
        None => build_config(&args, Some(path.as_path()))
            .and_then(|config| process_single_file(path, &config, &args)),
    };

    // Results are collected in input order, so parallel runs print deterministically
    let results: Vec<_> = if args.jobs == Some(1) {
        files.iter().map(process).collect()
    } else {
        files.par_iter().map(process).collect()
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut processed = 0usize;
    let mut errors = 0usize;
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(Some(report)) => {
                processed += 1;
                write_report(&mut out, &path.display().to_string(), &report, args.format)?;
            }
            Ok(None) => {}
            Err(e) => {
                errors += 1;
                eprintln!("Error scanning {}: {e}", path.display());
            }
        }
    }
    out.flush()?;

    if !args.silent {
        if errors == 0 {
            eprintln!("Scanned {processed} files.");
        } else {
            eprintln!("Scanned {processed} files, {errors} errors.");
        }
    }

    if errors > 0 {
        anyhow::bail!("{errors} file(s) could not be scanned");
    }
    Ok(())
}

/// Send tracing output to stderr; `RUST_LOG` overrides the `--debug` default
fn init_logging(debug: bool) {
    let default_filter = if debug { "phpfold=debug" } else { "phpfold=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time()
                .with_target(false),
        )
        .init();
}

/// Build configuration from CLI args and optional config file
///
/// If `for_path` is provided and no explicit config file is specified,
/// uses auto-discovery to find config files in parent directories.
fn build_config(args: &CliArgs, for_path: Option<&Path>) -> Result<Config> {
    let mut config = if let Some(config_path) = &args.config {
        debug!("using explicit config file: {}", config_path.display());
        Config::from_toml_file(config_path)?
    } else {
        let start = match for_path {
            Some(path) => path.to_path_buf(),
            None => std::env::current_dir().unwrap_or_default(),
        };
        let discovered = Config::discover_config_files(&start);
        if discovered.is_empty() {
            debug!("no config files discovered for {}", start.display());
        } else {
            for f in &discovered {
                debug!("discovered config file for {}: {}", start.display(), f.display());
            }
        }
        Config::from_files(&discovered)
    };

    // Override with CLI arguments
    if args.one_based {
        config.one_based = true;
    }
    if args.keep_closing_line {
        config.exclude_closing_line = false;
    }
    if args.no_comments {
        config.fold_comments = false;
    }
    if let Some(min_lines) = args.min_lines {
        config.min_lines = min_lines;
    }
    for ext in &args.extensions {
        if !config.extensions.contains(ext) {
            config.extensions.push(ext.clone());
        }
    }

    debug!(?config, "effective configuration");

    if let Some(error) = config.validate() {
        anyhow::bail!("Invalid configuration: {error}");
    }

    Ok(config)
}

/// Extensions accepted during file collection
///
/// Per-file configs are only discovered after collection, so extensions come
/// from the CLI plus the explicit or working-directory config.
fn collect_extensions(args: &CliArgs, base_config: Option<&Config>) -> Vec<String> {
    let mut extensions = match base_config {
        Some(config) => config.extensions.clone(),
        None => {
            let cwd = std::env::current_dir().unwrap_or_default();
            Config::from_discovered_files(&cwd).extensions
        }
    };
    for ext in &args.extensions {
        if !extensions.contains(ext) {
            extensions.push(ext.clone());
        }
    }
    extensions
}

/// Collect all files to process, handling directories and recursive flag
fn collect_files(args: &CliArgs, custom_extensions: &[String]) -> Vec<PathBuf> {
    let exclude_patterns: Vec<Pattern> = args
        .exclude
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                tracing::warn!("ignoring invalid exclude pattern {p:?}: {e}");
                None
            }
        })
        .collect();

    let mut files = Vec::new();

    for input in &args.inputs {
        if input.is_file() {
            if !is_excluded(input, &exclude_patterns) {
                files.push(input.clone());
            }
        } else if input.is_dir() {
            if args.recursive {
                // WalkDir reports symlink loops as errors; those entries are skipped
                for entry in WalkDir::new(input)
                    .follow_links(true)
                    .max_depth(256)
                    .into_iter()
                    .filter_map(std::result::Result::ok)
                {
                    let path = entry.path();
                    if path.is_file()
                        && is_php_file(path, custom_extensions)
                        && !is_excluded(path, &exclude_patterns)
                    {
                        files.push(path.to_path_buf());
                    }
                }
            } else if let Ok(entries) = std::fs::read_dir(input) {
                let mut children: Vec<PathBuf> = entries
                    .filter_map(std::result::Result::ok)
                    .map(|entry| entry.path())
                    .filter(|path| {
                        path.is_file()
                            && is_php_file(path, custom_extensions)
                            && !is_excluded(path, &exclude_patterns)
                    })
                    .collect();
                children.sort();
                files.extend(children);
            }
        } else {
            eprintln!("Skipping {}: no such file or directory", input.display());
        }
    }

    files
}

/// Check if a path matches any exclusion pattern
fn is_excluded(path: &Path, patterns: &[Pattern]) -> bool {
    if patterns.is_empty() {
        return false;
    }

    let path_str = path.to_string_lossy();

    for pattern in patterns {
        if pattern.matches(&path_str) {
            return true;
        }

        if let Some(file_name) = path.file_name() {
            if pattern.matches(&file_name.to_string_lossy()) {
                return true;
            }
        }

        // Directory patterns match any component
        for component in path.components() {
            if let std::path::Component::Normal(c) = component {
                if pattern.matches(&c.to_string_lossy()) {
                    return true;
                }
            }
        }
    }

    false
}

/// Check if a file has a PHP extension, built-in or custom
fn is_php_file(path: &Path, custom_extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PHP_EXTENSIONS.contains(&ext)
                || custom_extensions
                    .iter()
                    .any(|custom| custom.strip_prefix('.').unwrap_or(custom) == ext)
        })
}

/// Scan a single file; `Ok(None)` when it is skipped for size
fn process_single_file(path: &Path, config: &Config, args: &CliArgs) -> Result<Option<Report>> {
    let file_size = std::fs::metadata(path)?.len();
    if file_size > DEFAULT_MAX_FILE_SIZE {
        if !args.silent {
            eprintln!(
                "Skipping {} ({} MB exceeds limit of {} MB)",
                path.display(),
                file_size / (1024 * 1024),
                DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
            );
        }
        return Ok(None);
    }

    let report = process_reader(BufReader::new(File::open(path)?), config, args.raw)?;
    debug!("{}: {} ranges", path.display(), report.len());
    Ok(Some(report))
}

/// Process input from stdin, output to stdout
fn process_stdin(config: &Config, args: &CliArgs) -> Result<()> {
    let mut stdin_contents = Vec::new();
    io::stdin().read_to_end(&mut stdin_contents)?;

    #[allow(clippy::cast_possible_truncation)]
    let stdin_size = stdin_contents.len() as u64;
    if stdin_size > DEFAULT_MAX_FILE_SIZE {
        anyhow::bail!(
            "stdin input too large ({} MB exceeds limit of {} MB)",
            stdin_size / (1024 * 1024),
            DEFAULT_MAX_FILE_SIZE / (1024 * 1024)
        );
    }

    let report = process_reader(Cursor::new(&stdin_contents), config, args.raw)?;
    debug!("stdin: {} ranges", report.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, "stdin", &report, args.format)?;
    out.flush()?;

    Ok(())
}

fn print_usage() {
    println!(
        "phpfold v{} - folding ranges for PHP source",
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("Usage:");
    println!("  phpfold [OPTIONS] <FILE>...");
    println!("  phpfold [OPTIONS] -r <DIRECTORY>");
    println!("  phpfold [OPTIONS] -              # Read from stdin");
    println!("  cat file.php | phpfold           # Pipe input");
    println!();
    println!("Examples:");
    println!("  phpfold index.php                # Folding regions, zero-based");
    println!("  phpfold --one-based index.php    # 1-based line numbers");
    println!("  phpfold -o json -r src/          # JSON Lines for a whole tree");
    println!("  phpfold --raw index.php          # Raw brace/comment matches");
    println!();
    println!("Run `phpfold --help` for all options.");
    println!();
    println!("Config file auto-discovery:");
    println!("  Searches for phpfold.toml in parent directories");
    println!("  starting from the scanned file up to the root directory.");
    println!("  Also checks phpfold.toml in the home directory.");
    println!("  More specific configs (closer to file) override less specific ones.");
}
