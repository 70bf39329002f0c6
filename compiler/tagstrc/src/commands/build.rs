//! The `build` command: rewrite a source tree into an output directory.
//!
//! Every file under the input directory lands at the same relative path
//! under the output directory. `.py` files that opt in (or all `.py`
//! files with `--all`) are rewritten; everything else is copied as is.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;

use crate::diagnostic::render_transform_error;
use crate::Config;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Rewrite every `.py` file, ignoring activation markers.
    pub all: bool,
}

/// Parse `<dir> -o <out> [--all]`.
pub fn parse_build_args(args: &[String]) -> Result<BuildOptions, String> {
    let mut input = None;
    let mut output = None;
    let mut all = false;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-o" | "--output" => match iter.next() {
                Some(out) => output = Some(PathBuf::from(out)),
                None => return Err(format!("{arg} needs a directory")),
            },
            "--all" => all = true,
            flag if flag.starts_with('-') => return Err(format!("unknown build option '{flag}'")),
            dir if input.is_none() => input = Some(PathBuf::from(dir)),
            extra => return Err(format!("unexpected argument '{extra}'")),
        }
    }
    Ok(BuildOptions {
        input: input.ok_or("build needs an input directory")?,
        output: output.ok_or("build needs an output directory (-o <dir>)")?,
        all,
    })
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("'{0}' is not a directory")]
    NotADirectory(PathBuf),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file that could not be written to the output tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildFailure {
    pub path: PathBuf,
    /// Rendered diagnostic or I/O message.
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub transformed: usize,
    pub copied: usize,
    pub failures: Vec<BuildFailure>,
}

impl BuildSummary {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

enum Written {
    Transformed,
    Copied,
}

/// Rewrite `options.input` into `options.output`.
///
/// Files are processed on a scoped rayon pool sized by `config.jobs`.
/// Per-file failures are collected in the summary; only setup problems
/// abort the build.
#[tracing::instrument(level = "debug", skip_all, fields(input = %options.input.display()))]
pub fn build_tree(options: &BuildOptions, config: &Config) -> Result<BuildSummary, BuildError> {
    if !options.input.is_dir() {
        return Err(BuildError::NotADirectory(options.input.clone()));
    }
    fs::create_dir_all(&options.output).map_err(|source| BuildError::Io {
        path: options.output.clone(),
        source,
    })?;
    let skip = fs::canonicalize(&options.output).ok();
    let mut files = Vec::new();
    discover_files(&options.input, skip.as_deref(), &mut files);
    files.sort();
    tracing::debug!(files = files.len(), "discovered source tree");

    let process = |path: &PathBuf| build_file(path, options, config);
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = config.jobs {
        builder = builder.num_threads(jobs);
    }
    let results: Vec<Result<Written, BuildFailure>> = builder
        .build_scoped(rayon::ThreadBuilder::run, |pool| {
            pool.install(|| files.par_iter().map(process).collect())
        })
        .unwrap_or_else(|e| {
            tracing::warn!("failed to create thread pool ({e}), building sequentially");
            files.iter().map(process).collect()
        });

    let mut summary = BuildSummary::default();
    for result in results {
        match result {
            Ok(Written::Transformed) => summary.transformed += 1,
            Ok(Written::Copied) => summary.copied += 1,
            Err(failure) => summary.failures.push(failure),
        }
    }
    Ok(summary)
}

fn discover_files(dir: &Path, skip: Option<&Path>, files: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.starts_with('.') || name == "__pycache__");
        if hidden {
            continue;
        }
        if path.is_dir() {
            if skip.is_some_and(|skip| fs::canonicalize(&path).is_ok_and(|p| p == skip)) {
                continue;
            }
            discover_files(&path, skip, files);
        } else {
            files.push(path);
        }
    }
}

fn build_file(path: &Path, options: &BuildOptions, config: &Config) -> Result<Written, BuildFailure> {
    let failure = |message: String| BuildFailure {
        path: path.to_path_buf(),
        message,
    };
    let relative = path.strip_prefix(&options.input).unwrap_or(path);
    let dest = options.output.join(relative);
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| failure(format!("{}: {e}", parent.display())))?;
    }

    let is_python = path.extension().is_some_and(|e| e == "py");
    if !(is_python && (options.all || config.activation().should_transform_file(path))) {
        fs::copy(path, &dest).map_err(|e| failure(format!("{}: {e}", path.display())))?;
        return Ok(Written::Copied);
    }

    let source = fs::read_to_string(path).map_err(|e| failure(format!("{}: {e}", path.display())))?;
    let source = source.strip_prefix('\u{feff}').unwrap_or(&source);
    let shown = path.display().to_string();
    let output = tagstr_rewrite::transform_str(source)
        .map_err(|err| failure(render_transform_error(&err, &shown, source, config.color)))?;
    fs::write(&dest, output + "\n").map_err(|e| failure(format!("{}: {e}", dest.display())))?;
    tracing::debug!(path = %shown, "rewrote");
    Ok(Written::Transformed)
}

/// Entry point for `tagstr build`.
pub fn run_build(args: &[String], config: &Config) {
    let options = match parse_build_args(args) {
        Ok(options) => options,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!("Usage: tagstr build <dir> -o <out> [--all]");
            std::process::exit(1);
        }
    };
    let summary = match build_tree(&options, config) {
        Ok(summary) => summary,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    };

    for failure in &summary.failures {
        eprint!("{}", failure.message);
        if !failure.message.ends_with('\n') {
            eprintln!();
        }
    }
    println!(
        "{} rewritten, {} copied, {} failed",
        summary.transformed,
        summary.copied,
        summary.failures.len()
    );
    if summary.has_failures() {
        std::process::exit(1);
    }
}
