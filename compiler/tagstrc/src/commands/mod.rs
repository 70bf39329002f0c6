//! Command handlers for the `tagstr` CLI.
//!
//! Each submodule implements one command. The `run_*` functions print and
//! exit the way the binary needs; the functions they wrap return their
//! output so tests can call them directly.

use tagstr_rewrite::TransformError;

use crate::diagnostic::render_transform_error;
use crate::Config;

mod build;
mod check;
mod debug;
mod load;
mod transform;

pub use build::{
    build_tree, parse_build_args, run_build, BuildError, BuildFailure, BuildOptions, BuildSummary,
};
pub use check::{check_source, run_check, CheckReport};
pub use debug::{lex_listing, pieces_listing, run_lex, run_pieces};
pub use load::run_load;
pub use transform::run_transform;

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => match content.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_owned(),
            None => content,
        },
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Print a rewrite error with source context and exit.
pub(crate) fn fail_with(err: &TransformError, path: &str, source: &str, config: &Config) -> ! {
    eprint!("{}", render_transform_error(err, path, source, config.color));
    std::process::exit(1);
}
