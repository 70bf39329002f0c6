//! The `transform` command: print the rewritten source of a file.

use tagstr_rewrite::transform_str;

use super::{fail_with, read_file};
use crate::Config;

/// Rewrite `path` regardless of its activation marker and print the result.
pub fn run_transform(path: &str, config: &Config) {
    let source = read_file(path);
    match transform_str(&source) {
        Ok(output) => println!("{output}"),
        Err(err) => fail_with(&err, path, &source, config),
    }
}
