//! The `check` command: does the activation policy engage for a file, and
//! does it rewrite cleanly?

use std::fmt;
use std::path::Path;

use tagstr_rewrite::{find_tag_sites, ActivationConfig, TransformError};

use super::{fail_with, read_file};
use crate::Config;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckReport {
    pub active: bool,
    pub tag_sites: usize,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.active { "active" } else { "inactive" };
        let plural = if self.tag_sites == 1 { "" } else { "s" };
        write!(f, "{state} ({} tag expression{plural})", self.tag_sites)
    }
}

/// Count tag expressions and decide activation for `source`.
pub fn check_source(source: &str, activation: &ActivationConfig) -> Result<CheckReport, TransformError> {
    Ok(CheckReport {
        active: activation.should_transform(source),
        tag_sites: find_tag_sites(source)?.len(),
    })
}

pub fn run_check(path: &str, config: &Config) {
    let source = read_file(path);
    let activation = config.activation();
    match check_source(&source, &activation) {
        Ok(report) => {
            let file_ok = activation.should_transform_file(Path::new(path));
            println!("{path}: {report}");
            if report.active && !file_ok {
                println!("  note: the loader skips this file (not a UTF-8 .py file)");
            }
            if !report.active && report.tag_sites > 0 {
                println!(
                    "  note: add `import {}` or `# {}: on` at the top to enable rewriting",
                    config.module, config.module
                );
            }
        }
        Err(err) => fail_with(&err, path, &source, config),
    }
}

#[cfg(test)]
mod tests;
