#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn active_file_with_sites() {
    let report = check_source("import tagstr\nx = t @ f'{a}'\ny = t @ f'b'\n", &ActivationConfig::default()).unwrap();
    assert_eq!(report, CheckReport { active: true, tag_sites: 2 });
    assert_eq!(report.to_string(), "active (2 tag expressions)");
}

#[test]
fn inactive_file_still_counts_sites() {
    let report = check_source("x = t @ f'a'\n", &ActivationConfig::default()).unwrap();
    assert_eq!(report.to_string(), "inactive (1 tag expression)");
}

#[test]
fn custom_module_marker() {
    let activation = ActivationConfig::new("fmtlib");
    let report = check_source("# fmtlib: on\n", &activation).unwrap();
    assert!(report.active);
    assert_eq!(report.tag_sites, 0);
}

#[test]
fn malformed_site_is_an_error() {
    assert!(check_source("t @ (f'x' y)\n", &ActivationConfig::default()).is_err());
}
