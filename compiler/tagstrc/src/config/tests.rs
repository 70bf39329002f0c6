use std::collections::HashMap;

use pretty_assertions::assert_eq;

use super::*;

fn from_pairs(pairs: &[(&str, &str)]) -> Config {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    Config::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn defaults_without_environment() {
    assert_eq!(from_pairs(&[]), Config::default());
    assert_eq!(Config::default().module, "tagstr");
}

#[test]
fn environment_overrides() {
    let config = from_pairs(&[
        ("TAGSTR_MODULE", "tags"),
        ("TAGSTR_DISABLE_IMPORT_HOOK", "TRUE"),
        ("RUST_LOG", "info"),
        ("TAGSTR_LOG_TREE", "1"),
        ("NO_COLOR", "1"),
    ]);
    assert_eq!(config.module, "tags");
    assert!(config.disable_import_hook);
    assert_eq!(config.log_filter.as_deref(), Some("info"));
    assert!(config.log_tree);
    assert!(!config.color);
}

#[test]
fn hook_stays_enabled_unless_true() {
    assert!(!from_pairs(&[("TAGSTR_DISABLE_IMPORT_HOOK", "1")]).disable_import_hook);
    assert!(!from_pairs(&[("TAGSTR_DISABLE_IMPORT_HOOK", "false")]).disable_import_hook);
}

#[test]
fn tagstr_log_wins_over_rust_log() {
    let config = from_pairs(&[("RUST_LOG", "info"), ("TAGSTR_LOG", "trace")]);
    assert_eq!(config.log_filter.as_deref(), Some("trace"));
}

#[test]
fn flags() {
    let mut config = Config::default();
    assert_eq!(config.apply_flag("--module=mytags"), Ok(true));
    assert_eq!(config.apply_flag("--jobs=4"), Ok(true));
    assert_eq!(config.apply_flag("--no-color"), Ok(true));
    assert_eq!(config.apply_flag("--log=debug"), Ok(true));
    assert_eq!(config.apply_flag("file.py"), Ok(false));
    assert_eq!(config.module, "mytags");
    assert_eq!(config.jobs, Some(4));
    assert!(!config.color);
    assert_eq!(config.log_filter.as_deref(), Some("debug"));
    assert_eq!(config.activation().module, "mytags");
}

#[test]
fn bad_flag_values() {
    let mut config = Config::default();
    assert!(config.apply_flag("--jobs=many").is_err());
    assert!(config.apply_flag("--module=").is_err());
}
