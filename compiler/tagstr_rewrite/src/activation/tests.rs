#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;

// === Marker comment ===

#[test]
fn marker_comment_activates() {
    assert!(should_transform("# tagstr: on\nx = t @ f'a'\n"));
    assert!(should_transform("#   tagstr :  ON  extra words\n"));
}

#[test]
fn marker_must_say_on() {
    assert!(!should_transform("# tagstr: off\n"));
    assert!(!should_transform("#tagstr: on\n"));
}

#[test]
fn marker_for_another_module_is_ignored() {
    assert!(!should_transform("# other: on\n"));
}

#[test]
fn trailing_comment_is_not_a_marker() {
    assert!(!should_transform("x = 1  # tagstr: on\n"));
}

// === Import ===

#[test]
fn import_activates() {
    assert!(should_transform("import tagstr\n"));
    assert!(should_transform("import tagstr.runtime\n"));
    assert!(should_transform("import tagstr"));
}

#[test]
fn similar_module_names_do_not_activate() {
    assert!(!should_transform("import tagstrx\n"));
    assert!(!should_transform("import os\nimport tagstr\n"));
    assert!(!should_transform("from tagstr import tag\n"));
}

// === Scan extent ===

#[test]
fn comments_and_docstrings_may_precede_the_marker() {
    let source = "#!/usr/bin/env python\n\n\"\"\"Module docs.\n\nMore.\n\"\"\"\n# note\nimport tagstr\n";
    assert!(should_transform(source));
}

#[test]
fn code_ends_the_scan() {
    assert!(!should_transform("x = 1\n# tagstr: on\n"));
}

#[test]
fn empty_and_broken_sources_are_inactive() {
    assert!(!should_transform(""));
    assert!(!should_transform("\n\n"));
    assert!(!should_transform("'''unterminated\n"));
}

#[test]
fn custom_module_name() {
    let config = ActivationConfig::new("mytags");
    assert!(config.should_transform("# mytags: on\n"));
    assert!(config.should_transform("import mytags\n"));
    assert!(!config.should_transform("import tagstr\n"));
}

// === Files ===

fn write(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn python_file_with_marker() {
    let dir = tempfile::tempdir().unwrap();
    assert!(should_transform_file(&write(&dir, "a.py", b"import tagstr\n")));
}

#[test]
fn other_extensions_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!should_transform_file(&write(&dir, "a.txt", b"import tagstr\n")));
    assert!(!should_transform_file(&dir.path().join("missing.py")));
}

#[test]
fn byte_order_mark_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    assert!(should_transform_file(&write(&dir, "a.py", b"\xef\xbb\xbf# tagstr: on\n")));
}

#[test]
fn non_utf8_sources_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    assert!(!should_transform_file(&write(&dir, "a.py", b"import tagstr\n\xff\n")));
}

#[test]
fn coding_declarations() {
    let dir = tempfile::tempdir().unwrap();
    let latin = write(&dir, "a.py", b"# -*- coding: latin-1 -*-\nimport tagstr\n");
    assert!(!should_transform_file(&latin));
    let utf8 = write(&dir, "b.py", b"#!/usr/bin/python\n# coding=utf-8\nimport tagstr\n");
    assert!(should_transform_file(&utf8));
    let late = write(&dir, "c.py", b"import tagstr\n# coding: latin-1\n");
    assert!(should_transform_file(&late));
}

#[test]
fn utf8_declaration_spellings() {
    assert!(declares_utf8("# coding: UTF-8\n"));
    assert!(declares_utf8("# vim: set fileencoding=utf_8 :\n"));
    assert!(declares_utf8("# coding: utf-8-sig\n"));
    assert!(!declares_utf8("# coding: ascii\n"));
    assert!(declares_utf8("x = 1\n"));
}
