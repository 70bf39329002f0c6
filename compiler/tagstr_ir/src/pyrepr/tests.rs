use super::*;
use pretty_assertions::assert_eq;

// === repr ===

#[test]
fn repr_uses_single_quotes_by_default() {
    assert_eq!(repr_str("hello"), "'hello'");
    assert_eq!(repr_str(""), "''");
}

#[test]
fn repr_switches_to_double_quotes_for_apostrophes() {
    assert_eq!(repr_str("it's"), "\"it's\"");
}

#[test]
fn repr_escapes_single_quote_when_both_present() {
    assert_eq!(repr_str("'\""), "'\\'\"'");
}

#[test]
fn repr_escapes_line_breaks_and_backslashes() {
    assert_eq!(repr_str("\nhello\n"), "'\\nhello\\n'");
    assert_eq!(repr_str("a\\b\tc\r"), "'a\\\\b\\tc\\r'");
}

#[test]
fn repr_hex_escapes_control_characters() {
    assert_eq!(repr_str("\u{0}\u{7f}\u{1b}"), "'\\x00\\x7f\\x1b'");
}

#[test]
fn repr_keeps_printable_unicode() {
    assert_eq!(repr_str("añ€😀"), "'añ€😀'");
}

#[test]
fn repr_escapes_non_printable_unicode() {
    assert_eq!(repr_str("\u{a0}"), "'\\xa0'");
    assert_eq!(repr_str("\u{200b}"), "'\\u200b'");
    assert_eq!(repr_str("\u{2028}"), "'\\u2028'");
}

// === ascii ===

#[test]
fn ascii_escapes_everything_outside_ascii() {
    assert_eq!(ascii_str("añ"), "'a\\xf1'");
    assert_eq!(ascii_str("€"), "'\\u20ac'");
    assert_eq!(ascii_str("😀"), "'\\U0001f600'");
}

#[test]
fn ascii_of_plain_text_matches_repr() {
    assert_eq!(ascii_str("a"), "'a'");
    assert_eq!(ascii_str("it's"), repr_str("it's"));
}

#[test]
fn escape_non_ascii_leaves_ascii_alone() {
    assert_eq!(escape_non_ascii("[1, 'ñ']"), "[1, '\\xf1']");
}

// === Printability ===

#[test]
fn printable_classification() {
    assert!(is_printable('a'));
    assert!(is_printable(' '));
    assert!(is_printable('ñ'));
    assert!(!is_printable('\n'));
    assert!(!is_printable('\u{feff}'));
    assert!(!is_printable('\u{e000}'));
}
