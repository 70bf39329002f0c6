#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;
use tagstr_ir::Position;
use tagstr_lexer::Tokenizer;

fn attempt(source: &str) -> Result<Attempt, TransformError> {
    let mut cursor = Cursor::new(Tokenizer::new(source.as_bytes()));
    match_tag(&mut cursor)
}

/// Run attempts to the end of input, collecting matched anchors.
fn anchors(source: &str) -> Vec<String> {
    let mut cursor = Cursor::new(Tokenizer::new(source.as_bytes()));
    let mut found = Vec::new();
    loop {
        match match_tag(&mut cursor).unwrap() {
            Attempt::Matched(site) => found.push(site.anchor.text),
            Attempt::NoMatch => {}
            Attempt::Exhausted => return found,
        }
        cursor.drain_consumed(true);
    }
}

fn site(source: &str) -> TagSite {
    match attempt(source).unwrap() {
        Attempt::Matched(site) => site,
        other => panic!("expected a match for {source:?}, got {other:?}"),
    }
}

// === Matches ===

#[test]
fn simple_tag() {
    let site = site("tag @ f\"hello\"");
    assert_eq!(site.anchor.text, "tag");
    assert_eq!(site.literal.text, "f\"hello\"");
    assert!(site.prefix.is_empty());
}

#[test]
fn any_fstring_prefix() {
    for source in ["t @ F'x'", "t @ rf'x'", "t @ Fr'x'"] {
        assert_eq!(site(source).anchor.text, "t", "{source}");
    }
}

#[test]
fn preceding_names_become_the_prefix() {
    let site = site("return tag @ f'x'");
    assert_eq!(site.anchor.text, "tag");
    assert_eq!(site.prefix.len(), 1);
    assert_eq!(site.prefix[0].text, "return");
}

#[test]
fn grouping_parentheses_are_consumed() {
    let site = site("tag @ ((\n    f'x'\n  # note\n))");
    assert_eq!(site.literal.start, Position::new(2, 4));
}

#[test]
fn comment_between_grouping_and_literal() {
    let site = site("tag @ (  # note\n    f\"x\")");
    assert_eq!(site.literal.start, Position::new(2, 4));
}

#[test]
fn token_after_the_operand_is_handed_back() {
    let mut cursor = Cursor::new(Tokenizer::new("tag @ f'x' + y".as_bytes()));
    assert!(matches!(match_tag(&mut cursor).unwrap(), Attempt::Matched(_)));
    assert_eq!(cursor.pending(), 1);
    cursor.drain_consumed(true);
    assert!(matches!(match_tag(&mut cursor).unwrap(), Attempt::NoMatch));
    assert_eq!(cursor.consumed()[0].text, "+");
}

#[test]
fn marker_on_a_continuation_line() {
    assert_eq!(anchors("(tag\n @ f'x')\n"), vec!["tag"]);
}

#[test]
fn each_site_in_a_file_is_found() {
    assert_eq!(
        anchors("a = x @ f'1'\nprint(y @ f'{a}', z@f'')\n"),
        vec!["x", "y", "z"]
    );
}

#[test]
fn attribute_tag_matches_its_last_name() {
    assert_eq!(anchors("obj.tag @ f'x'\n"), vec!["tag"]);
}

// === Soft failures ===

#[test]
fn plain_string_is_not_a_tag() {
    assert!(matches!(attempt("tag @ \"hello\"").unwrap(), Attempt::NoMatch));
    assert!(anchors("tag @ \"hello\"\n").is_empty());
}

#[test]
fn matrix_multiplication_is_not_a_tag() {
    assert!(anchors("c = a @ b\nd = (a) @ (b)\n").is_empty());
}

#[test]
fn non_name_start_is_no_match() {
    assert!(matches!(attempt("1 + 2").unwrap(), Attempt::NoMatch));
}

#[test]
fn name_after_marker_is_rewound_for_the_next_attempt() {
    let mut cursor = Cursor::new(Tokenizer::new("a @ b @ f'x'".as_bytes()));
    assert!(matches!(match_tag(&mut cursor).unwrap(), Attempt::NoMatch));
    assert_eq!(cursor.pending(), 1);
    cursor.drain_consumed(true);
    match match_tag(&mut cursor).unwrap() {
        Attempt::Matched(site) => assert_eq!(site.anchor.text, "b"),
        other => panic!("expected match, got {other:?}"),
    }
}

#[test]
fn empty_input_is_exhausted_after_the_end_marker() {
    let mut cursor = Cursor::new(Tokenizer::new("".as_bytes()));
    assert!(matches!(match_tag(&mut cursor).unwrap(), Attempt::NoMatch));
    cursor.drain_consumed(true);
    assert!(matches!(match_tag(&mut cursor).unwrap(), Attempt::Exhausted));
}

// === Hard failures ===

#[test]
fn unexpected_token_inside_grouping_is_malformed() {
    let err = attempt("tag @ (f'x' + 1)").unwrap_err();
    match err {
        TransformError::Malformed { position, .. } => assert_eq!(position, Position::new(1, 12)),
        other => panic!("expected Malformed, got {other:?}"),
    }
}

#[test]
fn unclosed_grouping_is_malformed() {
    for source in ["tag @ (f'x'\n", "tag @ (f'x'", "tag @ ((\n  f'x')\ny = 1\n"] {
        let err = attempt(source).unwrap_err();
        assert!(
            matches!(err, TransformError::Malformed { .. }),
            "{source:?}: {err:?}"
        );
    }
}

#[test]
fn implicit_concatenation_is_malformed() {
    let err = attempt("tag @ f\"a\" \"b\"").unwrap_err();
    match err {
        TransformError::Malformed { position, .. } => assert_eq!(position, Position::new(1, 11)),
        other => panic!("expected Malformed, got {other:?}"),
    }
    assert!(matches!(
        attempt("tag @ (f'a'\n   'b')").unwrap_err(),
        TransformError::Malformed { .. }
    ));
}

#[test]
fn unclosed_grouping_before_end_of_stream_is_malformed() {
    let tokens: Vec<Result<Token, TokenizeError>> = tagstr_lexer::tokenize_str("tag @ (f'x')")
        .unwrap()
        .into_iter()
        .take(4)
        .map(Ok)
        .collect();
    let mut cursor = Cursor::new(tokens.into_iter());
    let err = match_tag(&mut cursor).unwrap_err();
    assert!(matches!(err, TransformError::Malformed { position, .. } if position == Position::new(1, 11)));
}
