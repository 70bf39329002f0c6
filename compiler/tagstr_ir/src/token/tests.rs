use super::*;

fn string_token(text: &str) -> Token {
    let end = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
    Token::detached(
        TokenKind::String,
        text,
        Position::new(1, 0),
        Position::new(1, end),
    )
}

// === String prefixes ===

#[test]
fn prefix_of_plain_string_is_empty() {
    assert_eq!(string_prefix("'abc'"), "");
    assert_eq!(string_prefix("\"\"\"doc\"\"\""), "");
}

#[test]
fn prefix_letters_are_returned_verbatim() {
    assert_eq!(string_prefix("rb'x'"), "rb");
    assert_eq!(string_prefix("F\"x\""), "F");
}

#[test]
fn fstring_detection_is_case_insensitive() {
    assert!(string_token("f'x'").is_fstring());
    assert!(string_token("F'x'").is_fstring());
    assert!(string_token("rf'x'").is_fstring());
    assert!(string_token("Rf\"\"\"x\"\"\"").is_fstring());
}

#[test]
fn plain_and_bytes_strings_are_not_fstrings() {
    assert!(!string_token("'f'").is_fstring());
    assert!(!string_token("rb'x'").is_fstring());
    let name = Token::detached(TokenKind::Name, "f", Position::new(1, 0), Position::new(1, 1));
    assert!(!name.is_fstring());
}

// === Moving ===

#[test]
fn moving_single_row_token_keeps_width() {
    let tok = string_token("'abc'").moved_to(Position::new(1, 10));
    assert_eq!(tok.start, Position::new(1, 10));
    assert_eq!(tok.end, Position::new(1, 15));
}

#[test]
fn moving_multi_row_token_keeps_end() {
    let tok = Token::detached(
        TokenKind::String,
        "'''a\nb'''",
        Position::new(2, 4),
        Position::new(3, 4),
    )
    .moved_to(Position::new(2, 9));
    assert_eq!(tok.start, Position::new(2, 9));
    assert_eq!(tok.end, Position::new(3, 4));
}

// === Kinds ===

#[test]
fn line_break_kinds() {
    assert!(TokenKind::Newline.is_line_break());
    assert!(TokenKind::Nl.is_line_break());
    assert!(!TokenKind::Comment.is_line_break());
    assert_eq!(TokenKind::EndMarker.to_string(), "ENDMARKER");
}

#[test]
fn positions_order_row_first() {
    assert!(Position::new(1, 50) < Position::new(2, 0));
    assert!(Position::new(3, 1) < Position::new(3, 2));
}
