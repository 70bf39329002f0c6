#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;
use tagstr_lexer::tokenize_str;

fn tok(kind: TokenKind, text: &str, row: u32, col: u32) -> Token {
    let width = u32::try_from(text.chars().count()).unwrap();
    Token::detached(
        kind,
        text,
        Position::new(row, col),
        Position::new(row, col + width),
    )
}

fn spans(tokens: &[Token]) -> Vec<(&str, (u32, u32), (u32, u32), Origin)> {
    tokens
        .iter()
        .map(|t| {
            (
                t.text.as_str(),
                (t.start.row, t.start.col),
                (t.end.row, t.end.col),
                t.origin,
            )
        })
        .collect()
}

fn call_tail() -> Vec<Synthesized> {
    vec![
        Synthesized::new(TokenKind::Op, "(", 1),
        Synthesized::new(TokenKind::String, "'x'", 1),
        Synthesized::new(TokenKind::Op, ",", 0),
        Synthesized::new(TokenKind::Op, ")", 1),
    ]
}

// === Layout ===

#[test]
fn synthesized_tokens_chain_from_the_anchor() {
    let mut emitter = Reemitter::new();
    let line: Arc<str> = Arc::from("t @ f'x'\n");
    emitter.emit_rewrite(vec![], tok(TokenKind::Name, "t", 1, 0), &line, call_tail());
    let tokens = emitter.into_tokens();

    assert_eq!(
        spans(&tokens),
        vec![
            ("t", (1, 0), (1, 1), Origin::Source),
            ("(", (1, 2), (1, 3), Origin::Synthesized),
            ("'x'", (1, 4), (1, 7), Origin::Synthesized),
            (",", (1, 7), (1, 8), Origin::Synthesized),
            (")", (1, 9), (1, 10), Origin::Synthesized),
        ]
    );
    assert_eq!(&*tokens[1].line, "t @ f'x'\n");
}

#[test]
fn prefix_names_are_kept() {
    let mut emitter = Reemitter::new();
    let line: Arc<str> = Arc::from("");
    emitter.emit_rewrite(
        vec![tok(TokenKind::Name, "return", 1, 0)],
        tok(TokenKind::Name, "t", 1, 7),
        &line,
        call_tail(),
    );
    let tokens = emitter.into_tokens();
    assert_eq!(tokens[0].text, "return");
    assert_eq!(tokens[2].start, Position::new(1, 9));
}

// === Shifting ===

#[test]
fn only_overlapping_tokens_are_shifted() {
    let mut emitter = Reemitter::new();
    let line: Arc<str> = Arc::from("");
    emitter.emit_rewrite(vec![], tok(TokenKind::Name, "t", 1, 0), &line, call_tail());
    emitter.pass_through(tok(TokenKind::Op, "+", 1, 9));
    emitter.pass_through(tok(TokenKind::String, "'y'", 1, 11));
    let tokens = emitter.into_tokens();

    assert_eq!(
        spans(&tokens[5..]),
        vec![
            ("+", (1, 10), (1, 11), Origin::Shifted),
            ("'y'", (1, 11), (1, 14), Origin::Source),
        ]
    );
}

#[test]
fn tokens_clear_of_the_rewrite_stay_put() {
    let mut emitter = Reemitter::new();
    let line: Arc<str> = Arc::from("");
    emitter.emit_rewrite(vec![], tok(TokenKind::Name, "t", 1, 0), &line, call_tail());
    emitter.pass_through(tok(TokenKind::Op, "+", 1, 20));
    let tokens = emitter.into_tokens();
    assert_eq!(tokens[5].start, Position::new(1, 20));
    assert_eq!(tokens[5].origin, Origin::Source);
}

#[test]
fn other_rows_are_never_shifted() {
    let mut emitter = Reemitter::new();
    let line: Arc<str> = Arc::from("");
    emitter.emit_rewrite(vec![], tok(TokenKind::Name, "t", 1, 0), &line, call_tail());
    emitter.pass_through(tok(TokenKind::Op, "+", 2, 0));
    let tokens = emitter.into_tokens();
    assert_eq!(tokens[5].start, Position::new(2, 0));
    assert_eq!(tokens[5].origin, Origin::Source);
}

#[test]
fn adjacent_source_tokens_without_rewrite_are_untouched() {
    let mut emitter = Reemitter::new();
    for token in tokenize_str("x=1if y else 2\n").unwrap() {
        emitter.pass_through(token);
    }
    assert!(emitter
        .into_tokens()
        .iter()
        .all(|t| t.origin == Origin::Source));
}

#[test]
fn shifted_names_keep_a_separating_space() {
    let mut emitter = Reemitter::new();
    let line: Arc<str> = Arc::from("");
    emitter.emit_rewrite(vec![], tok(TokenKind::Name, "t", 1, 0), &line, call_tail());
    emitter.pass_through(tok(TokenKind::Name, "if", 1, 6));
    emitter.pass_through(tok(TokenKind::Name, "c", 1, 9));
    let tokens = emitter.into_tokens();
    assert_eq!(tokens[5].start, Position::new(1, 10));
    assert_eq!(tokens[6].start, Position::new(1, 13));
}

#[test]
fn multiline_token_keeps_its_end_when_shifted() {
    let mut emitter = Reemitter::new();
    let line: Arc<str> = Arc::from("");
    emitter.emit_rewrite(vec![], tok(TokenKind::Name, "t", 1, 0), &line, call_tail());
    emitter.pass_through(Token::detached(
        TokenKind::String,
        "'''a\nb'''",
        Position::new(1, 5),
        Position::new(2, 4),
    ));
    emitter.pass_through(tok(TokenKind::Op, ")", 2, 4));
    let tokens = emitter.into_tokens();
    assert_eq!(tokens[5].start, Position::new(1, 10));
    assert_eq!(tokens[5].end, Position::new(2, 4));
    assert_eq!(tokens[6].origin, Origin::Source);
}

// === Merge gap ===

#[test]
fn merge_gap_rules() {
    let name = tok(TokenKind::Name, "a", 1, 0);
    let number = tok(TokenKind::Number, "1", 1, 0);
    let string = tok(TokenKind::String, "'s'", 1, 0);
    let dot = tok(TokenKind::Op, ".", 1, 0);
    let star = tok(TokenKind::Op, "*", 1, 0);
    let paren = tok(TokenKind::Op, ")", 1, 0);

    assert_eq!(merge_gap(&name, &name), 1);
    assert_eq!(merge_gap(&name, &string), 1);
    assert_eq!(merge_gap(&number, &dot), 1);
    assert_eq!(merge_gap(&star, &star), 1);
    assert_eq!(merge_gap(&paren, &name), 0);
    assert_eq!(merge_gap(&string, &name), 0);
    assert_eq!(merge_gap(&paren, &star), 0);
}
