#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use pretty_assertions::assert_eq;

fn parts(text: &str) -> Vec<FStringPart> {
    parse_fstring(text).unwrap().parts
}

fn lit(s: &str) -> FStringPart {
    FStringPart::Literal(s.to_owned())
}

fn field(text: &str) -> ReplacementField {
    match parse_fstring(text)
        .unwrap()
        .parts
        .into_iter()
        .find_map(|p| match p {
            FStringPart::Field(f) => Some(f),
            FStringPart::Literal(_) => None,
        }) {
        Some(f) => f,
        None => panic!("no field in {text}"),
    }
}

fn error_kind(text: &str) -> FStringErrorKind {
    parse_fstring(text).unwrap_err().kind
}

// === Literals ===

#[test]
fn plain_text() {
    let parsed = parse_fstring("f\"hello\"").unwrap();
    assert_eq!(parsed.prefix, "f");
    assert_eq!(parsed.quote, "\"");
    assert!(!parsed.raw);
    assert_eq!(parsed.parts, vec![lit("hello")]);
}

#[test]
fn empty_literal_has_no_parts() {
    assert_eq!(parts("f''"), vec![]);
}

#[test]
fn doubled_braces_are_literal() {
    assert_eq!(parts("f'{{x}}'"), vec![lit("{x}")]);
}

#[test]
fn escapes_are_decoded() {
    assert_eq!(parts(r"f'a\n\x41'"), vec![lit("a\nA")]);
}

#[test]
fn raw_literals_keep_backslashes() {
    let parsed = parse_fstring(r"rf'a\n{x}'").unwrap();
    assert!(parsed.raw);
    assert_eq!(parsed.parts[0], lit("a\\n"));
}

#[test]
fn backslash_before_brace_keeps_the_field() {
    let parsed = parts(r"f'\{x}'");
    assert_eq!(parsed[0], lit("\\"));
    assert!(matches!(&parsed[1], FStringPart::Field(f) if f.expr == "x"));
}

#[test]
fn triple_quoted_body_spans_lines() {
    let parsed = parse_fstring("F'''\nhello {b}\n'''").unwrap();
    assert_eq!(parsed.quote, "'''");
    assert_eq!(parsed.parts.len(), 3);
    assert_eq!(parsed.parts[0], lit("\nhello "));
    assert_eq!(parsed.parts[2], lit("\n"));
}

// === Fields ===

#[test]
fn fields_between_text() {
    let parsed = parts("f\"hello {name}!\"");
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[0], lit("hello "));
    assert!(matches!(&parsed[1], FStringPart::Field(f) if f.expr == "name" && f.offset == 8));
    assert_eq!(parsed[2], lit("!"));
}

#[test]
fn adjacent_fields() {
    let parsed = parts("f'{a}{b}'");
    assert_eq!(parsed.len(), 2);
    assert!(parsed.iter().all(|p| matches!(p, FStringPart::Field(_))));
}

#[test]
fn conversion_and_spec() {
    let f = field("f'{x!r:>10}'");
    assert_eq!(f.expr, "x");
    assert_eq!(f.conversion.as_deref(), Some("r"));
    let spec = f.spec.unwrap();
    assert_eq!(spec.source, ">10");
    assert_eq!(spec.static_text().as_deref(), Some(">10"));
    assert!(!spec.has_fields());
}

#[test]
fn unknown_conversion_is_carried_through() {
    assert_eq!(field("f'{x!z}'").conversion.as_deref(), Some("z"));
}

#[test]
fn nested_spec_field() {
    let spec = field("f'{x:>{width}}'").spec.unwrap();
    assert_eq!(spec.source, ">{width}");
    assert!(spec.has_fields());
    assert_eq!(spec.static_text(), None);
}

#[test]
fn spec_may_contain_colons() {
    assert_eq!(field("f'{t:%H:%M}'").spec.unwrap().source, "%H:%M");
}

#[test]
fn brackets_and_strings_do_not_end_the_expression() {
    assert_eq!(field("f\"{d['k']}\"").expr, "d['k']");
    assert_eq!(field("f'{d[1:2]}'").expr, "d[1:2]");
    assert_eq!(field("f'{ {\"a\": 1}[\"a\"] }'").expr, " {\"a\": 1}[\"a\"] ");
    assert_eq!(field("f'{f(a, b)}'").expr, "f(a, b)");
}

#[test]
fn comparison_operators_stay_in_the_expression() {
    assert_eq!(field("f'{a == b}'").expr, "a == b");
    assert_eq!(field("f'{a != b}'").expr, "a != b");
    assert_eq!(field("f'{a <= b}'").expr, "a <= b");
}

#[test]
fn self_documenting_field() {
    let f = field("f'{x = }'");
    assert_eq!(f.expr, "x ");
    assert_eq!(f.debug_text.as_deref(), Some("x = "));

    let f = field("f'{x=!s:>4}'");
    assert_eq!(f.debug_text.as_deref(), Some("x="));
    assert_eq!(f.conversion.as_deref(), Some("s"));
}

// === Errors ===

#[test]
fn lone_close_brace() {
    let err = parse_fstring("f'a}'").unwrap_err();
    assert_eq!(err, FStringError::new(3, FStringErrorKind::LoneCloseBrace));
}

#[test]
fn unterminated_field() {
    let err = parse_fstring("f'{x'").unwrap_err();
    assert_eq!(err, FStringError::new(2, FStringErrorKind::UnterminatedField));
    assert_eq!(error_kind("f'{x!r'"), FStringErrorKind::UnterminatedField);
}

#[test]
fn empty_expression() {
    assert_eq!(error_kind("f'{}'"), FStringErrorKind::EmptyExpression);
    assert_eq!(error_kind("f'{ }'"), FStringErrorKind::EmptyExpression);
}

#[test]
fn missing_conversion() {
    assert_eq!(error_kind("f'{x!}'"), FStringErrorKind::MissingConversion);
}

#[test]
fn backslash_and_comment_in_expression() {
    assert_eq!(
        error_kind(r"f'{a\n}'"),
        FStringErrorKind::BackslashInExpression
    );
    assert_eq!(error_kind("f'{a#}'"), FStringErrorKind::CommentInExpression);
}

#[test]
fn nesting_is_limited() {
    assert_eq!(error_kind("f'{x:{y:{z}}}'"), FStringErrorKind::NestedTooDeeply);
}

#[test]
fn named_escape_braces_do_not_open_a_field() {
    let parsed = parse_fstring(r"f'\N{EM DASH}{x}\N{bullet}'").unwrap();
    assert_eq!(parsed.parts.len(), 3);
    assert_eq!(parsed.parts[0], FStringPart::Literal("\u{2014}".into()));
    assert_eq!(parsed.parts[2], FStringPart::Literal("\u{2022}".into()));
}

#[test]
fn raw_fstring_keeps_named_escape_text_and_field() {
    let parsed = parse_fstring(r"rf'\N{x}'").unwrap();
    assert_eq!(parsed.parts[0], FStringPart::Literal("\\N".into()));
    assert!(matches!(parsed.parts[1], FStringPart::Field(_)));
}

#[test]
fn bad_named_escapes_are_rejected() {
    assert_eq!(
        error_kind(r"f'\N{NOT A REAL NAME}'"),
        FStringErrorKind::Escape(EscapeErrorKind::UnknownName {
            name: "NOT A REAL NAME".into()
        })
    );
    assert_eq!(
        error_kind(r"f'\N{EM DASH'"),
        FStringErrorKind::Escape(EscapeErrorKind::MalformedName)
    );
}

#[test]
fn plain_strings_are_rejected() {
    assert_eq!(error_kind("'abc'"), FStringErrorKind::NotAnFString);
    assert_eq!(error_kind("abc"), FStringErrorKind::NotAnFString);
}
