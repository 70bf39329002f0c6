//! End-to-end: pieces found by the rewriter, rendered by the runtime, give
//! what the plain f-string would.

#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use tagstr_ir::{FormatSpecText, Piece};
use tagstr_rewrite::find_tag_sites;
use tagstr_runtime::{render, Thunk, Value};

/// Evaluate the single tag site in `source` with `env` bound, the way the
/// rewritten call would pass its arguments.
fn render_site(source: &str, env: &[(&str, Value)]) -> String {
    let env: HashMap<String, Value> = env.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect();
    let sites = find_tag_sites(source).unwrap();
    assert_eq!(sites.len(), 1);

    let args: Vec<Value> = sites[0]
        .pieces
        .iter()
        .map(|piece| match piece {
            Piece::Text(text) => Value::str(text.as_str()),
            Piece::Interpolation(field) => {
                let value = env[&field.expr_text].clone();
                let spec = match &field.format_spec {
                    Some(FormatSpecText::Plain(spec)) => Some(spec.as_str()),
                    Some(FormatSpecText::Nested(_)) => panic!("nested specs need the host"),
                    None => None,
                };
                let conversion = field.conversion.as_ref().map(|c| c.marker());
                Thunk::pack(move || value.clone(), &field.expr_text, conversion, spec)
            }
        })
        .collect();

    render(&args).unwrap()
}

#[test]
fn greeting() {
    assert_eq!(
        render_site("t @ f'hello {name}!'", &[("name", Value::str("world"))]),
        "hello world!"
    );
}

#[test]
fn specs_and_conversions() {
    let env = [
        ("price", Value::Float(4.5678)),
        ("item", Value::str("tea")),
        ("n", Value::Int(7)),
    ];
    assert_eq!(
        render_site("t @ f'{item!r:>7}|{n:03d}|{price:.2f}'", &env),
        "  'tea'|007|4.57"
    );
}

#[test]
fn adjacent_fields_and_escaped_braces() {
    let env = [("a", Value::Int(1)), ("b", Value::Int(2))];
    assert_eq!(render_site("t @ f'{{{a}{b}}}'", &env), "{12}");
}

#[test]
fn self_documenting_field() {
    assert_eq!(
        render_site("t @ f'{x=}'", &[("x", Value::str("v"))]),
        "x='v'"
    );
}
