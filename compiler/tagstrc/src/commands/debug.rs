//! Debugging views: the token stream and the decomposed tag expressions.

use std::fmt::Write as _;

use tagstr_ir::{FormatSpecText, Piece};
use tagstr_lexer::tokenize_str;
use tagstr_rewrite::{find_tag_sites, TransformError};

use super::{fail_with, read_file};
use crate::Config;

/// One line per token: kind, span and text.
pub fn lex_listing(source: &str) -> Result<String, TransformError> {
    let tokens = tokenize_str(source)?;
    let mut out = String::new();
    for token in &tokens {
        let span = format!("{}-{}", token.start, token.end);
        let _ = writeln!(out, "{:<12} {span:<12} {:?}", token.kind.name(), token.text);
    }
    Ok(out)
}

/// Each tag expression with its pieces, indented under the tag.
pub fn pieces_listing(source: &str) -> Result<String, TransformError> {
    let mut out = String::new();
    for site in find_tag_sites(source)? {
        let _ = writeln!(out, "{} @ {}", site.tag, site.position);
        for piece in &site.pieces {
            match piece {
                Piece::Text(text) => {
                    let _ = writeln!(out, "  text  {text:?}");
                }
                Piece::Interpolation(field) => {
                    let _ = write!(out, "  field {:?}", field.expr_text);
                    if let Some(conversion) = &field.conversion {
                        let _ = write!(out, " !{conversion}");
                    }
                    match &field.format_spec {
                        Some(FormatSpecText::Plain(spec)) => {
                            let _ = write!(out, " :{spec:?}");
                        }
                        Some(FormatSpecText::Nested(literal)) => {
                            let _ = write!(out, " :{literal}");
                        }
                        None => {}
                    }
                    out.push('\n');
                }
            }
        }
    }
    Ok(out)
}

pub fn run_lex(path: &str, config: &Config) {
    let source = read_file(path);
    match lex_listing(&source) {
        Ok(listing) => print!("{listing}"),
        Err(err) => fail_with(&err, path, &source, config),
    }
}

pub fn run_pieces(path: &str, config: &Config) {
    let source = read_file(path);
    match pieces_listing(&source) {
        Ok(listing) if listing.is_empty() => println!("{path}: no tag expressions"),
        Ok(listing) => print!("{listing}"),
        Err(err) => fail_with(&err, path, &source, config),
    }
}
