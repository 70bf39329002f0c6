//! Lowering pieces to call-argument tokens.
//!
//! `[Text("hello "), Interpolation(name)]` becomes the token tail of
//!
//! ```text
//!  ( 'hello ',(lambda:(name),'name',None,None), )
//! ```
//!
//! Static text is a quoted string; a descriptor is a 4-tuple of a
//! zero-argument lambda, the quoted expression text, the conversion marker
//! and the format spec. Every argument is followed by a comma.

use tagstr_ir::pyrepr::repr_str;
use tagstr_ir::{FormatSpecText, Interpolation, Piece, TokenKind};

use crate::decompose::{expression_tokens, LiteralError};
use crate::reemit::Synthesized;

/// Tokens from the call's `(` through its `)`.
pub fn lower_pieces(pieces: &[Piece]) -> Result<Vec<Synthesized>, LiteralError> {
    let mut out = vec![Synthesized::new(TokenKind::Op, "(", 1)];
    let first_arg = out.len();

    for piece in pieces {
        match piece {
            Piece::Text(text) => out.push(string(repr_str(text))),
            Piece::Interpolation(interpolation) => lower_descriptor(&mut out, interpolation)?,
        }
        out.push(op(","));
    }

    if let Some(first) = out.get_mut(first_arg) {
        first.gap = 1;
    }
    out.push(Synthesized::new(TokenKind::Op, ")", 1));
    Ok(out)
}

fn lower_descriptor(out: &mut Vec<Synthesized>, interpolation: &Interpolation) -> Result<(), LiteralError> {
    let expr = expression_tokens(&interpolation.expr_text).map_err(|source| {
        LiteralError::Expression {
            expr: interpolation.expr_text.clone(),
            offset: 0,
            source,
        }
    })?;

    out.push(op("("));
    out.push(Synthesized::new(TokenKind::Name, "lambda", 0));
    out.push(op(":"));
    out.push(op("("));
    let mut prev_end = None;
    for token in expr {
        let gap = u32::from(prev_end.is_some_and(|end| end != token.start));
        prev_end = Some(token.end);
        out.push(Synthesized::new(token.kind, token.text, gap));
    }
    out.push(op(")"));

    out.push(op(","));
    out.push(string(repr_str(&interpolation.expr_text)));

    out.push(op(","));
    out.push(match &interpolation.conversion {
        Some(conversion) => string(repr_str(conversion.marker())),
        None => none(),
    });

    out.push(op(","));
    out.push(match &interpolation.format_spec {
        Some(FormatSpecText::Plain(spec)) => string(repr_str(spec)),
        Some(FormatSpecText::Nested(literal)) => string(literal.clone()),
        None => none(),
    });

    out.push(op(")"));
    Ok(())
}

fn op(text: &str) -> Synthesized {
    Synthesized::new(TokenKind::Op, text, 0)
}

fn string(text: String) -> Synthesized {
    Synthesized::new(TokenKind::String, text, 0)
}

fn none() -> Synthesized {
    Synthesized::new(TokenKind::Name, "None", 0)
}
