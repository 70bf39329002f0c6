//! Literal decomposition.
//!
//! Turns the text of an f-string token into ordered [`Piece`]s. Parsing of
//! the literal interior sits behind [`LiteralParser`]; the default
//! implementation delegates to `tagstr_lexer::fstring`.
//!
//! Piece rules:
//! - every static segment is a `Text` piece
//! - `{x=}` contributes the text `x=` as written, then the interpolation;
//!   its conversion defaults to `r` when neither conversion nor spec is given
//! - two interpolations in a row are separated by an empty `Text`
//! - an empty literal decomposes to a single empty `Text`

use tagstr_ir::{Conversion, FormatSpecText, Interpolation, Piece, Position, Token, TokenKind};
use tagstr_lexer::fstring::{parse_fstring, FString, FStringError, FStringPart, ReplacementField};
use tagstr_lexer::{tokenize_str, TokenizeError};
use thiserror::Error;

use crate::TransformError;

/// Why an f-string could not be decomposed.
#[derive(Debug, Error)]
pub enum LiteralError {
    #[error(transparent)]
    FString(#[from] FStringError),
    #[error("conversion must be a single character, found '!{marker}'")]
    Conversion { marker: String, offset: usize },
    #[error("invalid expression '{expr}': {source}")]
    Expression {
        expr: String,
        offset: usize,
        #[source]
        source: TokenizeError,
    },
}

impl LiteralError {
    /// Character offset of the failure in the literal's token text.
    pub fn offset(&self) -> usize {
        match self {
            LiteralError::FString(err) => err.offset,
            LiteralError::Conversion { offset, .. } | LiteralError::Expression { offset, .. } => {
                *offset
            }
        }
    }
}

/// Capability to split an interpolated literal into pieces.
pub trait LiteralParser {
    fn parse_interpolated_literal(&self, text: &str) -> Result<Vec<Piece>, LiteralError>;
}

/// The host f-string grammar.
#[derive(Copy, Clone, Debug, Default)]
pub struct FStringParser;

impl LiteralParser for FStringParser {
    fn parse_interpolated_literal(&self, text: &str) -> Result<Vec<Piece>, LiteralError> {
        let fstring = parse_fstring(text)?;
        let mut pieces = PieceList::default();
        for part in &fstring.parts {
            match part {
                FStringPart::Literal(text) => pieces.push_text(text),
                FStringPart::Field(field) => {
                    if let Some(debug_text) = &field.debug_text {
                        pieces.push_text(debug_text);
                    }
                    pieces.push_interpolation(interpolation(&fstring, field)?);
                }
            }
        }
        Ok(pieces.finish())
    }
}

/// Decompose an f-string token, locating any failure in the source.
pub fn decompose_token(
    parser: &impl LiteralParser,
    literal: &Token,
) -> Result<Vec<Piece>, TransformError> {
    parser
        .parse_interpolated_literal(&literal.text)
        .map_err(|source| TransformError::Literal {
            position: offset_position(literal, source.offset()),
            source,
        })
}

/// Position of the character `offset` chars into a token's text.
fn offset_position(token: &Token, offset: usize) -> Position {
    token
        .text
        .chars()
        .take(offset)
        .fold(token.start, |pos, c| {
            if c == '\n' {
                Position::new(pos.row + 1, 0)
            } else {
                pos.right(1)
            }
        })
}

fn interpolation(fstring: &FString, field: &ReplacementField) -> Result<Interpolation, LiteralError> {
    let expr_text = normalize_expression(&field.expr).map_err(|source| LiteralError::Expression {
        expr: field.expr.trim().to_owned(),
        offset: field.offset,
        source,
    })?;
    let mut interpolation = Interpolation::new(expr_text);

    match &field.conversion {
        Some(marker) if marker.chars().count() == 1 => {
            interpolation = interpolation.with_conversion(Conversion::from_marker(marker));
        }
        Some(marker) => {
            return Err(LiteralError::Conversion {
                marker: marker.clone(),
                offset: field.offset,
            });
        }
        None if field.debug_text.is_some() && field.spec.is_none() => {
            interpolation = interpolation.with_conversion(Conversion::Repr);
        }
        None => {}
    }

    if let Some(spec) = &field.spec {
        let spec = match spec.static_text() {
            Some(text) => FormatSpecText::Plain(text),
            None => {
                let prefix = if fstring.raw { "rf" } else { "f" };
                FormatSpecText::Nested(format!(
                    "{prefix}{quote}{source}{quote}",
                    quote = fstring.quote,
                    source = spec.source
                ))
            }
        };
        interpolation = interpolation.with_spec(spec);
    }

    Ok(interpolation)
}

/// Expression source with surrounding whitespace dropped and interior
/// whitespace collapsed to single spaces between tokens.
pub fn normalize_expression(expr: &str) -> Result<String, TokenizeError> {
    let tokens = expression_tokens(expr)?;
    let mut text = String::with_capacity(expr.len());
    let mut prev_end = None;
    for token in &tokens {
        if prev_end.is_some_and(|end| end != token.start) {
            text.push(' ');
        }
        text.push_str(&token.text);
        prev_end = Some(token.end);
    }
    Ok(text)
}

/// Significant tokens of an expression fragment.
///
/// The fragment is lexed inside parentheses so it may span lines.
pub(crate) fn expression_tokens(expr: &str) -> Result<Vec<Token>, TokenizeError> {
    let wrapped = format!("({expr})");
    let mut tokens: Vec<Token> = tokenize_str(&wrapped)?
        .into_iter()
        .filter(|t| {
            !matches!(
                t.kind,
                TokenKind::Nl
                    | TokenKind::Newline
                    | TokenKind::Comment
                    | TokenKind::Indent
                    | TokenKind::Dedent
                    | TokenKind::EndMarker
            )
        })
        .collect();
    if tokens.len() >= 2 {
        tokens.pop();
        tokens.remove(0);
    }
    Ok(tokens)
}

/// Piece accumulator enforcing the text/interpolation interleaving.
#[derive(Default)]
struct PieceList(Vec<Piece>);

impl PieceList {
    fn push_text(&mut self, text: &str) {
        if let Some(Piece::Text(last)) = self.0.last_mut() {
            last.push_str(text);
        } else {
            self.0.push(Piece::text(text));
        }
    }

    fn push_interpolation(&mut self, interpolation: Interpolation) {
        if self.0.last().is_some_and(Piece::is_interpolation) {
            self.0.push(Piece::text(""));
        }
        self.0.push(Piece::Interpolation(interpolation));
    }

    fn finish(self) -> Vec<Piece> {
        if self.0.is_empty() {
            vec![Piece::text("")]
        } else {
            self.0
        }
    }
}
