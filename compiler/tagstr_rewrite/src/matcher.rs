//! Tag expression matcher.
//!
//! One attempt recognises `NAME @ f"..."` at the cursor, allowing line
//! breaks around the marker and grouping parentheses around the literal:
//!
//! 1. names: the last of a run of names is the anchor, the others are kept
//!    as a prefix (`return tag @ f"..."`)
//! 2. marker: `@`
//! 3. literal: the first f-string, after any number of `(`
//! 4. brackets: one `)` per `(` from step 3
//!
//! Steps 1 to 3 fail softly: the consumed tokens pass through unchanged.
//! Comments and line breaks may sit between the marker and the literal. A
//! failure in step 4 is a hard error, since an f-string after the marker
//! means the author wrote a tag expression; so is a string literal right
//! after the operand (implicit concatenation).

use tagstr_ir::{Token, TokenKind};
use tagstr_lexer::TokenizeError;

use crate::cursor::{Cursor, CursorError};
use crate::TransformError;

/// A recognised tag expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagSite {
    /// Tokens before the anchor that are emitted unchanged.
    pub prefix: Vec<Token>,
    /// The tag name.
    pub anchor: Token,
    /// The f-string operand.
    pub literal: Token,
}

/// Outcome of one matching attempt.
#[derive(Debug)]
pub enum Attempt {
    Matched(TagSite),
    /// Consumed tokens are ordinary source.
    NoMatch,
    /// The token stream has ended.
    Exhausted,
}

fn pull<I>(cursor: &mut Cursor<I>) -> Result<Option<Token>, TransformError>
where
    I: Iterator<Item = Result<Token, TokenizeError>>,
{
    match cursor.next() {
        Ok(token) => Ok(Some(token)),
        Err(CursorError::EndOfStream) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Try to match a tag expression starting at the cursor.
pub fn match_tag<I>(cursor: &mut Cursor<I>) -> Result<Attempt, TransformError>
where
    I: Iterator<Item = Result<Token, TokenizeError>>,
{
    // Names
    let Some(first) = pull(cursor)? else {
        return Ok(Attempt::Exhausted);
    };
    if !first.is_name() {
        return Ok(Attempt::NoMatch);
    }
    let mut prefix = Vec::new();
    let mut breaks = Vec::new();
    let mut anchor = first;
    loop {
        let Some(token) = pull(cursor)? else {
            return Ok(Attempt::NoMatch);
        };
        match token.kind {
            TokenKind::Name => {
                prefix.push(anchor);
                prefix.append(&mut breaks);
                anchor = token;
            }
            TokenKind::Nl => breaks.push(token),
            _ => {
                cursor.rewind()?;
                break;
            }
        }
    }
    tracing::trace!(anchor = %anchor.text, "matcher: anchor candidate");

    // Marker
    loop {
        let Some(token) = pull(cursor)? else {
            return Ok(Attempt::NoMatch);
        };
        match token.kind {
            TokenKind::Newline | TokenKind::Nl => {}
            TokenKind::Op if token.text == "@" => break,
            TokenKind::Name => {
                cursor.rewind()?;
                return Ok(Attempt::NoMatch);
            }
            _ => return Ok(Attempt::NoMatch),
        }
    }
    tracing::trace!("matcher: marker");

    // Literal
    let mut depth = 0u32;
    let literal = loop {
        let Some(token) = pull(cursor)? else {
            return Ok(Attempt::NoMatch);
        };
        match token.kind {
            TokenKind::String if token.is_fstring() => break token,
            TokenKind::Op if token.text == "(" => depth += 1,
            TokenKind::Newline | TokenKind::Nl | TokenKind::Comment => {}
            TokenKind::Name => {
                cursor.rewind()?;
                return Ok(Attempt::NoMatch);
            }
            _ => return Ok(Attempt::NoMatch),
        }
    };
    tracing::trace!(depth, literal = %literal.start, "matcher: literal");

    // Brackets
    let mut last_end = literal.end;
    if depth == 0 {
        reject_concatenation(cursor, &literal)?;
    }
    while depth > 0 {
        let token = match cursor.next() {
            Ok(token) => token,
            Err(CursorError::EndOfStream | CursorError::Tokenize(TokenizeError::UnexpectedEof { .. })) => {
                return Err(TransformError::malformed(
                    last_end,
                    "input ended before ')' closing the tag operand",
                ));
            }
            Err(err) => return Err(err.into()),
        };
        match token.kind {
            TokenKind::Nl | TokenKind::Comment => {}
            TokenKind::Op if token.text == ")" => depth -= 1,
            TokenKind::String => return Err(concatenation_error(&token)),
            _ => {
                return Err(TransformError::malformed(
                    token.start,
                    format!("expected ')' after the tag operand, found {} {:?}", token.kind, token.text),
                ));
            }
        }
        last_end = token.end;
    }

    Ok(Attempt::Matched(TagSite {
        prefix,
        anchor,
        literal,
    }))
}

/// An unparenthesized operand followed directly by another string literal
/// is implicit concatenation. The lookahead token is handed back otherwise.
fn reject_concatenation<I>(cursor: &mut Cursor<I>, literal: &Token) -> Result<(), TransformError>
where
    I: Iterator<Item = Result<Token, TokenizeError>>,
{
    match pull(cursor)? {
        Some(token) if token.kind == TokenKind::String => {
            tracing::trace!(literal = %literal.start, "matcher: concatenated operand");
            Err(concatenation_error(&token))
        }
        Some(_) => {
            cursor.rewind()?;
            Ok(())
        }
        None => Ok(()),
    }
}

fn concatenation_error(token: &Token) -> TransformError {
    TransformError::malformed(
        token.start,
        "a tag operand must be a single f-string; implicit string concatenation is not supported",
    )
}

#[cfg(test)]
mod tests;
