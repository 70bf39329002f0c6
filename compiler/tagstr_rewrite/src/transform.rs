//! The rewrite entry points.
//!
//! `transform` drives the matcher over the whole token stream: matched tag
//! expressions are decomposed, lowered and laid out; everything else passes
//! through with position correction; the result is serialized.

use std::io::BufRead;
use std::path::Path;

use tagstr_ir::{Piece, Position, Token};
use tagstr_lexer::{TokenizeError, Tokenizer};

use crate::cursor::Cursor;
use crate::decompose::{decompose_token, FStringParser, LiteralParser};
use crate::lower::lower_pieces;
use crate::matcher::{match_tag, Attempt};
use crate::reemit::Reemitter;
use crate::serialize::serialize;
use crate::TransformError;

/// Rewrite every tag expression in a token stream.
pub fn rewrite_tokens<I>(tokens: I, parser: &impl LiteralParser) -> Result<Vec<Token>, TransformError>
where
    I: Iterator<Item = Result<Token, TokenizeError>>,
{
    let mut cursor = Cursor::new(tokens);
    let mut emitter = Reemitter::new();

    loop {
        match match_tag(&mut cursor)? {
            Attempt::Exhausted => break,
            Attempt::NoMatch => {
                for token in cursor.drain_consumed(true) {
                    emitter.pass_through(token);
                }
            }
            Attempt::Matched(site) => {
                cursor.drain_consumed(true);
                let pieces = decompose_token(parser, &site.literal)?;
                let tail = lower_pieces(&pieces).map_err(|source| TransformError::Literal {
                    position: site.literal.start,
                    source,
                })?;
                tracing::debug!(
                    tag = %site.anchor.text,
                    at = %site.anchor.start,
                    pieces = pieces.len(),
                    "rewrote tag expression"
                );
                emitter.emit_rewrite(site.prefix, site.anchor, &site.literal.line, tail);
            }
        }
    }

    Ok(emitter.into_tokens())
}

/// Rewrite Python source read line by line.
///
/// The result has trailing whitespace trimmed. Failures are logged with
/// their position before being returned; no partial output is produced.
#[tracing::instrument(level = "debug", skip_all)]
pub fn transform<R: BufRead>(reader: R) -> Result<String, TransformError> {
    let result = rewrite_tokens(Tokenizer::new(reader), &FStringParser)
        .and_then(|tokens| Ok(serialize(&tokens)?));
    match result {
        Ok(text) => Ok(text.trim_end().to_owned()),
        Err(err) => {
            let Position { row, col } = err.position().unwrap_or_default();
            tracing::error!(row, col, error = %err, "tagstr transform failed");
            Err(err)
        }
    }
}

pub fn transform_str(source: &str) -> Result<String, TransformError> {
    transform(source.as_bytes())
}

/// Read and rewrite a file. A UTF-8 byte order mark is dropped.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn transform_file(path: &Path) -> Result<String, TransformError> {
    let source = std::fs::read_to_string(path)?;
    transform_str(source.strip_prefix('\u{feff}').unwrap_or(&source))
}

/// A tag expression found in a source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagSiteReport {
    pub tag: String,
    pub position: Position,
    pub pieces: Vec<Piece>,
}

/// Locate and decompose every tag expression without rewriting.
pub fn find_tag_sites(source: &str) -> Result<Vec<TagSiteReport>, TransformError> {
    let mut cursor = Cursor::new(Tokenizer::new(source.as_bytes()));
    let mut sites = Vec::new();
    loop {
        match match_tag(&mut cursor)? {
            Attempt::Exhausted => return Ok(sites),
            Attempt::NoMatch => {}
            Attempt::Matched(site) => sites.push(TagSiteReport {
                pieces: decompose_token(&FStringParser, &site.literal)?,
                tag: site.anchor.text,
                position: site.anchor.start,
            }),
        }
        cursor.drain_consumed(true);
    }
}
