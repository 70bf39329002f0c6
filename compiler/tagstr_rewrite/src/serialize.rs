//! Token stream to source text.
//!
//! Positions drive the layout. Whitespace the tokens do not carry is
//! recovered from their source lines where possible:
//!
//! - between two lexed tokens on one row, the original run of tabs and
//!   spaces is copied
//! - indentation at the start of a row is copied when the source line has
//!   whitespace there, else spaces are used
//! - a row change without a line-break token becomes a `\` continuation;
//!   after a lexed token its original `  \` tail is reused
//!
//! `Indent` and `Dedent` carry no text of their own here; output stops at
//! `EndMarker`.

use tagstr_ir::{Origin, Position, Token, TokenKind};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SerializeError {
    /// A token starts before the end of the token written before it.
    #[error("token {text:?} at {start} overlaps the previous token ending at {previous_end}")]
    PositionRegression {
        text: String,
        start: Position,
        previous_end: Position,
    },
}

impl SerializeError {
    pub fn position(&self) -> Position {
        match self {
            SerializeError::PositionRegression { start, .. } => *start,
        }
    }
}

/// Render tokens back into source text.
pub fn serialize(tokens: &[Token]) -> Result<String, SerializeError> {
    let mut out = String::new();
    let mut prev_end = Position::new(1, 0);
    let mut prev: Option<&Token> = None;

    for token in tokens {
        match token.kind {
            TokenKind::EndMarker => break,
            TokenKind::Indent | TokenKind::Dedent => continue,
            _ => {}
        }
        if token.start < prev_end {
            return Err(SerializeError::PositionRegression {
                text: token.text.clone(),
                start: token.start,
                previous_end: prev_end,
            });
        }

        if token.start.row > prev_end.row {
            let mut rows = token.start.row - prev_end.row;
            if let Some(tail) = prev.and_then(continuation_tail) {
                out.push_str(tail);
                rows -= 1;
            }
            for _ in 0..rows {
                out.push_str("\\\n");
            }
            prev_end = Position::new(token.start.row, 0);
        }

        let gap = token.start.col - prev_end.col;
        if gap > 0 {
            let from = usize_col(prev_end.col);
            let to = usize_col(token.start.col);
            let copied = if prev_end.col == 0 {
                whitespace_between(token, 0, to)
            } else if prev.is_some_and(|p| p.origin == Origin::Source) && token.origin == Origin::Source {
                whitespace_between(token, from, to)
            } else {
                None
            };
            match copied {
                Some(ws) => out.push_str(ws),
                None => out.extend(std::iter::repeat(' ').take(to - from)),
            }
        }

        out.push_str(&token.text);
        prev_end = if token.kind.is_line_break() {
            Position::new(token.end.row + 1, 0)
        } else {
            token.end
        };
        prev = Some(token);
    }

    Ok(out)
}

fn usize_col(col: u32) -> usize {
    usize::try_from(col).unwrap_or(usize::MAX)
}

/// Physical source line `row` of a token, line break included.
fn physical_line(token: &Token, row: u32) -> &str {
    let index = usize_col(row.saturating_sub(token.start.row));
    token.line.split_inclusive('\n').nth(index).unwrap_or("")
}

/// Columns `from..to` of the token's first source line, when they are all
/// whitespace.
fn whitespace_between(token: &Token, from: usize, to: usize) -> Option<&str> {
    let line = physical_line(token, token.start.row);
    let start = line.char_indices().nth(from).map(|(i, _)| i)?;
    let end = line.char_indices().nth(to).map_or(line.len(), |(i, _)| i);
    let slice = line.get(start..end)?;
    let complete = slice.chars().count() == to - from;
    (complete && slice.chars().all(|c| matches!(c, ' ' | '\t' | '\x0c'))).then_some(slice)
}

/// The `  \` + line break that followed a lexed token in its source.
fn continuation_tail(token: &Token) -> Option<&str> {
    if token.origin != Origin::Source || token.kind.is_line_break() {
        return None;
    }
    let line = physical_line(token, token.end.row);
    let start = line
        .char_indices()
        .nth(usize_col(token.end.col))
        .map(|(i, _)| i)?;
    let tail = &line[start..];
    let trimmed = tail.trim_start_matches([' ', '\t', '\x0c']);
    (trimmed == "\\\n" || trimmed == "\\\r\n").then_some(tail)
}
