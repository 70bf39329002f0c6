//! Tokenizer error types.

use tagstr_ir::Position;
use thiserror::Error;

/// A failure that stops the token stream.
///
/// Recoverable oddities (a stray character, an unterminated single-line
/// string) are reported in-band as `ErrorToken`s instead.
#[derive(Debug, Error)]
pub enum TokenizeError {
    /// End of input inside a triple-quoted or continued string.
    #[error("EOF in multi-line string starting at {start}")]
    UnterminatedString { start: Position },
    /// End of input inside brackets or after a line continuation.
    #[error("EOF in multi-line statement at line {row}")]
    UnexpectedEof { row: u32 },
    /// A dedent to a column that matches no enclosing indentation level.
    #[error("unindent does not match any outer indentation level (line {row})")]
    InconsistentDedent { row: u32 },
    /// The line reader failed.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

impl TokenizeError {
    /// Best-known position of the failure, for diagnostics.
    pub fn position(&self) -> Option<Position> {
        match self {
            TokenizeError::UnterminatedString { start } => Some(*start),
            TokenizeError::UnexpectedEof { row } | TokenizeError::InconsistentDedent { row } => {
                Some(Position::new(*row, 0))
            }
            TokenizeError::Io(_) => None,
        }
    }
}
