//! Rewrite-time errors.
//!
//! Any of these aborts the transform of the whole file; there is no partial
//! output.

use tagstr_ir::Position;
use tagstr_lexer::TokenizeError;
use thiserror::Error;

use crate::cursor::CursorError;
use crate::decompose::LiteralError;
use crate::serialize::SerializeError;

#[derive(Debug, Error)]
pub enum TransformError {
    /// `tag @ (f"..."` whose grouping never closes, or closes around
    /// something other than the literal.
    #[error("malformed tag expression at {position}: {message}")]
    Malformed { position: Position, message: String },
    /// The f-string operand could not be decomposed.
    #[error("invalid f-string at {position}: {source}")]
    Literal {
        position: Position,
        #[source]
        source: LiteralError,
    },
    #[error(transparent)]
    Tokenize(TokenizeError),
    #[error(transparent)]
    Serialize(#[from] SerializeError),
    #[error("token cursor misuse: {0}")]
    Cursor(CursorError),
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),
}

impl TransformError {
    pub fn malformed(position: Position, message: impl Into<String>) -> Self {
        TransformError::Malformed {
            position,
            message: message.into(),
        }
    }

    /// Source position of the failure, when known.
    pub fn position(&self) -> Option<Position> {
        match self {
            TransformError::Malformed { position, .. } | TransformError::Literal { position, .. } => {
                Some(*position)
            }
            TransformError::Tokenize(err) => err.position(),
            TransformError::Serialize(err) => Some(err.position()),
            TransformError::Cursor(_) | TransformError::Io(_) => None,
        }
    }
}

impl From<TokenizeError> for TransformError {
    fn from(err: TokenizeError) -> Self {
        match err {
            TokenizeError::Io(io) => TransformError::Io(io),
            other => TransformError::Tokenize(other),
        }
    }
}

impl From<CursorError> for TransformError {
    fn from(err: CursorError) -> Self {
        match err {
            CursorError::Tokenize(err) => err.into(),
            other => TransformError::Cursor(other),
        }
    }
}
