//! Rewindable token cursor.
//!
//! Wraps a token source with a push-back buffer so the matcher can consume
//! tokens speculatively and hand them back. Every token pulled since the
//! last checkpoint lives in an arena; `index` splits it into the consumed
//! prefix and the pending (rewound) suffix.

use tagstr_ir::Token;
use tagstr_lexer::TokenizeError;
use thiserror::Error;

/// Failure to deliver or rewind a token.
#[derive(Debug, Error)]
pub enum CursorError {
    #[error("end of token stream")]
    EndOfStream,
    #[error("no token consumed since the last checkpoint")]
    NothingToRewind,
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
}

/// Token cursor with unbounded rewind back to the last checkpoint.
pub struct Cursor<I> {
    source: I,
    arena: Vec<Token>,
    /// Next arena slot to deliver; `arena[..index]` is consumed.
    index: usize,
}

impl<I> Cursor<I>
where
    I: Iterator<Item = Result<Token, TokenizeError>>,
{
    pub fn new(source: I) -> Self {
        Cursor {
            source,
            arena: Vec::new(),
            index: 0,
        }
    }

    /// Deliver the next token: a rewound one first, else a fresh one.
    #[allow(
        clippy::should_implement_trait,
        reason = "fallible delivery with a distinct end-of-stream error"
    )]
    pub fn next(&mut self) -> Result<Token, CursorError> {
        if self.index == self.arena.len() {
            let token = self.source.next().ok_or(CursorError::EndOfStream)??;
            self.arena.push(token);
        }
        let token = self.arena[self.index].clone();
        self.index += 1;
        tracing::trace!(?token, "cursor next");
        Ok(token)
    }

    /// Push the most recently consumed token back.
    pub fn rewind(&mut self) -> Result<(), CursorError> {
        if self.index == 0 {
            return Err(CursorError::NothingToRewind);
        }
        self.index -= 1;
        tracing::trace!(token = ?self.arena[self.index], "cursor rewind");
        Ok(())
    }

    /// Tokens consumed since the last checkpoint, in delivery order.
    pub fn consumed(&self) -> &[Token] {
        &self.arena[..self.index]
    }

    /// Number of rewound tokens waiting to be redelivered.
    pub fn pending(&self) -> usize {
        self.arena.len() - self.index
    }

    /// Copy out the consumed tokens; with `clear`, also checkpoint so they
    /// can no longer be rewound.
    pub fn drain_consumed(&mut self, clear: bool) -> Vec<Token> {
        if clear {
            let drained: Vec<Token> = self.arena.drain(..self.index).collect();
            self.index = 0;
            drained
        } else {
            self.consumed().to_vec()
        }
    }
}
