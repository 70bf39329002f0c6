//! Position re-emission.
//!
//! Rewritten tokens have no source position of their own. They are laid
//! out contiguously on the anchor's row, starting at the anchor's end.
//! Pass-through tokens that follow on that row would then overlap the new
//! text, so they are shifted right, one by one, just far enough to clear
//! the previous token. Rows without a rewrite are never touched.

use std::sync::Arc;

use tagstr_ir::{Origin, Position, Token, TokenKind};
use tagstr_lexer::is_operator;

/// A token produced by a rewrite, before layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Synthesized {
    pub kind: TokenKind,
    pub text: String,
    /// Columns of space before the token.
    pub gap: u32,
}

impl Synthesized {
    pub fn new(kind: TokenKind, text: impl Into<String>, gap: u32) -> Self {
        Synthesized {
            kind,
            text: text.into(),
            gap,
        }
    }
}

/// Columns that must separate `prev` and `next` so they do not lex as one
/// token when written side by side.
pub fn merge_gap(prev: &Token, next: &Token) -> u32 {
    let word_like = |kind| matches!(kind, TokenKind::Name | TokenKind::Number);
    let merges = (word_like(prev.kind)
        && matches!(next.kind, TokenKind::Name | TokenKind::Number | TokenKind::String))
        || (prev.kind == TokenKind::Number && next.is_op("."))
        || (prev.kind == TokenKind::Op
            && next.kind == TokenKind::Op
            && is_operator(&format!("{}{}", prev.text, next.text)));
    u32::from(merges)
}

fn text_width(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

/// Output token stream with position correction.
#[derive(Default)]
pub struct Reemitter {
    out: Vec<Token>,
    /// Row holding the most recent rewrite or shift.
    displaced_row: Option<u32>,
}

impl Reemitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a lexed token, shifting it if it would collide with displaced
    /// text on its row.
    pub fn pass_through(&mut self, token: Token) {
        let token = self.place(token);
        self.out.push(token);
    }

    fn place(&mut self, token: Token) -> Token {
        let Some(last) = self.out.last() else {
            return token;
        };
        if self.displaced_row != Some(token.start.row) || last.end.row != token.start.row {
            return token;
        }
        let target = last.end.right(merge_gap(last, &token));
        if token.start >= target {
            return token;
        }
        tracing::trace!(?token, %target, "shifting pass-through token");
        let mut moved = token.moved_to(target);
        moved.origin = Origin::Shifted;
        moved
    }

    /// Emit a rewritten tag expression: the prefix names and anchor as
    /// lexed, then `tail` laid out from the anchor's end.
    ///
    /// Synthesized tokens take `line` as their source line.
    pub fn emit_rewrite(
        &mut self,
        prefix: Vec<Token>,
        anchor: Token,
        line: &Arc<str>,
        tail: Vec<Synthesized>,
    ) {
        for token in prefix {
            self.pass_through(token);
        }
        self.pass_through(anchor);

        let mut at = self.out.last().map_or(Position::new(1, 0), |t| t.end);
        for synth in tail {
            let start = at.right(synth.gap);
            let end = start.right(text_width(&synth.text));
            self.out.push(Token {
                kind: synth.kind,
                text: synth.text,
                start,
                end,
                line: Arc::clone(line),
                origin: Origin::Synthesized,
            });
            at = end;
        }
        self.displaced_row = Some(at.row);
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.out
    }
}

#[cfg(test)]
mod tests;
