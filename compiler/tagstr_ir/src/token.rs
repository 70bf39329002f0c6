//! Token types for Python source as seen by the rewriter.
//!
//! Token classes mirror the host tokenizer: names, numbers, strings,
//! operators, comments, the two flavours of line break, indentation and the
//! end marker. Every token carries its absolute start/end positions and the
//! physical source line(s) it was lexed from.

use std::fmt;
use std::sync::Arc;

use crate::Position;

/// Semantic class of a token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Identifier or keyword.
    Name,
    /// Numeric literal.
    Number,
    /// String literal including its prefix and quotes.
    String,
    /// Operator or delimiter.
    Op,
    /// `#` comment up to (not including) the line break.
    Comment,
    /// Logical end of a statement.
    Newline,
    /// Non-logical line break (blank line, comment line, inside brackets).
    Nl,
    /// Indentation increase; text is the leading whitespace.
    Indent,
    /// Indentation decrease; zero width.
    Dedent,
    /// End of input.
    EndMarker,
    /// A character that starts no valid token.
    ErrorToken,
}

impl TokenKind {
    /// Upper-case class name as printed by `tagstr lex`.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Name => "NAME",
            TokenKind::Number => "NUMBER",
            TokenKind::String => "STRING",
            TokenKind::Op => "OP",
            TokenKind::Comment => "COMMENT",
            TokenKind::Newline => "NEWLINE",
            TokenKind::Nl => "NL",
            TokenKind::Indent => "INDENT",
            TokenKind::Dedent => "DEDENT",
            TokenKind::EndMarker => "ENDMARKER",
            TokenKind::ErrorToken => "ERRORTOKEN",
        }
    }

    /// `Newline` or `Nl`.
    #[inline]
    pub fn is_line_break(self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Nl)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a token's position came from.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Origin {
    /// Lexed from the input at its original position.
    #[default]
    Source,
    /// Lexed from the input, moved right by the re-emitter.
    Shifted,
    /// Created by a rewrite.
    Synthesized,
}

/// A token with its positions and originating line.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: Position,
    pub end: Position,
    /// Physical line(s) the token was lexed from, line breaks included.
    pub line: Arc<str>,
    pub origin: Origin,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        start: Position,
        end: Position,
        line: Arc<str>,
    ) -> Self {
        Token {
            kind,
            text: text.into(),
            start,
            end,
            line,
            origin: Origin::Source,
        }
    }

    /// Create a token without a source line, for tests and generated code.
    pub fn detached(kind: TokenKind, text: impl Into<String>, start: Position, end: Position) -> Self {
        Token::new(kind, text, start, end, Arc::from(""))
    }

    #[inline]
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Op && self.text == op
    }

    #[inline]
    pub fn is_name(&self) -> bool {
        self.kind == TokenKind::Name
    }

    /// True for a string token whose prefix marks it as interpolating.
    pub fn is_fstring(&self) -> bool {
        self.kind == TokenKind::String
            && string_prefix(&self.text)
                .chars()
                .any(|c| c.eq_ignore_ascii_case(&'f'))
    }

    /// True when the token spans more than one row.
    #[inline]
    pub fn is_multiline(&self) -> bool {
        self.end.row > self.start.row
    }

    /// Width in columns of a single-row token.
    #[inline]
    pub fn width(&self) -> u32 {
        self.end.col.saturating_sub(self.start.col)
    }

    /// Move the token so it starts at `start`.
    ///
    /// A single-row token keeps its width. A multi-row token keeps its end,
    /// since only its first row can be displaced.
    #[must_use]
    pub fn moved_to(mut self, start: Position) -> Self {
        if !self.is_multiline() {
            self.end = Position::new(start.row, start.col + self.width());
        }
        self.start = start;
        self
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:?} @ {}-{}",
            self.kind, self.text, self.start, self.end
        )
    }
}

/// The prefix letters of a string literal (`rb`, `f`, ...), possibly empty.
pub fn string_prefix(text: &str) -> &str {
    let end = text.find(['\'', '"']).unwrap_or(0);
    &text[..end]
}

#[cfg(test)]
mod tests;
