//! F-string interior parser.
//!
//! Splits the text of an f-string token into literal segments and
//! replacement fields following the host grammar:
//!
//! - `{{` and `}}` are literal braces; a lone `}` is an error
//! - a field is `{expr[=][!conversion][:spec]}`; the expression ends at
//!   the first `}`, `!` (not `!=`) or `:` outside brackets and nested
//!   string literals
//! - `expr=` (optionally padded with spaces) marks a self-documenting field
//! - the spec may itself contain fields, one level deep
//! - literal text of non-raw literals is escape-decoded
//!
//! Offsets in errors are character offsets into the token text.

use thiserror::Error;

use crate::escape::{unescape, EscapeErrorKind};

/// Maximum nesting of replacement fields inside format specs.
const MAX_FIELD_DEPTH: u32 = 2;

/// A parsed f-string literal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FString {
    /// Prefix letters as written (`f`, `rf`, `F`, ...).
    pub prefix: String,
    /// Opening/closing quote (`'`, `"`, `'''` or `"""`).
    pub quote: String,
    /// `r`/`R` in the prefix: literal text is not escape-decoded.
    pub raw: bool,
    pub parts: Vec<FStringPart>,
}

/// A literal segment or a replacement field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FStringPart {
    /// Decoded literal text.
    Literal(String),
    Field(ReplacementField),
}

/// One `{...}` replacement field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplacementField {
    /// Expression source exactly as written.
    pub expr: String,
    /// For `{expr=}`: the text from the expression start through `=` and
    /// any whitespace after it.
    pub debug_text: Option<String>,
    /// Conversion marker after `!`, verbatim.
    pub conversion: Option<String>,
    /// Format spec after `:`.
    pub spec: Option<FormatSpecSource>,
    /// Offset of the opening `{` in the token text.
    pub offset: usize,
}

/// A format spec: its source text and its parsed parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatSpecSource {
    /// Spec text as written, nested fields included.
    pub source: String,
    pub parts: Vec<FStringPart>,
}

impl FormatSpecSource {
    /// True when the spec contains replacement fields.
    pub fn has_fields(&self) -> bool {
        self.parts
            .iter()
            .any(|p| matches!(p, FStringPart::Field(_)))
    }

    /// The decoded spec text when it contains no fields.
    pub fn static_text(&self) -> Option<String> {
        let mut text = String::new();
        for part in &self.parts {
            match part {
                FStringPart::Literal(s) => text.push_str(s),
                FStringPart::Field(_) => return None,
            }
        }
        Some(text)
    }
}

/// What went wrong inside an f-string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FStringErrorKind {
    #[error("not an f-string literal")]
    NotAnFString,
    #[error("single '}}' is not allowed")]
    LoneCloseBrace,
    #[error("expecting '}}'")]
    UnterminatedField,
    #[error("empty expression not allowed")]
    EmptyExpression,
    #[error("expression part cannot include a backslash")]
    BackslashInExpression,
    #[error("expression part cannot include '#'")]
    CommentInExpression,
    #[error("missing conversion character")]
    MissingConversion,
    #[error("expressions nested too deeply")]
    NestedTooDeeply,
    #[error("{0}")]
    Escape(EscapeErrorKind),
}

/// An f-string parse failure at a character offset into the token text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("f-string: {kind}")]
pub struct FStringError {
    pub offset: usize,
    pub kind: FStringErrorKind,
}

impl FStringError {
    fn new(offset: usize, kind: FStringErrorKind) -> Self {
        FStringError { offset, kind }
    }
}

/// Parse the full text of an f-string token, prefix and quotes included.
pub fn parse_fstring(text: &str) -> Result<FString, FStringError> {
    let chars: Vec<char> = text.chars().collect();
    let prefix_len = chars
        .iter()
        .position(|c| matches!(c, '\'' | '"'))
        .ok_or(FStringError::new(0, FStringErrorKind::NotAnFString))?;
    let prefix: String = chars[..prefix_len].iter().collect();
    if !prefix.chars().any(|c| c.eq_ignore_ascii_case(&'f')) {
        return Err(FStringError::new(0, FStringErrorKind::NotAnFString));
    }

    let q = chars[prefix_len];
    let triple = chars.len() >= prefix_len + 6
        && chars[prefix_len + 1] == q
        && chars[prefix_len + 2] == q;
    let quote_len = if triple { 3 } else { 1 };
    let body_start = prefix_len + quote_len;
    let body_end = chars.len().saturating_sub(quote_len).max(body_start);

    let mut parser = Parser {
        chars: &chars,
        pos: body_start,
        end: body_end,
        raw: prefix.chars().any(|c| c.eq_ignore_ascii_case(&'r')),
    };
    let parts = parser.parse_parts(false, 0)?;

    Ok(FString {
        prefix,
        quote: std::iter::repeat(q).take(quote_len).collect(),
        raw: parser.raw,
        parts,
    })
}

struct Parser<'a> {
    chars: &'a [char],
    pos: usize,
    end: usize,
    raw: bool,
}

impl Parser<'_> {
    fn peek(&self, ahead: usize) -> Option<char> {
        let i = self.pos + ahead;
        if i < self.end {
            Some(self.chars[i])
        } else {
            None
        }
    }

    fn slice(&self, from: usize, to: usize) -> String {
        self.chars[from..to].iter().collect()
    }

    /// Literal segments and fields up to the end of the body, or up to the
    /// `}` closing the enclosing field when parsing a spec.
    fn parse_parts(&mut self, in_spec: bool, depth: u32) -> Result<Vec<FStringPart>, FStringError> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut literal_start = self.pos;

        while let Some(c) = self.peek(0) {
            match c {
                '}' if in_spec => break,
                '{' if !in_spec && self.peek(1) == Some('{') => {
                    literal.push('{');
                    self.pos += 2;
                }
                '}' if self.peek(1) == Some('}') => {
                    literal.push('}');
                    self.pos += 2;
                }
                '}' => {
                    return Err(FStringError::new(self.pos, FStringErrorKind::LoneCloseBrace));
                }
                '{' => {
                    self.flush_literal(&mut parts, &mut literal, literal_start)?;
                    if depth >= MAX_FIELD_DEPTH {
                        return Err(FStringError::new(self.pos, FStringErrorKind::NestedTooDeeply));
                    }
                    let field = self.parse_field(depth + 1)?;
                    parts.push(FStringPart::Field(field));
                    literal_start = self.pos;
                }
                '\\' if !self.raw => match self.peek(1) {
                    // `\N{name}`: the braces belong to the escape.
                    Some('N') if self.peek(2) == Some('{') => {
                        let Some(close) = (self.pos + 3..self.end).find(|&i| self.chars[i] == '}')
                        else {
                            return Err(FStringError::new(
                                self.pos,
                                FStringErrorKind::Escape(EscapeErrorKind::MalformedName),
                            ));
                        };
                        literal.push_str(&self.slice(self.pos, close + 1));
                        self.pos = close + 1;
                    }
                    // The brace still opens or closes a field.
                    Some('{' | '}') | None => {
                        literal.push_str("\\\\");
                        self.pos += 1;
                    }
                    Some(next) => {
                        literal.push('\\');
                        literal.push(next);
                        self.pos += 2;
                    }
                },
                c => {
                    literal.push(c);
                    self.pos += 1;
                }
            }
        }

        self.flush_literal(&mut parts, &mut literal, literal_start)?;
        Ok(parts)
    }

    fn flush_literal(
        &self,
        parts: &mut Vec<FStringPart>,
        literal: &mut String,
        literal_start: usize,
    ) -> Result<(), FStringError> {
        if literal.is_empty() {
            return Ok(());
        }
        let text = std::mem::take(literal);
        let decoded = if self.raw {
            text
        } else {
            unescape(&text).map_err(|e| {
                FStringError::new(literal_start, FStringErrorKind::Escape(e.kind))
            })?
        };
        parts.push(FStringPart::Literal(decoded));
        Ok(())
    }

    /// Parse a field; `pos` is at its opening `{`.
    fn parse_field(&mut self, depth: u32) -> Result<ReplacementField, FStringError> {
        let open = self.pos;
        self.pos += 1;
        let expr_start = self.pos;
        let unterminated = || FStringError::new(open, FStringErrorKind::UnterminatedField);

        let mut brackets = 0u32;
        let mut debug_end = None;
        let expr_end = loop {
            let Some(c) = self.peek(0) else {
                return Err(unterminated());
            };
            match c {
                '\\' => {
                    return Err(FStringError::new(
                        self.pos,
                        FStringErrorKind::BackslashInExpression,
                    ));
                }
                '#' => {
                    return Err(FStringError::new(
                        self.pos,
                        FStringErrorKind::CommentInExpression,
                    ));
                }
                '\'' | '"' => self.skip_nested_string(c).ok_or_else(unterminated)?,
                '(' | '[' | '{' => {
                    brackets += 1;
                    self.pos += 1;
                }
                ')' | ']' | '}' if brackets > 0 => {
                    brackets -= 1;
                    self.pos += 1;
                }
                '}' => break self.pos,
                ':' if brackets == 0 => break self.pos,
                '!' if brackets == 0 && self.peek(1) != Some('=') => break self.pos,
                '=' if brackets == 0 && self.is_self_documenting_equals() => {
                    let eq = self.pos;
                    self.pos += 1;
                    while matches!(self.peek(0), Some(' ' | '\t' | '\n' | '\r')) {
                        self.pos += 1;
                    }
                    debug_end = Some(self.pos);
                    break eq;
                }
                '!' | '=' | '<' | '>' if self.peek(1) == Some('=') => self.pos += 2,
                _ => self.pos += 1,
            }
        };

        let expr = self.slice(expr_start, expr_end);
        if expr.trim().is_empty() {
            return Err(FStringError::new(expr_start, FStringErrorKind::EmptyExpression));
        }
        let debug_text = debug_end.map(|end| self.slice(expr_start, end));

        let conversion = if self.peek(0) == Some('!') {
            self.pos += 1;
            let start = self.pos;
            while !matches!(self.peek(0), Some(':' | '}') | None) {
                self.pos += 1;
            }
            if self.pos == start {
                return Err(FStringError::new(start, FStringErrorKind::MissingConversion));
            }
            Some(self.slice(start, self.pos))
        } else {
            None
        };

        let spec = if self.peek(0) == Some(':') {
            self.pos += 1;
            let start = self.pos;
            let parts = self.parse_parts(true, depth)?;
            Some(FormatSpecSource {
                source: self.slice(start, self.pos),
                parts,
            })
        } else {
            None
        };

        if self.peek(0) != Some('}') {
            return Err(unterminated());
        }
        self.pos += 1;

        Ok(ReplacementField {
            expr,
            debug_text,
            conversion,
            spec,
            offset: open,
        })
    }

    /// At a top-level `=`: true when it is not part of a comparison and is
    /// followed (after whitespace) by `}`, `!` or `:`.
    fn is_self_documenting_equals(&self) -> bool {
        if self.peek(1) == Some('=') {
            return false;
        }
        if self.pos > 0 && matches!(self.chars[self.pos - 1], '=' | '!' | '<' | '>') {
            return false;
        }
        let mut ahead = 1;
        while matches!(self.peek(ahead), Some(' ' | '\t' | '\n' | '\r')) {
            ahead += 1;
        }
        matches!(self.peek(ahead), Some('}' | '!' | ':'))
    }

    /// Skip a string literal nested in an expression; `None` if it does not
    /// close before the end of the body.
    fn skip_nested_string(&mut self, quote: char) -> Option<()> {
        let triple = self.peek(1) == Some(quote) && self.peek(2) == Some(quote);
        if triple {
            self.pos += 3;
            while self.pos + 2 < self.end {
                if self.peek(0) == Some(quote)
                    && self.peek(1) == Some(quote)
                    && self.peek(2) == Some(quote)
                {
                    self.pos += 3;
                    return Some(());
                }
                self.pos += 1;
            }
            return None;
        }
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            self.pos += 1;
            if c == quote {
                return Some(());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests;
