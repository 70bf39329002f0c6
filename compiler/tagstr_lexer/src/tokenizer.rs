//! Streaming Python tokenizer.
//!
//! Pulls one physical line at a time from a [`BufRead`] and yields tokens
//! with the same classes, texts and positions as the host's
//! `tokenize.generate_tokens`:
//!
//! - `INDENT`/`DEDENT` at statement starts; blank and comment-only lines
//!   produce `COMMENT`? + `NL` and never change indentation
//! - line breaks inside `()`, `[]`, `{}` are `NL`, at depth 0 `NEWLINE`
//! - `\` + line break joins lines without a token
//! - triple-quoted strings and backslash-continued strings span lines; the
//!   token's `line` then holds every physical line it covers
//! - a missing final line break yields an empty `NEWLINE`, then the open
//!   indents are closed and `ENDMARKER` ends the stream
//!
//! Columns are character offsets within the physical line.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::Arc;

use tagstr_ir::{Position, Token, TokenKind};

use crate::operators::match_operator;
use crate::TokenizeError;

const TAB_SIZE: usize = 8;

#[allow(
    clippy::cast_possible_truncation,
    reason = "columns are bounded by line length, far below u32::MAX"
)]
#[inline]
fn col(i: usize) -> u32 {
    i as u32
}

/// Quote style of a string literal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Quote {
    ch: char,
    triple: bool,
}

impl Quote {
    fn len(self) -> usize {
        if self.triple {
            3
        } else {
            1
        }
    }
}

/// A string literal still open at the end of a physical line.
#[derive(Debug)]
struct OpenString {
    start: Position,
    text: String,
    lines: String,
    quote: Quote,
    /// Single-quoted strings only continue past a trailing backslash.
    needs_continuation: bool,
}

/// Iterator of tokens over a line reader.
pub struct Tokenizer<R> {
    reader: R,
    row: u32,
    paren_depth: u32,
    continued: bool,
    indents: Vec<usize>,
    open_string: Option<OpenString>,
    prev_line: String,
    pending: VecDeque<Token>,
    finished: bool,
}

impl<R: BufRead> Tokenizer<R> {
    pub fn new(reader: R) -> Self {
        Tokenizer {
            reader,
            row: 0,
            paren_depth: 0,
            continued: false,
            indents: vec![0],
            open_string: None,
            prev_line: String::new(),
            pending: VecDeque::new(),
            finished: false,
        }
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>, start: usize, end: usize, line: &Arc<str>) {
        self.pending.push_back(Token::new(
            kind,
            text,
            Position::new(self.row, col(start)),
            Position::new(self.row, col(end)),
            Arc::clone(line),
        ));
    }

    /// Read and tokenize the next physical line into `pending`.
    fn advance_line(&mut self) -> Result<(), TokenizeError> {
        let mut raw = String::new();
        self.reader.read_line(&mut raw)?;
        self.row += 1;

        let line: Arc<str> = Arc::from(raw.as_str());
        let chars: Vec<char> = raw.chars().collect();
        let max = chars.len();
        let mut pos = 0;

        if let Some(mut open) = self.open_string.take() {
            if raw.is_empty() {
                return Err(TokenizeError::UnterminatedString { start: open.start });
            }
            if let Some(end) = find_string_end(&chars, 0, open.quote) {
                open.text.extend(&chars[..end]);
                open.lines.push_str(&raw);
                self.pending.push_back(Token::new(
                    TokenKind::String,
                    open.text,
                    open.start,
                    Position::new(self.row, col(end)),
                    Arc::from(open.lines),
                ));
                pos = end;
            } else if open.needs_continuation && !ends_with_continuation(&raw) {
                open.text.push_str(&raw);
                open.lines.push_str(&raw);
                self.pending.push_back(Token::new(
                    TokenKind::ErrorToken,
                    open.text,
                    open.start,
                    Position::new(self.row, col(max)),
                    Arc::from(open.lines),
                ));
                self.prev_line = raw;
                return Ok(());
            } else {
                open.text.push_str(&raw);
                open.lines.push_str(&raw);
                self.open_string = Some(open);
                self.prev_line = raw;
                return Ok(());
            }
        } else if self.paren_depth == 0 && !self.continued {
            if raw.is_empty() {
                self.finish();
                return Ok(());
            }

            let mut column = 0;
            while pos < max {
                match chars[pos] {
                    ' ' => column += 1,
                    '\t' => column = (column / TAB_SIZE + 1) * TAB_SIZE,
                    '\x0c' => column = 0,
                    _ => break,
                }
                pos += 1;
            }
            if pos == max {
                // Whitespace-only final line without a line break.
                self.finish();
                return Ok(());
            }

            if matches!(chars[pos], '#' | '\r' | '\n') {
                if chars[pos] == '#' {
                    let comment: String = chars[pos..]
                        .iter()
                        .take_while(|c| !matches!(c, '\r' | '\n'))
                        .collect();
                    let end = pos + comment.chars().count();
                    self.push(TokenKind::Comment, comment, pos, end, &line);
                    pos = end;
                }
                let rest: String = chars[pos..].iter().collect();
                self.push(TokenKind::Nl, rest, pos, max, &line);
                self.prev_line = raw;
                return Ok(());
            }

            let current = self.indents.last().copied().unwrap_or(0);
            if column > current {
                self.indents.push(column);
                let indent: String = chars[..pos].iter().collect();
                self.push(TokenKind::Indent, indent, 0, pos, &line);
            }
            while column < self.indents.last().copied().unwrap_or(0) {
                if !self.indents.contains(&column) {
                    return Err(TokenizeError::InconsistentDedent { row: self.row });
                }
                self.indents.pop();
                self.push(TokenKind::Dedent, "", pos, pos, &line);
            }
        } else {
            if raw.is_empty() {
                return Err(TokenizeError::UnexpectedEof { row: self.row });
            }
            self.continued = false;
        }

        self.scan_tokens(&chars, pos, &line, &raw);
        self.prev_line = raw;
        Ok(())
    }

    /// Tokenize `chars[pos..]`, the rest of one physical line.
    fn scan_tokens(&mut self, chars: &[char], mut pos: usize, line: &Arc<str>, raw: &str) {
        let max = chars.len();
        while pos < max {
            while pos < max && matches!(chars[pos], ' ' | '\t' | '\x0c') {
                pos += 1;
            }
            if pos == max {
                break;
            }

            let start = pos;
            let c = chars[pos];
            let next = chars.get(pos + 1).copied();

            // Line continuation
            if c == '\\' && is_line_end(&chars[pos + 1..]) {
                self.continued = true;
                break;
            }

            if c == '#' {
                let end = chars[pos..]
                    .iter()
                    .position(|c| matches!(c, '\r' | '\n'))
                    .map_or(max, |n| pos + n);
                let text: String = chars[pos..end].iter().collect();
                self.push(TokenKind::Comment, text, pos, end, line);
                pos = end;
                continue;
            }

            if let Some((prefix_len, quote)) = string_start(chars, pos) {
                let body = pos + prefix_len + quote.len();
                if quote.triple {
                    if let Some(end) = find_string_end(chars, body, quote) {
                        let text: String = chars[pos..end].iter().collect();
                        self.push(TokenKind::String, text, pos, end, line);
                        pos = end;
                        continue;
                    }
                    self.open_string = Some(OpenString {
                        start: Position::new(self.row, col(start)),
                        text: chars[pos..].iter().collect(),
                        lines: raw.to_owned(),
                        quote,
                        needs_continuation: false,
                    });
                    return;
                }
                match scan_single_quoted(chars, body, quote.ch) {
                    SingleQuoted::Closed(end) => {
                        let text: String = chars[pos..end].iter().collect();
                        self.push(TokenKind::String, text, pos, end, line);
                        pos = end;
                        continue;
                    }
                    SingleQuoted::Continued => {
                        self.open_string = Some(OpenString {
                            start: Position::new(self.row, col(start)),
                            text: chars[pos..].iter().collect(),
                            lines: raw.to_owned(),
                            quote,
                            needs_continuation: true,
                        });
                        return;
                    }
                    // Unterminated: the prefix (if any) lexes as a name and
                    // the quote as an error token.
                    SingleQuoted::Unterminated => {}
                }
            }

            if c.is_ascii_digit() || (c == '.' && next.is_some_and(|n| n.is_ascii_digit())) {
                let end = scan_number(chars, pos);
                let text: String = chars[pos..end].iter().collect();
                self.push(TokenKind::Number, text, pos, end, line);
                pos = end;
                continue;
            }

            if c == '\n' || (c == '\r' && next == Some('\n')) {
                let kind = if self.paren_depth > 0 {
                    TokenKind::Nl
                } else {
                    TokenKind::Newline
                };
                let text: String = chars[pos..].iter().collect();
                self.push(kind, text, pos, max, line);
                break;
            }

            let op_len = match_operator(&chars[pos..]);
            if op_len > 0 {
                match c {
                    '(' | '[' | '{' => self.paren_depth += 1,
                    ')' | ']' | '}' => self.paren_depth = self.paren_depth.saturating_sub(1),
                    _ => {}
                }
                let text: String = chars[pos..pos + op_len].iter().collect();
                self.push(TokenKind::Op, text, pos, pos + op_len, line);
                pos += op_len;
                continue;
            }

            if is_identifier_start(c) {
                let end = chars[pos..]
                    .iter()
                    .position(|&c| !is_identifier_continue(c))
                    .map_or(max, |n| pos + n);
                let text: String = chars[pos..end].iter().collect();
                self.push(TokenKind::Name, text, pos, end, line);
                pos = end;
                continue;
            }

            self.push(TokenKind::ErrorToken, c.to_string(), pos, pos + 1, line);
            pos += 1;
        }
    }

    /// Emit the end-of-input tokens.
    fn finish(&mut self) {
        let last = std::mem::take(&mut self.prev_line);
        let empty: Arc<str> = Arc::from("");
        if !last.is_empty()
            && !last.ends_with(['\r', '\n'])
            && !last.trim_start().starts_with('#')
        {
            let len = col(last.chars().count());
            let row = self.row - 1;
            self.pending.push_back(Token::new(
                TokenKind::Newline,
                "",
                Position::new(row, len),
                Position::new(row, len + 1),
                Arc::clone(&empty),
            ));
        }
        for _ in 1..self.indents.len() {
            self.push(TokenKind::Dedent, "", 0, 0, &empty);
        }
        self.indents.truncate(1);
        self.push(TokenKind::EndMarker, "", 0, 0, &empty);
        self.finished = true;
        tracing::trace!(rows = self.row, "tokenizer reached end of input");
    }
}

impl<R: BufRead> Iterator for Tokenizer<R> {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            if self.finished {
                return None;
            }
            if let Err(err) = self.advance_line() {
                self.finished = true;
                self.pending.clear();
                return Some(Err(err));
            }
        }
    }
}

/// Tokenize an in-memory source string.
pub fn tokenize_str(source: &str) -> Result<Vec<Token>, TokenizeError> {
    Tokenizer::new(source.as_bytes()).collect()
}

// ─── Character classes ───

fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_identifier_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn is_line_end(rest: &[char]) -> bool {
    matches!(rest, ['\n', ..] | ['\r', '\n', ..])
}

fn ends_with_continuation(line: &str) -> bool {
    line.ends_with("\\\n") || line.ends_with("\\\r\n")
}

/// Valid string prefixes, compared case-insensitively.
const STRING_PREFIXES: &[&str] = &["", "r", "u", "b", "f", "br", "rb", "fr", "rf"];

/// Detect a string literal starting at `pos`: prefix length and quote.
fn string_start(chars: &[char], pos: usize) -> Option<(usize, Quote)> {
    let prefix_len = chars[pos..]
        .iter()
        .take(3)
        .take_while(|c| c.is_ascii_alphabetic())
        .count();
    if prefix_len > 2 {
        return None;
    }
    let prefix: String = chars[pos..pos + prefix_len]
        .iter()
        .map(char::to_ascii_lowercase)
        .collect();
    if !STRING_PREFIXES.contains(&prefix.as_str()) {
        return None;
    }
    let q = pos + prefix_len;
    let ch = *chars.get(q)?;
    if ch != '\'' && ch != '"' {
        return None;
    }
    let triple = chars.get(q + 1) == Some(&ch) && chars.get(q + 2) == Some(&ch);
    Some((prefix_len, Quote { ch, triple }))
}

/// Index just past the closing quote, scanning from `from`; escapes skip
/// the following character.
fn find_string_end(chars: &[char], from: usize, quote: Quote) -> Option<usize> {
    let mut i = from;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote.ch => {
                if !quote.triple {
                    return Some(i + 1);
                }
                if chars.get(i + 1) == Some(&c) && chars.get(i + 2) == Some(&c) {
                    return Some(i + 3);
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
    None
}

enum SingleQuoted {
    Closed(usize),
    Continued,
    Unterminated,
}

fn scan_single_quoted(chars: &[char], from: usize, quote: char) -> SingleQuoted {
    let mut i = from;
    while i < chars.len() {
        match chars[i] {
            '\\' if is_line_end(&chars[i + 1..]) => return SingleQuoted::Continued,
            '\\' => i += 2,
            '\n' => return SingleQuoted::Unterminated,
            '\r' if chars.get(i + 1) == Some(&'\n') => return SingleQuoted::Unterminated,
            c if c == quote => return SingleQuoted::Closed(i + 1),
            _ => i += 1,
        }
    }
    SingleQuoted::Unterminated
}

/// Index just past a numeric literal starting at `start`.
fn scan_number(chars: &[char], start: usize) -> usize {
    let at = |i: usize| chars.get(i).copied().unwrap_or('\0');

    if at(start) == '0' {
        let radix = match at(start + 1) {
            'x' | 'X' => Some(16),
            'o' | 'O' => Some(8),
            'b' | 'B' => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            let end = scan_digits(chars, start + 2, radix);
            return if end > start + 2 { end } else { start + 1 };
        }
    }

    let mut i = scan_digits(chars, start, 10);
    if at(i) == '.' {
        i = scan_digits(chars, i + 1, 10);
    }
    if matches!(at(i), 'e' | 'E') {
        let mut j = i + 1;
        if matches!(at(j), '+' | '-') {
            j += 1;
        }
        if at(j).is_ascii_digit() {
            i = scan_digits(chars, j, 10);
        }
    }
    if matches!(at(i), 'j' | 'J') {
        i += 1;
    }
    i
}

/// Digits of `radix` with single underscores between them.
fn scan_digits(chars: &[char], start: usize, radix: u32) -> usize {
    let mut i = start;
    loop {
        match chars.get(i) {
            Some(c) if c.is_digit(radix) => i += 1,
            Some('_') if i > start && chars.get(i + 1).is_some_and(|c| c.is_digit(radix)) => i += 1,
            Some('_') if i == start && radix != 10 && chars.get(i + 1).is_some_and(|c| c.is_digit(radix)) => {
                i += 1;
            }
            _ => return i,
        }
    }
}
