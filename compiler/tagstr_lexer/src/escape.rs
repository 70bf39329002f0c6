//! Backslash escape decoding for Python string literals.
//!
//! Decodes the escapes of a non-raw string literal body: `\\` `\'` `\"`
//! `\a` `\b` `\f` `\n` `\r` `\t` `\v`, octal `\ooo`, hex `\xhh`, `\uXXXX`,
//! `\UXXXXXXXX`, named `\N{...}`, and backslash-newline continuation.
//! Unknown escapes are kept verbatim, as the host does.

use thiserror::Error;

/// Why an escape sequence could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EscapeErrorKind {
    /// `\x`, `\u` or `\U` followed by too few hex digits.
    #[error("truncated \\{escape} escape")]
    Truncated { escape: char },
    /// A code point that is not a Unicode scalar value.
    #[error("illegal Unicode character")]
    InvalidCodePoint,
    /// `\N` without a `{name}` after it.
    #[error("malformed \\N character escape")]
    MalformedName,
    /// `\N{name}` naming no Unicode character.
    #[error("unknown Unicode character name '{name}'")]
    UnknownName { name: String },
    /// A lone backslash at the end of the text.
    #[error("\\ at end of string")]
    TrailingBackslash,
}

/// An escape decoding failure at a character offset into the decoded text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct EscapeError {
    pub offset: usize,
    pub kind: EscapeErrorKind,
}

impl EscapeError {
    fn new(offset: usize, kind: EscapeErrorKind) -> Self {
        EscapeError { offset, kind }
    }
}

/// Resolve a single-character escape (`\n` → newline).
#[inline]
fn resolve_simple_escape(c: char) -> Option<char> {
    match c {
        '\\' => Some('\\'),
        '\'' => Some('\''),
        '"' => Some('"'),
        'a' => Some('\u{7}'),
        'b' => Some('\u{8}'),
        'f' => Some('\u{c}'),
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        'v' => Some('\u{b}'),
        _ => None,
    }
}

/// Decode the backslash escapes in `content`.
///
/// Fast path: text without backslashes is returned unchanged.
pub fn unescape(content: &str) -> Result<String, EscapeError> {
    if !content.contains('\\') {
        return Ok(content.to_owned());
    }

    let chars: Vec<char> = content.chars().collect();
    let mut result = String::with_capacity(content.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c != '\\' {
            result.push(c);
            i += 1;
            continue;
        }

        let Some(&esc) = chars.get(i + 1) else {
            return Err(EscapeError::new(i, EscapeErrorKind::TrailingBackslash));
        };

        if let Some(resolved) = resolve_simple_escape(esc) {
            result.push(resolved);
            i += 2;
            continue;
        }

        match esc {
            '\n' => i += 2,
            '\r' => {
                i += 2;
                if chars.get(i) == Some(&'\n') {
                    i += 1;
                }
            }
            '0'..='7' => {
                let digits = chars[i + 1..]
                    .iter()
                    .take(3)
                    .take_while(|c| matches!(c, '0'..='7'))
                    .count();
                let value = hex_or_octal_value(&chars[i + 1..i + 1 + digits], 8);
                result.push(code_point(value, i)?);
                i += 1 + digits;
            }
            'x' | 'u' | 'U' => {
                let want = match esc {
                    'x' => 2,
                    'u' => 4,
                    _ => 8,
                };
                let start = i + 2;
                let end = start + want;
                if end > chars.len() || !chars[start..end].iter().all(char::is_ascii_hexdigit) {
                    return Err(EscapeError::new(
                        i,
                        EscapeErrorKind::Truncated { escape: esc },
                    ));
                }
                let value = hex_or_octal_value(&chars[start..end], 16);
                result.push(code_point(value, i)?);
                i = end;
            }
            'N' => {
                let (resolved, next) = named_escape(&chars, i)?;
                result.push(resolved);
                i = next;
            }
            other => {
                result.push('\\');
                result.push(other);
                i += 2;
            }
        }
    }

    Ok(result)
}

/// Resolve `\N{name}` starting at the backslash at `start`. Returns the
/// character and the index after the closing brace.
fn named_escape(chars: &[char], start: usize) -> Result<(char, usize), EscapeError> {
    let malformed = || EscapeError::new(start, EscapeErrorKind::MalformedName);
    if chars.get(start + 2) != Some(&'{') {
        return Err(malformed());
    }
    let open = start + 3;
    let close = chars[open..]
        .iter()
        .position(|&c| c == '}')
        .map(|len| open + len)
        .ok_or_else(malformed)?;
    if close == open {
        return Err(malformed());
    }
    let name: String = chars[open..close].iter().collect();
    let resolved = unicode_names2::character(&name.to_ascii_uppercase()).ok_or_else(|| {
        EscapeError::new(start, EscapeErrorKind::UnknownName { name: name.clone() })
    })?;
    Ok((resolved, close + 1))
}

fn hex_or_octal_value(digits: &[char], radix: u32) -> u32 {
    digits
        .iter()
        .filter_map(|c| c.to_digit(radix))
        .fold(0u32, |acc, d| acc.saturating_mul(radix).saturating_add(d))
}

fn code_point(value: u32, offset: usize) -> Result<char, EscapeError> {
    char::from_u32(value).ok_or_else(|| EscapeError::new(offset, EscapeErrorKind::InvalidCodePoint))
}
