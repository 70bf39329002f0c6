//! Activation policy: which files get rewritten.
//!
//! A file opts in near its top, before any code, with either
//!
//! ```python
//! # tagstr: on
//! ```
//!
//! or an `import tagstr` statement. Comment lines and string literals
//! (docstrings) may precede the marker; the first other line ends the scan.

use std::ffi::OsStr;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tagstr_ir::{Token, TokenKind};
use tagstr_lexer::Tokenizer;

#[allow(clippy::expect_used, reason = "pattern is a literal checked by tests")]
static MARKER_COMMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*#\s+(?P<module>[\w.]+)\s*:\s*(?P<value>[\w-]+).*$")
        .expect("marker comment pattern compiles")
});

#[allow(clippy::expect_used, reason = "pattern is a literal checked by tests")]
static CODING_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[ \t\x0c]*#.*?coding[:=][ \t]*(?P<encoding>[-\w.]+)")
        .expect("coding declaration pattern compiles")
});

/// Settings for the activation scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActivationConfig {
    /// Module name used in the marker comment and the import.
    pub module: String,
}

impl Default for ActivationConfig {
    fn default() -> Self {
        ActivationConfig {
            module: "tagstr".to_owned(),
        }
    }
}

impl ActivationConfig {
    pub fn new(module: impl Into<String>) -> Self {
        ActivationConfig {
            module: module.into(),
        }
    }

    /// True when `source` opts in to rewriting.
    pub fn should_transform(&self, source: &str) -> bool {
        for line in token_lines(source) {
            if self.is_marker_comment(&line) || self.is_module_import(&line) {
                return true;
            }
            if matches!(line[0].kind, TokenKind::Comment | TokenKind::String) {
                continue;
            }
            break;
        }
        false
    }

    /// [`should_transform`](Self::should_transform) for a file on disk.
    ///
    /// The file must exist, have a `.py` extension and be UTF-8: a byte
    /// order mark is accepted, a `coding:` declaration naming another
    /// encoding is not.
    pub fn should_transform_file(&self, path: &Path) -> bool {
        if path.extension() != Some(OsStr::new("py")) || !path.is_file() {
            return false;
        }
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "unreadable source");
                return false;
            }
        };
        let bytes = bytes.strip_prefix(b"\xef\xbb\xbf").unwrap_or(&bytes);
        let Ok(source) = std::str::from_utf8(bytes) else {
            tracing::debug!(path = %path.display(), "source is not UTF-8");
            return false;
        };
        if !declares_utf8(source) {
            tracing::debug!(path = %path.display(), "source declares a non-UTF-8 encoding");
            return false;
        }
        self.should_transform(source)
    }

    fn is_marker_comment(&self, line: &[Token]) -> bool {
        let [comment] = line else {
            return false;
        };
        if comment.kind != TokenKind::Comment {
            return false;
        }
        MARKER_COMMENT.captures(&comment.text).is_some_and(|caps| {
            &caps["module"] == self.module && caps["value"].eq_ignore_ascii_case("on")
        })
    }

    fn is_module_import(&self, line: &[Token]) -> bool {
        let Some((first, rest)) = line.split_first() else {
            return false;
        };
        if !(first.is_name() && first.text == "import") {
            return false;
        }
        let dotted: String = rest
            .iter()
            .take_while(|t| t.is_name() || t.is_op("."))
            .map(|t| t.text.as_str())
            .collect();
        dotted == self.module
            || dotted
                .strip_prefix(self.module.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

/// [`ActivationConfig::should_transform`] with the default module name.
pub fn should_transform(source: &str) -> bool {
    ActivationConfig::default().should_transform(source)
}

/// [`ActivationConfig::should_transform_file`] with the default module name.
pub fn should_transform_file(path: &Path) -> bool {
    ActivationConfig::default().should_transform_file(path)
}

/// Tokens grouped by line, line breaks and layout tokens dropped.
///
/// Lines end at `Newline` and `Nl`; a final line without a break is still
/// yielded. Tokenizer errors end the stream.
fn token_lines(source: &str) -> impl Iterator<Item = Vec<Token>> + '_ {
    let mut tokens = Tokenizer::new(source.as_bytes()).map_while(Result::ok);
    std::iter::from_fn(move || {
        let mut line = Vec::new();
        loop {
            let Some(token) = tokens.next() else {
                return (!line.is_empty()).then_some(line);
            };
            match token.kind {
                TokenKind::Newline | TokenKind::Nl if !line.is_empty() => return Some(line),
                TokenKind::Newline
                | TokenKind::Nl
                | TokenKind::Indent
                | TokenKind::Dedent
                | TokenKind::EndMarker => {}
                _ => line.push(token),
            }
        }
    })
}

/// False when one of the first two lines declares a non-UTF-8 encoding.
fn declares_utf8(source: &str) -> bool {
    for (i, line) in source.lines().take(2).enumerate() {
        if let Some(caps) = CODING_DECLARATION.captures(line) {
            let name = caps["encoding"].to_ascii_lowercase().replace('_', "-");
            return name == "utf-8" || name == "utf8" || name.starts_with("utf-8-");
        }
        let trimmed = line.trim_start();
        // The second line only counts after a blank or comment first line.
        if i == 0 && !(trimmed.is_empty() || trimmed.starts_with('#')) {
            break;
        }
    }
    true
}

#[cfg(test)]
mod tests;
