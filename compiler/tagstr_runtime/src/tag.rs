//! Tag functions and the arguments they receive.

use std::fmt;

use tagstr_lexer::unescape;

use crate::value::Producer;
use crate::{RuntimeError, Value};

/// Borrowed view of a thunk, the 4-tuple
/// `(getvalue, expr_text, conversion, format_spec)`.
pub struct Thunk<'a> {
    pub getvalue: &'a Producer,
    pub expr_text: &'a str,
    pub conversion: Option<&'a str>,
    pub format_spec: Option<&'a str>,
}

impl fmt::Debug for Thunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thunk")
            .field("expr_text", &self.expr_text)
            .field("conversion", &self.conversion)
            .field("format_spec", &self.format_spec)
            .finish_non_exhaustive()
    }
}

impl<'a> Thunk<'a> {
    /// Build the tuple form of a thunk.
    pub fn pack(
        getvalue: impl Fn() -> Value + 'static,
        expr_text: &str,
        conversion: Option<&str>,
        format_spec: Option<&str>,
    ) -> Value {
        let optional = |s: Option<&str>| s.map_or(Value::None, Value::str);
        Value::Tuple(vec![
            Value::callable(getvalue),
            Value::str(expr_text),
            optional(conversion),
            optional(format_spec),
        ])
    }

    /// `None` unless `value` is a well-formed thunk tuple.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let Value::Tuple(items) = value else {
            return None;
        };
        let [Value::Callable(getvalue), Value::Str(expr_text), conversion, format_spec] = items.as_slice() else {
            return None;
        };
        Some(Thunk {
            getvalue,
            expr_text,
            conversion: optional_str(conversion)?,
            format_spec: optional_str(format_spec)?,
        })
    }
}

/// `Some(None)` for `None`, `Some(Some(s))` for a string.
fn optional_str(value: &Value) -> Option<Option<&str>> {
    match value {
        Value::None => Some(None),
        Value::Str(s) => Some(Some(s.as_str())),
        _ => None,
    }
}

/// One argument of a rewritten tag call.
#[derive(Debug)]
pub enum Arg<'a> {
    Text(&'a str),
    Thunk(Thunk<'a>),
}

impl<'a> Arg<'a> {
    pub fn from_value(value: &'a Value) -> Result<Self, RuntimeError> {
        if let Value::Str(text) = value {
            return Ok(Arg::Text(text));
        }
        Thunk::from_value(value)
            .map(Arg::Thunk)
            .ok_or_else(|| RuntimeError::NotFormattable { repr: value.repr() })
    }
}

/// Decode backslash escapes in text arguments; thunks pass through.
///
/// For tags that want to see literal text as written in a raw string.
pub fn decode_raw(args: &[Value]) -> Result<Vec<Value>, RuntimeError> {
    args.iter()
        .map(|arg| match arg {
            Value::Str(text) => unescape(text)
                .map(Value::Str)
                .map_err(|source| RuntimeError::Decode {
                    text: text.clone(),
                    source,
                }),
            other => Ok(other.clone()),
        })
        .collect()
}

/// A tag function.
///
/// Calling it forwards the arguments of a rewritten call. Applying it with
/// `@` to an f-string means the file was never rewritten, which
/// [`matmul`](Self::matmul) reports.
pub struct TagFunc<T> {
    func: Box<dyn Fn(&[Value]) -> T>,
}

impl<T> TagFunc<T> {
    pub fn new(func: impl Fn(&[Value]) -> T + 'static) -> Self {
        TagFunc {
            func: Box::new(func),
        }
    }

    pub fn call(&self, args: &[Value]) -> T {
        (self.func)(args)
    }

    /// `tag @ value`: always [`RuntimeError::NotTransformed`].
    pub fn matmul(&self, other: &Value) -> Result<T, RuntimeError> {
        tracing::warn!(operand = %other.repr(), "tag applied with @ at runtime");
        Err(RuntimeError::NotTransformed)
    }
}

impl<T> fmt::Debug for TagFunc<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagFunc").finish_non_exhaustive()
    }
}
