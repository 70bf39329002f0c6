//! Values handed to tag functions, with Python's `repr`/`str`/`ascii`.

use std::fmt;
use std::rc::Rc;

use tagstr_ir::pyrepr::{escape_non_ascii, repr_str};

/// A zero-argument producer, the `lambda:(expr)` of a thunk.
pub type Producer = Rc<dyn Fn() -> Value>;

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    Callable(Producer),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn callable(f: impl Fn() -> Value + 'static) -> Self {
        Value::Callable(Rc::new(f))
    }

    /// Python type name, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Tuple(_) => "tuple",
            Value::Callable(_) => "function",
        }
    }

    /// `repr(value)`.
    pub fn repr(&self) -> String {
        match self {
            Value::None => "None".to_owned(),
            Value::Bool(true) => "True".to_owned(),
            Value::Bool(false) => "False".to_owned(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => float_repr(*f),
            Value::Str(s) => repr_str(s),
            Value::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(Value::repr).collect();
                if inner.len() == 1 {
                    format!("({},)", inner[0])
                } else {
                    format!("({})", inner.join(", "))
                }
            }
            Value::Callable(_) => "<function <lambda>>".to_owned(),
        }
    }

    /// `str(value)`.
    pub fn to_str(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            other => other.repr(),
        }
    }

    /// `ascii(value)`: the repr with non-ASCII characters escaped.
    pub fn ascii(&self) -> String {
        escape_non_ascii(&self.repr())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// `repr(float)`: the shortest round-tripping digits, in positional
/// notation for exponents -4..16 and scientific notation otherwise.
pub fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_owned();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0.0" } else { "0.0" }.to_owned();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. `-1.2345e-5`.
    let sci = format!("{:e}", f.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return f.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return f.to_string();
    };
    let digits: String = mantissa.chars().filter(|&c| c != '.').collect();
    let sign = if f < 0.0 { "-" } else { "" };

    if (-4..16).contains(&exp) {
        let body = match usize::try_from(exp) {
            Ok(exp) => {
                let point = exp + 1;
                if digits.len() <= point {
                    format!("{digits}{}.0", "0".repeat(point - digits.len()))
                } else {
                    format!("{}.{}", &digits[..point], &digits[point..])
                }
            }
            Err(_) => {
                let zeros = usize::try_from(-exp - 1).unwrap_or(0);
                format!("0.{}{digits}", "0".repeat(zeros))
            }
        };
        format!("{sign}{body}")
    } else {
        let (first, rest) = digits.split_at(1);
        let mantissa = if rest.is_empty() {
            first.to_owned()
        } else {
            format!("{first}.{rest}")
        };
        format!("{sign}{mantissa}{}", exponent_suffix('e', exp))
    }
}

/// `e+05` style exponent: explicit sign, at least two digits.
pub(crate) fn exponent_suffix(marker: char, exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{marker}{sign}{:02}", exp.unsigned_abs())
}

#[cfg(test)]
mod tests;
