//! Runtime failures. These are ordinary values returned to the tag
//! function's caller.

use tagstr_ir::pyrepr::repr_str;
use tagstr_lexer::EscapeError;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A thunk whose conversion is not `r`, `s`, `a` or absent.
    #[error("Bad conversion: {}", repr_str(.marker))]
    BadConversion { marker: String },
    /// Neither a string nor a well-formed thunk.
    #[error("Cannot format {repr} - expected a thunk or a string")]
    NotFormattable { repr: String },
    /// The format spec is malformed or does not apply to the value.
    #[error("{message}")]
    InvalidFormatSpec { spec: String, message: String },
    /// `tag @ f"..."` reached the runtime unrewritten.
    #[error(
        "Usages of `tag @ f'string'` must be transpiled - is there an \
         `import tagstr` statement placed at the top of your file?"
    )]
    NotTransformed,
    /// A text piece holds a malformed escape sequence.
    #[error("cannot decode {}: {source}", repr_str(.text))]
    Decode {
        text: String,
        #[source]
        source: EscapeError,
    },
}

impl RuntimeError {
    pub(crate) fn invalid_spec(spec: &str, message: impl Into<String>) -> Self {
        RuntimeError::InvalidFormatSpec {
            spec: spec.to_owned(),
            message: message.into(),
        }
    }
}
