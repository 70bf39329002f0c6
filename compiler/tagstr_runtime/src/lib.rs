//! Runtime support for rewritten tag calls.
//!
//! A rewritten `tag @ f"..."` calls `tag` with static text and thunks, each
//! thunk a 4-tuple `(getvalue, expr_text, conv, spec)`. This crate models
//! those arguments as [`Value`]s and provides what a tag function needs to
//! interpret them:
//!
//! - [`format_value`]: render a text piece or a thunk the way an f-string
//!   would
//! - [`decode_raw`]: decode backslash escapes in text pieces
//! - [`TagFunc`]: a tag callable that rejects un-rewritten `@` usage

mod error;
mod format;
mod tag;
mod value;

pub use error::RuntimeError;
pub use format::{format_spec, format_value, render};
pub use tag::{decode_raw, Arg, TagFunc, Thunk};
pub use value::{float_repr, Producer, Value};
