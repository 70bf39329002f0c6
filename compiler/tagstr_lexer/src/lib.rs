//! Python lexing for tagstr.
//!
//! Two layers:
//! - [`Tokenizer`]: a streaming tokenizer that matches the host's token
//!   classes and positions, pulling one physical line at a time
//! - [`fstring::parse_fstring`]: splits the text of an f-string token into
//!   literal segments and replacement fields
//!
//! Escape decoding for literal text lives in [`unescape`].

mod escape;
pub mod fstring;
mod operators;
mod tokenize_error;
mod tokenizer;

pub use escape::{unescape, EscapeError, EscapeErrorKind};
pub use operators::is_operator;
pub use tokenize_error::TokenizeError;
pub use tokenizer::{tokenize_str, Tokenizer};
