//! The tagstr rewrite engine.
//!
//! Turns every `tag @ f"..."` in Python source into an ordinary call
//!
//! ```text
//! tag ( 'text',(lambda:(expr),'expr',conv,spec), )
//! ```
//!
//! working purely on tokens. The pipeline:
//!
//! 1. [`activation`] decides whether a file opts in at all
//! 2. [`cursor`] buffers the token stream with rewind
//! 3. [`matcher`] recognizes `NAME @ f"..."`, optionally parenthesized
//! 4. [`decompose`] splits the literal into pieces, [`lower`] turns them
//!    into call-argument tokens
//! 5. [`reemit`] keeps every line where it was, shifting tokens that the
//!    longer call would overlap
//! 6. [`serialize`] renders the tokens back to text
//!
//! Line numbers of all code outside a rewritten expression are preserved,
//! so tracebacks point at the original lines.

pub mod activation;
pub mod cursor;
pub mod decompose;
mod error;
pub mod lower;
pub mod matcher;
pub mod reemit;
pub mod serialize;
mod transform;

pub use activation::{should_transform, should_transform_file, ActivationConfig};
pub use error::TransformError;
pub use transform::{
    find_tag_sites, rewrite_tokens, transform, transform_file, transform_str, TagSiteReport,
};
