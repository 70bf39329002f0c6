//! tagstr IR - shared data types for the tagged f-string rewriter.
//!
//! This crate contains the leaf data structures every other tagstr crate
//! speaks in:
//! - `Position` for row/column locations (rows 1-based, columns 0-based chars)
//! - `Token` and `TokenKind` mirroring the host tokenizer's classes
//! - `Piece` and `Conversion` for decomposed interpolated literals
//! - The format-spec mini-language parser consumed by the runtime
//! - Python-compatible string quoting (`repr`/`ascii`)
//!
//! # Design Philosophy
//!
//! - **Positions are data**: tokens carry absolute positions, and every later
//!   stage (re-emitter, serializer) works purely from them.
//! - **Origins are explicit**: a token records whether it was lexed, shifted
//!   or synthesized so layout can treat each case precisely.

pub mod format_spec;
mod piece;
mod position;
pub mod pyrepr;
mod token;

pub use piece::{Conversion, FormatSpecText, Interpolation, Piece};
pub use position::Position;
pub use token::{string_prefix, Origin, Token, TokenKind};
