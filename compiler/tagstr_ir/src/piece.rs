//! Decomposed pieces of an interpolated literal.
//!
//! A tagged literal becomes an ordered list of pieces: static text and
//! interpolation descriptors. Order is source order; the runtime evaluates
//! descriptors in the sequence they appear here.

use std::fmt;

/// One element of a decomposed interpolated literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Piece {
    /// Decoded static text.
    Text(String),
    /// A `{expr!conv:spec}` replacement field.
    Interpolation(Interpolation),
}

impl Piece {
    pub fn text(s: impl Into<String>) -> Self {
        Piece::Text(s.into())
    }

    pub fn is_interpolation(&self) -> bool {
        matches!(self, Piece::Interpolation(_))
    }
}

/// Descriptor of one replacement field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interpolation {
    /// Normalized source text of the expression.
    pub expr_text: String,
    pub conversion: Option<Conversion>,
    pub format_spec: Option<FormatSpecText>,
}

impl Interpolation {
    pub fn new(expr_text: impl Into<String>) -> Self {
        Interpolation {
            expr_text: expr_text.into(),
            conversion: None,
            format_spec: None,
        }
    }

    #[must_use]
    pub fn with_conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = Some(conversion);
        self
    }

    #[must_use]
    pub fn with_spec(mut self, spec: FormatSpecText) -> Self {
        self.format_spec = Some(spec);
        self
    }
}

/// Conversion marker after `!` in a replacement field.
///
/// Unrecognised markers are carried through so the runtime can reject them
/// when the descriptor is evaluated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// `!r`
    Repr,
    /// `!s`
    Str,
    /// `!a`
    Ascii,
    /// Any other marker, verbatim.
    Other(String),
}

impl Conversion {
    pub fn from_marker(marker: &str) -> Self {
        match marker {
            "r" => Conversion::Repr,
            "s" => Conversion::Str,
            "a" => Conversion::Ascii,
            other => Conversion::Other(other.to_owned()),
        }
    }

    pub fn marker(&self) -> &str {
        match self {
            Conversion::Repr => "r",
            Conversion::Str => "s",
            Conversion::Ascii => "a",
            Conversion::Other(s) => s,
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

/// Format spec of a replacement field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormatSpecText {
    /// Static spec text such as `>10.2f`.
    Plain(String),
    /// A spec with nested fields such as `>{width}`, kept as an f-string
    /// literal (`f'>{width}'`) so the host evaluates it at the call site.
    Nested(String),
}
