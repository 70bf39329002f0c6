//! Format specification parser for interpolation descriptors.
//!
//! Parses Python's format-spec mini-language
//! `[[fill]align][sign][z][#][0][width][grouping][.precision][type]`
//! as used after the `:` of a replacement field (`{value:>10.2f}`).
//!
//! The parsed result ([`ParsedFormatSpec`]) is consumed by the runtime's
//! `format_value`, which applies it to the evaluated value.

use thiserror::Error;

/// Parsed format specification.
///
/// All fields are `Option` or `false` by default; an empty spec produces
/// [`ParsedFormatSpec::EMPTY`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParsedFormatSpec {
    /// Padding character (default: space).
    pub fill: Option<char>,
    /// Alignment direction.
    pub align: Option<Align>,
    /// Sign display for numbers.
    pub sign: Option<Sign>,
    /// `z`: coerce negative zero to positive zero.
    pub no_neg_zero: bool,
    /// Alternate form (`#`).
    pub alternate: bool,
    /// Zero-pad (`0`): pads numbers with zeros after the sign.
    pub zero_pad: bool,
    /// Minimum field width.
    pub width: Option<usize>,
    /// Thousands separator.
    pub grouping: Option<Grouping>,
    /// Decimal places (floats) or max length (strings).
    pub precision: Option<usize>,
    /// Presentation type.
    pub format_type: Option<FormatType>,
}

impl ParsedFormatSpec {
    /// An empty spec with no formatting options set.
    pub const EMPTY: Self = Self {
        fill: None,
        align: None,
        sign: None,
        no_neg_zero: false,
        alternate: false,
        zero_pad: false,
        width: None,
        grouping: None,
        precision: None,
        format_type: None,
    };

    /// True when the spec uses an option that only applies to numbers.
    pub fn is_numeric_only(&self) -> bool {
        self.sign.is_some()
            || self.no_neg_zero
            || self.alternate
            || self.grouping.is_some()
            || self.align == Some(Align::AfterSign)
    }
}

/// Alignment direction for field padding.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Align {
    /// `<`: pad on the right.
    Left,
    /// `^`: pad equally on both sides.
    Center,
    /// `>`: pad on the left.
    Right,
    /// `=`: pad between sign and digits (numbers only).
    AfterSign,
}

/// Sign display mode for numeric values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    /// `+`: always show sign.
    Plus,
    /// `-`: show sign only for negatives (default numeric behavior).
    Minus,
    /// ` `: space for positive, `-` for negative.
    Space,
}

/// Thousands separator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Grouping {
    /// `,`
    Comma,
    /// `_`
    Underscore,
}

impl Grouping {
    pub fn separator(self) -> char {
        match self {
            Grouping::Comma => ',',
            Grouping::Underscore => '_',
        }
    }
}

/// Presentation type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FormatType {
    /// `s`: string.
    Str,
    /// `b`: binary integer.
    Binary,
    /// `c`: integer as a character.
    Char,
    /// `d`: decimal integer.
    Decimal,
    /// `o`: octal integer.
    Octal,
    /// `x`: lowercase hexadecimal.
    Hex,
    /// `X`: uppercase hexadecimal.
    HexUpper,
    /// `n`: locale-aware number (formatted as `d`/`g`).
    Number,
    /// `e`: lowercase scientific notation.
    Exp,
    /// `E`: uppercase scientific notation.
    ExpUpper,
    /// `f`: fixed-point decimal.
    Fixed,
    /// `F`: fixed-point, uppercase `INF`/`NAN`.
    FixedUpper,
    /// `g`: general format.
    General,
    /// `G`: general format, uppercase.
    GeneralUpper,
    /// `%`: percentage (multiply by 100, append `%`).
    Percent,
}

impl FormatType {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            's' => Self::Str,
            'b' => Self::Binary,
            'c' => Self::Char,
            'd' => Self::Decimal,
            'o' => Self::Octal,
            'x' => Self::Hex,
            'X' => Self::HexUpper,
            'n' => Self::Number,
            'e' => Self::Exp,
            'E' => Self::ExpUpper,
            'f' => Self::Fixed,
            'F' => Self::FixedUpper,
            'g' => Self::General,
            'G' => Self::GeneralUpper,
            '%' => Self::Percent,
            _ => return None,
        })
    }

    /// The presentation character, as written in a spec.
    pub fn as_char(self) -> char {
        match self {
            Self::Str => 's',
            Self::Binary => 'b',
            Self::Char => 'c',
            Self::Decimal => 'd',
            Self::Octal => 'o',
            Self::Hex => 'x',
            Self::HexUpper => 'X',
            Self::Number => 'n',
            Self::Exp => 'e',
            Self::ExpUpper => 'E',
            Self::Fixed => 'f',
            Self::FixedUpper => 'F',
            Self::General => 'g',
            Self::GeneralUpper => 'G',
            Self::Percent => '%',
        }
    }

    /// Returns `true` if this format type is only valid for integer values.
    pub fn is_integer_only(self) -> bool {
        matches!(
            self,
            Self::Binary | Self::Char | Self::Decimal | Self::Octal | Self::Hex | Self::HexUpper
        )
    }

    /// Returns `true` for the floating-point presentation types.
    pub fn is_float(self) -> bool {
        matches!(
            self,
            Self::Exp
                | Self::ExpUpper
                | Self::Fixed
                | Self::FixedUpper
                | Self::General
                | Self::GeneralUpper
                | Self::Percent
        )
    }
}

/// Error from parsing a format specification string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormatSpecError {
    /// Characters left over after a complete spec, or an unknown type.
    #[error("Invalid format specifier '{0}'")]
    Invalid(String),
    /// `.` not followed by digits.
    #[error("Format specifier missing precision")]
    MissingPrecision,
    /// Width or precision does not fit in `usize`.
    #[error("Too many decimal digits in format string")]
    TooLarge,
}

/// Parse a format specification string.
///
/// # Examples
///
/// ```
/// use tagstr_ir::format_spec::{parse_format_spec, Align, FormatType};
///
/// let spec = parse_format_spec("*^20.5f").unwrap();
/// assert_eq!(spec.fill, Some('*'));
/// assert_eq!(spec.align, Some(Align::Center));
/// assert_eq!(spec.width, Some(20));
/// assert_eq!(spec.precision, Some(5));
/// assert_eq!(spec.format_type, Some(FormatType::Fixed));
/// ```
pub fn parse_format_spec(spec: &str) -> Result<ParsedFormatSpec, FormatSpecError> {
    if spec.is_empty() {
        return Ok(ParsedFormatSpec::EMPTY);
    }

    let mut result = ParsedFormatSpec::EMPTY;
    let chars: Vec<char> = spec.chars().collect();
    let mut pos = 0;

    // Parse [[fill]align]
    // Look ahead: if chars[1] is an alignment char, then chars[0] is fill.
    if chars.len() >= 2 && parse_align(chars[1]).is_some() {
        result.fill = Some(chars[0]);
        result.align = parse_align(chars[1]);
        pos = 2;
    } else if let Some(align) = parse_align(chars[0]) {
        result.align = Some(align);
        pos = 1;
    }

    // Parse [sign]
    if let Some(sign) = chars.get(pos).and_then(|&c| parse_sign(c)) {
        result.sign = Some(sign);
        pos += 1;
    }

    // Parse [z]
    if chars.get(pos) == Some(&'z') {
        result.no_neg_zero = true;
        pos += 1;
    }

    // Parse [#]
    if chars.get(pos) == Some(&'#') {
        result.alternate = true;
        pos += 1;
    }

    // Parse [0]: a leading zero before the width digits
    if chars.get(pos) == Some(&'0') {
        result.zero_pad = true;
        pos += 1;
    }

    // Parse [width]
    let (width, next) = parse_digits(&chars, pos)?;
    result.width = width;
    pos = next;

    // Parse [grouping]
    match chars.get(pos) {
        Some(',') => {
            result.grouping = Some(Grouping::Comma);
            pos += 1;
        }
        Some('_') => {
            result.grouping = Some(Grouping::Underscore);
            pos += 1;
        }
        _ => {}
    }

    // Parse [.precision]
    if chars.get(pos) == Some(&'.') {
        let (precision, next) = parse_digits(&chars, pos + 1)?;
        if precision.is_none() {
            return Err(FormatSpecError::MissingPrecision);
        }
        result.precision = precision;
        pos = next;
    }

    // Parse [type]
    if let Some(&type_char) = chars.get(pos) {
        result.format_type = FormatType::from_char(type_char);
        if result.format_type.is_some() {
            pos += 1;
        }
    }

    // Anything left over makes the whole spec invalid
    if pos < chars.len() {
        return Err(FormatSpecError::Invalid(spec.to_owned()));
    }

    Ok(result)
}

fn parse_digits(chars: &[char], start: usize) -> Result<(Option<usize>, usize), FormatSpecError> {
    let mut pos = start;
    while pos < chars.len() && chars[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == start {
        return Ok((None, pos));
    }
    let digits: String = chars[start..pos].iter().collect();
    let value = digits.parse().map_err(|_| FormatSpecError::TooLarge)?;
    Ok((Some(value), pos))
}

fn parse_align(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '^' => Some(Align::Center),
        '>' => Some(Align::Right),
        '=' => Some(Align::AfterSign),
        _ => None,
    }
}

fn parse_sign(c: char) -> Option<Sign> {
    match c {
        '+' => Some(Sign::Plus),
        '-' => Some(Sign::Minus),
        ' ' => Some(Sign::Space),
        _ => None,
    }
}
