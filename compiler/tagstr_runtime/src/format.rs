//! Rendering of tag arguments.
//!
//! [`format_value`] is what an f-string does for each replacement field:
//! evaluate, apply the conversion, then apply the format spec through
//! [`format_spec`], which implements Python's mini-language for the value
//! types in [`Value`].
//!
//! Supports:
//! - Integer formatting: decimal, binary, octal, hex, char, sign, alternate,
//!   zero-pad, grouping; float presentation types convert to float
//! - Float formatting: repr default, scientific, fixed-point, general,
//!   percentage, precision
//! - String formatting: precision truncation, width, alignment

use tagstr_ir::format_spec::{parse_format_spec, Align, FormatType, ParsedFormatSpec, Sign};

use crate::tag::{Arg, Thunk};
use crate::value::{exponent_suffix, float_repr};
use crate::{RuntimeError, Value};

/// Format a text piece or a thunk.
///
/// Text is returned as is. A thunk is evaluated, converted (`r`, `s`, `a`)
/// and formatted with its spec.
pub fn format_value(arg: &Value) -> Result<String, RuntimeError> {
    match Arg::from_value(arg)? {
        Arg::Text(text) => Ok(text.to_owned()),
        Arg::Thunk(thunk) => format_thunk(&thunk),
    }
}

/// Concatenate the formatted arguments: the plain f-string result.
pub fn render(args: &[Value]) -> Result<String, RuntimeError> {
    args.iter().map(format_value).collect()
}

fn format_thunk(thunk: &Thunk<'_>) -> Result<String, RuntimeError> {
    let value = (thunk.getvalue)();
    tracing::trace!(expr = thunk.expr_text, value = ?value, "evaluated thunk");
    let value = match thunk.conversion {
        Some("r") => Value::Str(value.repr()),
        Some("s") => Value::Str(value.to_str()),
        Some("a") => Value::Str(value.ascii()),
        None => value,
        Some(marker) => {
            return Err(RuntimeError::BadConversion {
                marker: marker.to_owned(),
            })
        }
    };
    format_spec(&value, thunk.format_spec.unwrap_or(""))
}

/// `format(value, spec)`.
pub fn format_spec(value: &Value, spec: &str) -> Result<String, RuntimeError> {
    let parsed = parse_format_spec(spec).map_err(|e| RuntimeError::invalid_spec(spec, e.to_string()))?;

    match value {
        Value::Int(n) => format_int(*n, &parsed, spec),
        Value::Float(f) => format_float(*f, &parsed, spec),
        Value::Str(s) => format_str(s, &parsed, spec),
        Value::Bool(_) if spec.is_empty() => Ok(value.to_str()),
        Value::Bool(b) => format_int(i64::from(*b), &parsed, spec),
        _ if spec.is_empty() => Ok(value.to_str()),
        _ => Err(RuntimeError::invalid_spec(
            spec,
            format!("unsupported format string passed to {}.__format__", value.type_name()),
        )),
    }
}

fn unknown_code(spec: &str, ty: FormatType, type_name: &str) -> RuntimeError {
    RuntimeError::invalid_spec(
        spec,
        format!(
            "Unknown format code '{}' for object of type '{type_name}'",
            ty.as_char()
        ),
    )
}

/// Format an integer value according to the spec.
fn format_int(n: i64, spec: &ParsedFormatSpec, raw: &str) -> Result<String, RuntimeError> {
    let abs_n = n.unsigned_abs();

    let (digits, prefix) = match spec.format_type {
        Some(FormatType::Binary) => (format!("{abs_n:b}"), "0b"),
        Some(FormatType::Octal) => (format!("{abs_n:o}"), "0o"),
        Some(FormatType::Hex) => (format!("{abs_n:x}"), "0x"),
        Some(FormatType::HexUpper) => (format!("{abs_n:X}"), "0X"),
        Some(FormatType::Char) => {
            let c = u32::try_from(n).ok().and_then(char::from_u32).ok_or_else(|| {
                RuntimeError::invalid_spec(raw, "%c arg not in range(0x110000)")
            })?;
            return Ok(pad(&c.to_string(), spec, Align::Left));
        }
        Some(ty) if ty.is_float() => {
            #[allow(clippy::cast_precision_loss, reason = "int to float conversion is lossy in Python too")]
            let as_float = n as f64;
            return format_float(as_float, spec, raw);
        }
        Some(FormatType::Str) => return Err(unknown_code(raw, FormatType::Str, "int")),
        _ => (abs_n.to_string(), ""),
    };
    let prefix = if spec.alternate { prefix } else { "" };

    let grouping = match spec.grouping {
        None => None,
        Some(grouping) => {
            let every = match spec.format_type {
                Some(FormatType::Binary | FormatType::Octal | FormatType::Hex | FormatType::HexUpper) => {
                    if grouping.separator() == ',' {
                        return Err(RuntimeError::invalid_spec(raw, "Cannot specify ',' with this format code."));
                    }
                    4
                }
                _ => 3,
            };
            Some((grouping.separator(), every))
        }
    };

    Ok(pad_number(format_sign(n < 0, spec), prefix, &digits, "", grouping, spec))
}

/// Format a float value according to the spec.
fn format_float(f: f64, spec: &ParsedFormatSpec, raw: &str) -> Result<String, RuntimeError> {
    let abs_f = f.abs();
    let upper = matches!(
        spec.format_type,
        Some(FormatType::ExpUpper | FormatType::FixedUpper | FormatType::GeneralUpper)
    );

    let digits = if abs_f.is_finite() {
        match spec.format_type {
            Some(FormatType::Exp | FormatType::ExpUpper) => {
                format_scientific(abs_f, spec.precision.unwrap_or(6), upper, spec.alternate)
            }
            Some(FormatType::Fixed | FormatType::FixedUpper) => {
                let prec = spec.precision.unwrap_or(6);
                with_point(format!("{abs_f:.prec$}"), spec.alternate && prec == 0)
            }
            Some(FormatType::General | FormatType::GeneralUpper | FormatType::Number) => {
                format_general(abs_f, spec.precision.unwrap_or(6), upper, spec.alternate)
            }
            Some(FormatType::Percent) => {
                let prec = spec.precision.unwrap_or(6);
                let pct = abs_f * 100.0;
                format!("{pct:.prec$}%")
            }
            Some(ty @ (FormatType::Binary
            | FormatType::Char
            | FormatType::Decimal
            | FormatType::Octal
            | FormatType::Hex
            | FormatType::HexUpper
            | FormatType::Str)) => return Err(unknown_code(raw, ty, "float")),
            None => match spec.precision {
                Some(prec) => {
                    let general = format_general(abs_f, prec, false, spec.alternate);
                    if general.contains(['.', 'e']) {
                        general
                    } else {
                        format!("{general}.0")
                    }
                }
                None => float_repr(abs_f),
            },
        }
    } else {
        let word = if abs_f.is_nan() { "nan" } else { "inf" };
        let word = if upper { word.to_ascii_uppercase() } else { word.to_owned() };
        if spec.format_type == Some(FormatType::Percent) {
            format!("{word}%")
        } else {
            word
        }
    };

    let mut negative = f.is_sign_negative() && !f.is_nan();
    if negative && spec.no_neg_zero && digits.chars().filter(char::is_ascii_digit).all(|c| c == '0') {
        negative = false;
    }

    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let (int_part, rest) = digits.split_at(end);
    let grouping = spec.grouping.map(|grouping| (grouping.separator(), 3));
    Ok(pad_number(format_sign(negative, spec), "", int_part, rest, grouping, spec))
}

/// Format a string value according to the spec.
fn format_str(s: &str, spec: &ParsedFormatSpec, raw: &str) -> Result<String, RuntimeError> {
    match spec.format_type {
        None | Some(FormatType::Str) => {}
        Some(ty) => return Err(unknown_code(raw, ty, "str")),
    }
    if spec.sign.is_some() {
        return Err(RuntimeError::invalid_spec(raw, "Sign not allowed in string format specifier"));
    }
    if spec.alternate {
        return Err(RuntimeError::invalid_spec(
            raw,
            "Alternate form (#) not allowed in string format specifier",
        ));
    }
    if let Some(grouping) = spec.grouping {
        return Err(RuntimeError::invalid_spec(
            raw,
            format!("Cannot specify '{}' with 's'.", grouping.separator()),
        ));
    }
    if spec.align == Some(Align::AfterSign) {
        return Err(RuntimeError::invalid_spec(
            raw,
            "'=' alignment not allowed in string format specifier",
        ));
    }

    let truncated: String = match spec.precision {
        Some(prec) => s.chars().take(prec).collect(),
        None => s.to_owned(),
    };

    Ok(pad(&truncated, spec, Align::Left))
}

/// Lay out `sign`, `prefix`, the integer digits and `rest` in the field.
///
/// `grouping` is the separator and group size for the integer digits.
/// Without an explicit alignment, a `0` flag pads with zeros between the
/// sign and the digits; zero padding is grouped like the digits.
#[allow(clippy::arithmetic_side_effects, reason = "subtraction guarded by `len < width` check")]
fn pad_number(
    sign: &str,
    prefix: &str,
    int_digits: &str,
    rest: &str,
    grouping: Option<(char, usize)>,
    spec: &ParsedFormatSpec,
) -> String {
    let body = match grouping {
        Some((sep, every)) => group_digits(int_digits, sep, every),
        None => int_digits.to_owned(),
    };
    let after_sign = spec.align == Some(Align::AfterSign) || (spec.zero_pad && spec.align.is_none());
    if after_sign {
        let fill = spec.fill.unwrap_or(if spec.zero_pad { '0' } else { ' ' });
        let len = sign.len() + prefix.len() + body.chars().count() + rest.chars().count();
        if let Some(width) = spec.width.filter(|&w| len < w) {
            if let Some((sep, every)) = grouping.filter(|_| fill == '0' && !int_digits.is_empty()) {
                let room = width - (len - body.chars().count());
                let zeroed = zero_fill_grouped(int_digits, room, every);
                return format!("{sign}{prefix}{}{rest}", group_digits(&zeroed, sep, every));
            }
            let padding: String = std::iter::repeat_n(fill, width - len).collect();
            return format!("{sign}{prefix}{padding}{body}{rest}");
        }
    }
    pad(&format!("{sign}{prefix}{body}{rest}"), spec, Align::Right)
}

/// `digits` left-padded with zeros to the fewest digits whose grouped form
/// is at least `width` wide. The grouped result never starts with a
/// separator.
fn zero_fill_grouped(digits: &str, width: usize, every: usize) -> String {
    let mut count = digits.chars().count();
    while count + (count - 1) / every < width {
        count += 1;
    }
    format!("{digits:0>count$}")
}

/// Apply width and alignment to a formatted string.
#[allow(clippy::arithmetic_side_effects, reason = "subtraction guarded by `len >= width` early return")]
fn pad(s: &str, spec: &ParsedFormatSpec, default: Align) -> String {
    let Some(width) = spec.width else {
        return s.to_owned();
    };

    let len = s.chars().count();
    if len >= width {
        return s.to_owned();
    }

    let fill = spec.fill.unwrap_or(if spec.zero_pad { '0' } else { ' ' });
    let padding = width - len;

    match spec.align.unwrap_or(default) {
        Align::Left => {
            let right_pad: String = std::iter::repeat_n(fill, padding).collect();
            format!("{s}{right_pad}")
        }
        Align::Right | Align::AfterSign => {
            let left_pad: String = std::iter::repeat_n(fill, padding).collect();
            format!("{left_pad}{s}")
        }
        Align::Center => {
            let left = padding / 2;
            let right = padding - left;
            let left_pad: String = std::iter::repeat_n(fill, left).collect();
            let right_pad: String = std::iter::repeat_n(fill, right).collect();
            format!("{left_pad}{s}{right_pad}")
        }
    }
}

/// Build the sign prefix for a numeric value.
fn format_sign(is_negative: bool, spec: &ParsedFormatSpec) -> &'static str {
    if is_negative {
        "-"
    } else {
        match spec.sign {
            Some(Sign::Plus) => "+",
            Some(Sign::Space) => " ",
            _ => "",
        }
    }
}

/// Insert `sep` every `every` digits, counting from the right.
fn group_digits(digits: &str, sep: char, every: usize) -> String {
    let count = digits.chars().count();
    let mut out = String::with_capacity(digits.len() + count / every);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (count - i) % every == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

fn with_point(s: String, force: bool) -> String {
    if force && !s.contains('.') {
        s + "."
    } else {
        s
    }
}

/// Split Rust's `1.5e-7` into mantissa and exponent.
fn split_exponent(s: &str) -> (&str, i32) {
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn strip_trailing_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `e` presentation: `precision` digits after the point.
fn format_scientific(f: f64, precision: usize, uppercase: bool, alternate: bool) -> String {
    let sci = format!("{f:.precision$e}");
    let (mantissa, exp) = split_exponent(&sci);
    let mantissa = with_point(mantissa.to_owned(), alternate && precision == 0);
    let marker = if uppercase { 'E' } else { 'e' };
    format!("{mantissa}{}", exponent_suffix(marker, exp))
}

/// `g` presentation: `precision` significant digits, positional notation
/// unless the exponent is below -4 or reaches the precision.
fn format_general(f: f64, precision: usize, uppercase: bool, alternate: bool) -> String {
    let precision = precision.max(1);
    let sci = format!("{f:.prec$e}", prec = precision - 1);
    let (mantissa, exp) = split_exponent(&sci);

    if exp >= -4 && i64::from(exp) < i64::try_from(precision).unwrap_or(i64::MAX) {
        let decimals = usize::try_from(i64::try_from(precision).unwrap_or(i64::MAX) - 1 - i64::from(exp))
            .unwrap_or(0);
        let fixed = format!("{f:.decimals$}");
        if alternate {
            with_point(fixed, true)
        } else {
            strip_trailing_zeros(&fixed).to_owned()
        }
    } else {
        let mantissa = if alternate {
            with_point(mantissa.to_owned(), true)
        } else {
            strip_trailing_zeros(mantissa).to_owned()
        };
        let marker = if uppercase { 'E' } else { 'e' };
        format!("{mantissa}{}", exponent_suffix(marker, exp))
    }
}
