//! Parameter types, values and metadata
//!
//! Stored encodings:
//!
//! | Type    | Bytes                           |
//! |---------|---------------------------------|
//! | String  | UTF-8 text followed by one NUL  |
//! | Float   | `f32`, 4 bytes little-endian    |
//! | Integer | `i32`, 4 bytes little-endian    |
//! | Boolean | 1 byte, `0` or `1`              |

use super::error::ParameterError;
use crate::config::{MAX_STRING_LEN, MAX_TEXT_LEN};
use crate::storage::Value;
use core::fmt::Write;

/// String parameter value
pub type ParamString = heapless::String<MAX_STRING_LEN>;

/// Rendered parameter text
pub type ParamText = heapless::String<MAX_TEXT_LEN>;

/// Largest supported float display precision
pub const MAX_DECIMAL_PLACES: u8 = 8;

/// Default float display precision
pub const DEFAULT_DECIMAL_PLACES: u8 = 2;

/// Parameter type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamType {
    String,
    Float,
    Integer,
    Boolean,
}

/// Parameter value (union of supported types)
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(ParamString),
    Float(f32),
    Integer(i32),
    Boolean(bool),
}

impl ParamValue {
    /// Get parameter type
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::String(_) => ParamType::String,
            ParamValue::Float(_) => ParamType::Float,
            ParamValue::Integer(_) => ParamType::Integer,
            ParamValue::Boolean(_) => ParamType::Boolean,
        }
    }

    /// Encode to stored bytes
    pub fn encode(&self) -> Value {
        let mut bytes = Value::new();
        match self {
            ParamValue::String(text) => {
                // ParamString leaves room for the terminator
                let _ = bytes.extend_from_slice(text.as_bytes());
                let _ = bytes.push(0);
            }
            ParamValue::Float(v) => {
                let _ = bytes.extend_from_slice(&v.to_le_bytes());
            }
            ParamValue::Integer(v) => {
                let _ = bytes.extend_from_slice(&v.to_le_bytes());
            }
            ParamValue::Boolean(v) => {
                let _ = bytes.push(u8::from(*v));
            }
        }
        bytes
    }

    /// Decode stored bytes as `param_type`
    ///
    /// Returns `None` when the bytes do not have the expected shape. A
    /// missing string terminator is tolerated.
    pub fn decode(param_type: ParamType, bytes: &[u8]) -> Option<Self> {
        match param_type {
            ParamType::String => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                let text = core::str::from_utf8(&bytes[..end]).ok()?;
                ParamString::try_from(text).ok().map(ParamValue::String)
            }
            ParamType::Float => {
                let raw = <[u8; 4]>::try_from(bytes).ok()?;
                Some(ParamValue::Float(f32::from_le_bytes(raw)))
            }
            ParamType::Integer => {
                let raw = <[u8; 4]>::try_from(bytes).ok()?;
                Some(ParamValue::Integer(i32::from_le_bytes(raw)))
            }
            ParamType::Boolean => match bytes {
                [b] => Some(ParamValue::Boolean(*b != 0)),
                _ => None,
            },
        }
    }
}

/// Static parameter metadata
///
/// Bounds are inclusive and always ordered (`min <= max`) when built through
/// the constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamSpec {
    String {
        default: &'static str,
    },
    Float {
        default: f32,
        min: f32,
        max: f32,
        /// Digits after the decimal point when rendered
        decimal_places: u8,
    },
    Integer {
        default: i32,
        min: i32,
        max: i32,
    },
    Boolean {
        default: bool,
    },
}

impl ParamSpec {
    pub const fn string(default: &'static str) -> Self {
        ParamSpec::String { default }
    }

    /// Float parameter; NaN bounds fall back to the full range
    pub fn float(default: f32, min: f32, max: f32, decimal_places: u8) -> Self {
        let min = if min.is_nan() { -f32::MAX } else { min };
        let max = if max.is_nan() { f32::MAX } else { max };
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        ParamSpec::Float {
            default: if default.is_nan() { 0.0 } else { default },
            min,
            max,
            decimal_places: decimal_places.min(MAX_DECIMAL_PLACES),
        }
    }

    pub const fn integer(default: i32, min: i32, max: i32) -> Self {
        let (min, max) = if min > max { (max, min) } else { (min, max) };
        ParamSpec::Integer { default, min, max }
    }

    pub const fn boolean(default: bool) -> Self {
        ParamSpec::Boolean { default }
    }

    pub fn param_type(&self) -> ParamType {
        match self {
            ParamSpec::String { .. } => ParamType::String,
            ParamSpec::Float { .. } => ParamType::Float,
            ParamSpec::Integer { .. } => ParamType::Integer,
            ParamSpec::Boolean { .. } => ParamType::Boolean,
        }
    }

    /// Default value, clamped into bounds
    ///
    /// A string default longer than `MAX_STRING_LEN` is cut at a character
    /// boundary.
    pub fn default_value(&self) -> ParamValue {
        match *self {
            ParamSpec::String { default } => ParamValue::String(truncated(default)),
            ParamSpec::Float { default, .. } => self.constrain(ParamValue::Float(default)),
            ParamSpec::Integer { default, .. } => self.constrain(ParamValue::Integer(default)),
            ParamSpec::Boolean { default } => ParamValue::Boolean(default),
        }
    }

    /// Saturate a number into `[min, max]`
    ///
    /// NaN becomes `0.0` before clamping. Values of other types pass through.
    pub fn constrain(&self, value: ParamValue) -> ParamValue {
        match (*self, value) {
            (ParamSpec::Float { min, max, .. }, ParamValue::Float(v)) => {
                let v = if v.is_nan() { 0.0 } else { v };
                ParamValue::Float(if v < min {
                    min
                } else if v > max {
                    max
                } else {
                    v
                })
            }
            (ParamSpec::Integer { min, max, .. }, ParamValue::Integer(v)) => {
                ParamValue::Integer(v.max(min).min(max))
            }
            (_, value) => value,
        }
    }

    /// Parse user text into a value of this type
    ///
    /// - Numbers use the longest numeric prefix after leading whitespace;
    ///   text without one parses as zero. Integers saturate to `i32`.
    /// - Booleans are false for empty text or text starting with `f`, `F`
    ///   or `0`, true otherwise.
    /// - Strings are taken as-is.
    ///
    /// The result is not clamped; writes do that.
    pub fn parse(&self, text: &str) -> Result<ParamValue, ParameterError> {
        Ok(match self {
            ParamSpec::String { .. } => ParamValue::String(
                ParamString::try_from(text).map_err(|_| ParameterError::ValueTooLong)?,
            ),
            ParamSpec::Float { .. } => ParamValue::Float(parse_float(text)),
            ParamSpec::Integer { .. } => ParamValue::Integer(parse_integer(text)),
            ParamSpec::Boolean { .. } => ParamValue::Boolean(parse_bool(text)),
        })
    }

    /// Render a value as text
    ///
    /// Floats use the configured number of decimal places.
    pub fn render(&self, value: &ParamValue) -> ParamText {
        let mut text = ParamText::new();
        // Bounded by MAX_STRING_LEN and MAX_DECIMAL_PLACES, always fits
        let _ = match (self, value) {
            (ParamSpec::Float { decimal_places, .. }, ParamValue::Float(v)) => {
                write!(text, "{:.*}", usize::from(*decimal_places), v)
            }
            (_, ParamValue::Float(v)) => write!(text, "{}", v),
            (_, ParamValue::String(s)) => write!(text, "{}", s),
            (_, ParamValue::Integer(v)) => write!(text, "{}", v),
            (_, ParamValue::Boolean(v)) => write!(text, "{}", v),
        };
        text
    }
}

fn truncated(text: &str) -> ParamString {
    let mut end = text.len().min(MAX_STRING_LEN);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    ParamString::try_from(&text[..end]).unwrap_or_default()
}

fn split_sign(text: &str) -> (bool, &str) {
    match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    }
}

fn digit_count(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

fn parse_integer(text: &str) -> i32 {
    let (negative, rest) = split_sign(text.trim_start());
    let limit = i64::from(i32::MAX) + 1;
    let magnitude = rest
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| (acc * 10 + i64::from(b - b'0')).min(limit));
    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn parse_float(text: &str) -> f32 {
    let text = text.trim_start();
    let (_, rest) = split_sign(text);
    let sign_len = text.len() - rest.len();

    let int_digits = digit_count(rest);
    let mut len = int_digits;
    let mut frac_digits = 0;
    if rest[len..].starts_with('.') {
        frac_digits = digit_count(&rest[len + 1..]);
        len += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }
    if rest[len..].starts_with(['e', 'E']) {
        let (_, exponent) = split_sign(&rest[len + 1..]);
        let exp_digits = digit_count(exponent);
        if exp_digits > 0 {
            len = rest.len() - exponent.len() + exp_digits;
        }
    }

    match text[..sign_len + len].parse::<f32>() {
        Ok(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}

fn parse_bool(text: &str) -> bool {
    !matches!(text.trim().bytes().next(), None | Some(b'f' | b'F' | b'0'))
}
