// fprobe/src/decode/element.rs

//! Element types an array can be decoded into.

use super::DecodeError;
use crate::constants::DEFAULT_REAL_KIND;
use crate::types::{ParamValue, TypeDescriptor};
use std::fmt;
use std::str::FromStr;

/// Numeric element type of a decoded array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    F32,
    F64,
    I8,
}

/// Element type used for every `integer`, whatever its kind.
///
/// Kind 4 and kind 8 integers overflow this for values outside -128..=127 and
/// decode as the sentinel.
pub const INTEGER_ELEMENT_TYPE: ElementType = ElementType::I8;

impl ElementType {
    /// Map a base type and its `kind` parameter to an element type.
    pub fn resolve(descriptor: &TypeDescriptor) -> Result<Self, DecodeError> {
        match descriptor.base_type.as_str() {
            "real" => match descriptor.kind() {
                None => Self::real_of_kind(DEFAULT_REAL_KIND),
                Some(ParamValue::Int(kind)) => Self::real_of_kind(*kind),
                Some(ParamValue::Raw(kind)) => Err(DecodeError::UnsupportedType {
                    base_type: descriptor.base_type.clone(),
                    kind: Some(kind.clone()),
                }),
            },
            "integer" => Ok(INTEGER_ELEMENT_TYPE),
            other => Err(DecodeError::UnsupportedType {
                base_type: other.to_string(),
                kind: descriptor.kind().map(ToString::to_string),
            }),
        }
    }

    fn real_of_kind(kind: i64) -> Result<Self, DecodeError> {
        match kind {
            4 => Ok(ElementType::F32),
            8 => Ok(ElementType::F64),
            other => {
                log::warn!("real(kind={}) has no exact element type, decoding as f32", other);
                Ok(ElementType::F32)
            }
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
            ElementType::I8 => "i8",
        };
        f.write_str(name)
    }
}

/// A value that can be parsed from one token of a debugger reply.
pub trait Element: Copy + fmt::Debug + 'static {
    /// Stored in place of a token that fails to convert.
    const SENTINEL: Self;

    fn parse_token(token: &str) -> Option<Self>;
}

impl Element for f64 {
    const SENTINEL: Self = f64::NAN;

    fn parse_token(token: &str) -> Option<Self> {
        parse_fortran_real(token, f64::NAN)
    }
}

impl Element for f32 {
    const SENTINEL: Self = f32::NAN;

    fn parse_token(token: &str) -> Option<Self> {
        parse_fortran_real(token, f32::NAN)
    }
}

/// Every `i8` is a valid value, so failures are tracked in a separate mask
/// and the sentinel only fills the slot.
impl Element for i8 {
    const SENTINEL: Self = i8::MIN;

    fn parse_token(token: &str) -> Option<Self> {
        token.trim().parse::<i8>().ok()
    }
}

/// Parse a real as gdb prints it: plain decimals, `d` exponents, `inf`, and
/// `nan(0x...)` payload forms.
pub fn parse_real(token: &str) -> Option<f64> {
    parse_fortran_real(token, f64::NAN)
}

fn parse_fortran_real<F: FromStr>(token: &str, nan: F) -> Option<F> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return None;
    }

    let lower = trimmed.to_lowercase();
    let unsigned = lower.trim_start_matches(&['+', '-'][..]);
    if unsigned.starts_with("nan") {
        return Some(nan);
    }

    let normalized = lower.replacen('d', "e", 1);
    normalized.parse::<F>().ok()
}
