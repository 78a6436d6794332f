// fprobe/src/decode/mod.rs

//! Reconstructing typed arrays from the values gdb prints.

pub mod element;
pub mod flatten;

#[cfg(test)]
mod tests;

pub use element::{parse_real, Element, ElementType, INTEGER_ELEMENT_TYPE};
pub use flatten::{flatten_value, split_flat};

use crate::types::TypeDescriptor;
use ndarray::{Array1, ArrayD, IxDyn, ShapeBuilder, Zip};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Unhandled type '{base_type}'{}", kind.as_ref().map(|k| format!(" (kind={})", k)).unwrap_or_default())]
    UnsupportedType {
        base_type: String,
        kind: Option<String>,
    },

    #[error("Value holds {found} elements but the type declares {expected}")]
    ShapeMismatch { expected: usize, found: usize },

    #[error("Shape {shape:?} holds more elements than fit in memory")]
    ShapeOverflow { shape: Vec<usize> },

    #[error("Cannot convert element {index} ('{token}')")]
    InvalidElement { index: usize, token: String },

    #[error(transparent)]
    Layout(#[from] ndarray::ShapeError),
}

/// An array decoded from a debugger reply, laid out column-major.
///
/// Reals mark unconvertible elements with NaN. Integers have no spare value,
/// so `invalid` flags the elements holding the sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedArray {
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
    I8 {
        values: ArrayD<i8>,
        invalid: ArrayD<bool>,
    },
}

impl DecodedArray {
    pub fn element_type(&self) -> ElementType {
        match self {
            DecodedArray::F32(_) => ElementType::F32,
            DecodedArray::F64(_) => ElementType::F64,
            DecodedArray::I8 { .. } => ElementType::I8,
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            DecodedArray::F32(a) => a.shape(),
            DecodedArray::F64(a) => a.shape(),
            DecodedArray::I8 { values, .. } => values.shape(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DecodedArray::F32(a) => a.len(),
            DecodedArray::F64(a) => a.len(),
            DecodedArray::I8 { values, .. } => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements holding the sentinel.
    pub fn sentinel_count(&self) -> usize {
        match self {
            DecodedArray::F32(a) => a.iter().filter(|v| v.is_nan()).count(),
            DecodedArray::F64(a) => a.iter().filter(|v| v.is_nan()).count(),
            DecodedArray::I8 { invalid, .. } => invalid.iter().filter(|&&bad| bad).count(),
        }
    }

    /// Widen to `f64`, mapping invalid integers to NaN.
    pub fn to_f64(&self) -> ArrayD<f64> {
        match self {
            DecodedArray::F32(a) => a.mapv(f64::from),
            DecodedArray::F64(a) => a.clone(),
            DecodedArray::I8 { values, invalid } => Zip::from(values)
                .and(invalid)
                .map_collect(|&v, &bad| if bad { f64::NAN } else { f64::from(v) }),
        }
    }

    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            DecodedArray::F64(a) => Some(a),
            _ => None,
        }
    }
}

impl fmt::Display for DecodedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedArray::F32(a) => write!(f, "{}", a),
            DecodedArray::F64(a) => write!(f, "{}", a),
            DecodedArray::I8 { values, .. } => write!(f, "{}", values),
        }
    }
}

/// Decode the printed value of an array variable.
///
/// Tokens that do not convert are replaced by the element type's sentinel.
/// A reply with fewer tokens than the shape calls for (gdb truncated it) is
/// padded with sentinels; more tokens than that is a [`DecodeError::ShapeMismatch`].
pub fn decode_array(raw_value: &str, descriptor: &TypeDescriptor) -> Result<DecodedArray, DecodeError> {
    let element_type = ElementType::resolve(descriptor)?;
    let tokens = flatten_value(raw_value);
    let shape = &descriptor.shape;

    Ok(match element_type {
        ElementType::F32 => DecodedArray::F32(decode_elements(&tokens, shape)?.0),
        ElementType::F64 => DecodedArray::F64(decode_elements(&tokens, shape)?.0),
        ElementType::I8 => {
            let (values, invalid) = decode_elements(&tokens, shape)?;
            DecodedArray::I8 { values, invalid }
        }
    })
}

/// Convert tokens to `T` and lay them out column-major in `shape`.
///
/// Returns the values and a mask of the elements that hold the sentinel.
pub fn decode_elements<T: Element>(
    tokens: &[String],
    shape: &[usize],
) -> Result<(ArrayD<T>, ArrayD<bool>), DecodeError> {
    let size = shape
        .iter()
        .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
        .ok_or_else(|| DecodeError::ShapeOverflow {
            shape: shape.to_vec(),
        })?;
    if tokens.len() > size {
        return Err(DecodeError::ShapeMismatch {
            expected: size,
            found: tokens.len(),
        });
    }

    let mut data = Vec::with_capacity(size);
    let mut invalid = Vec::with_capacity(size);
    let mut failed = 0;
    for token in tokens {
        match T::parse_token(token) {
            Some(value) => {
                data.push(value);
                invalid.push(false);
            }
            None => {
                failed += 1;
                data.push(T::SENTINEL);
                invalid.push(true);
            }
        }
    }
    let missing = size - data.len();
    data.resize(size, T::SENTINEL);
    invalid.resize(size, true);

    if failed > 0 || missing > 0 {
        log::debug!(
            "decoded {} elements: {} unconvertible, {} missing",
            size,
            failed,
            missing
        );
    }

    Ok((
        ArrayD::from_shape_vec(IxDyn(shape).f(), data)?,
        ArrayD::from_shape_vec(IxDyn(shape).f(), invalid)?,
    ))
}

/// Strictly parse a flat `(a, b, c)` value into a 1-D array.
///
/// Unlike [`decode_array`] there is no type probing and no sentinel: the
/// first token that does not convert is an error.
pub fn parse_flat_array<T: FromStr>(raw: &str) -> Result<Array1<T>, DecodeError> {
    let values = split_flat(raw)
        .into_iter()
        .enumerate()
        .map(|(index, token)| {
            token.parse::<T>().map_err(|_| DecodeError::InvalidElement {
                index,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<T>, DecodeError>>()?;
    Ok(Array1::from(values))
}
