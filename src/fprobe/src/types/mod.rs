// fprobe/src/types/mod.rs

//! Type descriptors parsed from the type strings gdb reports for Fortran
//! variables, e.g. `real(kind=8)` or `integer(kind=4) (1,10)`.

pub mod lexer;
pub mod parser;
pub mod token;


pub use parser::{Production, TypeParseError, TypeParser};

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value of a keyword parameter such as `kind=8` or `len=*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Raw(String),
}

impl ParamValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Raw(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Raw(s) => f.write_str(s),
        }
    }
}

/// Structured form of a debugger type string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDescriptor {
    /// Lowercased type name (`real`, `integer`, `logical`, ...)
    pub base_type: String,
    /// Keyword parameters from the first parenthesized group
    pub parameters: BTreeMap<String, ParamValue>,
    /// Attributes printed after the parameters (`allocatable`, `pointer`)
    pub attributes: Vec<String>,
    /// Extent of each dimension, in printed order; empty for scalars
    pub shape: Vec<usize>,
    /// Lower bound of each dimension
    pub lower_bounds: Vec<i64>,
}

impl TypeDescriptor {
    /// A descriptor with no parameters and no dimensions.
    pub fn scalar<S: Into<String>>(base_type: S) -> Self {
        Self {
            base_type: base_type.into(),
            parameters: BTreeMap::new(),
            attributes: Vec::new(),
            shape: Vec::new(),
            lower_bounds: Vec::new(),
        }
    }

    pub fn with_parameter<S: Into<String>>(mut self, name: S, value: ParamValue) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    /// Set the shape; all lower bounds become 1.
    pub fn with_shape(mut self, shape: Vec<usize>) -> Self {
        self.lower_bounds = vec![1; shape.len()];
        self.shape = shape;
        self
    }

    pub fn kind(&self) -> Option<&ParamValue> {
        self.parameters.get("kind")
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Number of elements: the product of the shape, 1 for scalars.
    /// `None` when the product overflows.
    pub fn element_count(&self) -> Option<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &extent| acc.checked_mul(extent))
    }
}

impl FromStr for TypeDescriptor {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeParser::new(s).parse()
    }
}

/// Writes the descriptor back in the debugger's notation.
impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_type)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|(name, value)| format!("{}={}", name, value))
                .collect();
            write!(f, "({})", params.join(","))?;
        }
        for attribute in &self.attributes {
            write!(f, ", {}", attribute)?;
        }
        if !self.shape.is_empty() {
            let dims: Vec<String> = self
                .shape
                .iter()
                .zip(self.lower_bounds.iter().chain(std::iter::repeat(&1)))
                .map(|(&extent, &lower)| {
                    if lower == 1 {
                        extent.to_string()
                    } else {
                        format!("{}:{}", lower, lower + extent as i64 - 1)
                    }
                })
                .collect();
            write!(f, " ({})", dims.join(","))?;
        }
        Ok(())
    }
}

/// Parse a type string, returning `None` when it does not follow the grammar.
///
/// Use [`TypeDescriptor::from_str`] to find out which part failed.
pub fn parse_type(raw: &str) -> Option<TypeDescriptor> {
    match raw.parse::<TypeDescriptor>() {
        Ok(descriptor) => Some(descriptor),
        Err(e) => {
            log::debug!("unparseable type '{}': {}", raw, e);
            None
        }
    }
}
