// fprobe/src/lib.rs

//! Probe Fortran variables in a running program through gdb/MI.
//!
//! The core turns two gdb replies into a typed array: the type string of a
//! variable (`real(kind=8) (3,4)`) is parsed into a [`TypeDescriptor`], and
//! its printed value (`((1, 2, 3) (4, 5, 6) ...)`) is decoded against that
//! descriptor into a column-major [`DecodedArray`].
//!
//! ```
//! use fprobe::{decode_array, parse_type};
//!
//! let descriptor = parse_type("real(kind=8) (2,2)").unwrap();
//! let array = decode_array("((1, 2) (3, 4))", &descriptor).unwrap();
//! assert_eq!(array.as_f64().unwrap()[[1, 0]], 2.0);
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod decode;
pub mod error;
pub mod render;
pub mod session;
pub mod types;

pub use config::ProbeConfig;
pub use decode::{decode_array, parse_flat_array, DecodeError, DecodedArray, ElementType};
pub use error::{ProbeError, Result};
pub use session::{Frame, Session};
pub use types::{parse_type, ParamValue, TypeDescriptor, TypeParseError};
