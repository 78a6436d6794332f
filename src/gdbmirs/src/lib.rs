// gdbmirs/src/lib.rs

//! A small client for gdb's machine interface (MI).
//!
//! This library provides:
//! - A parser for MI output records (result, async, stream records and the prompt)
//! - The [`DebuggerControl`] trait, the seam every caller talks through
//! - [`GdbController`], which owns a gdb process and implements that trait
//!
//! ```no_run
//! use gdbmirs::{ControllerOptions, DebuggerControl, GdbController};
//!
//! fn main() -> gdbmirs::Result<()> {
//!     let mut gdb = GdbController::spawn(&ControllerOptions::default())?;
//!     for resp in gdb.write("-gdb-version")? {
//!         println!("{}: {:?}", resp.kind, resp.payload);
//!     }
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod error;
pub mod parser;
pub mod record;

pub use controller::{ControllerOptions, DebuggerControl, GdbController};
pub use error::{MiError, Result};
pub use parser::{parse_line, parse_lines, parse_output_line};
pub use record::{Response, ResponseKind, Stream};

/// Quote a string as an MI c-string argument.
pub fn quote(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}
