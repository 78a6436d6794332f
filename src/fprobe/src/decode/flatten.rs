// fprobe/src/decode/flatten.rs

//! Flattening gdb's nested array printing into a token list.
//!
//! gdb prints a Fortran array with one parenthesized group per run of the
//! first dimension, nesting one level deeper for each further dimension:
//! `((1, 2) (3, 4) (5, 6))` for a `(2,3)` array. The groups already follow
//! column-major order, so flattening only has to turn every group boundary
//! into a plain separator.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `) (` between two sibling groups, at any nesting depth: `)) ((`.
    static ref GROUP_SEPARATOR: Regex = Regex::new(r"\)+\s*,?\s*\(+").unwrap();
}

/// Split a raw value into element tokens, in print order.
///
/// Parentheses that open or close groups are removed. Tokens are trimmed;
/// an empty body yields no tokens.
pub fn flatten_value(raw: &str) -> Vec<String> {
    let body = raw
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')');
    let body = GROUP_SEPARATOR.replace_all(body, ", ");

    if body.trim().is_empty() {
        return Vec::new();
    }

    body.split(',')
        .map(|token| token.trim().to_string())
        .collect()
}

/// Split a flat 1-D value on `", "` after stripping outer parentheses.
pub fn split_flat(raw: &str) -> Vec<&str> {
    raw.trim_start_matches('(')
        .trim_end_matches(')')
        .split(", ")
        .collect()
}
