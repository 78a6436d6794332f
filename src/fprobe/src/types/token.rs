// fprobe/src/types/token.rs

//! Tokens of a debugger-reported Fortran type string.

use std::fmt;

/// A token of a type string such as `integer(kind=4) (1,10)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeToken {
    /// The type of token
    pub token_type: TypeTokenType,
    /// The raw text of the token
    pub lexeme: String,
    /// Column of the first character (1-based)
    pub column: usize,
}

impl TypeToken {
    pub fn new(token_type: TypeTokenType, lexeme: String, column: usize) -> Self {
        Self {
            token_type,
            lexeme,
            column,
        }
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_type {
            TypeTokenType::Eof => f.write_str("end of input"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTokenType {
    /// Type name, parameter name or attribute (`real`, `kind`, `allocatable`)
    Identifier,
    /// Integer literal, optionally signed
    Integer,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// =
    Assign,
    /// :
    Colon,
    /// *
    Star,
    /// End of input
    Eof,
    /// Any character the grammar has no use for
    Invalid,
}
