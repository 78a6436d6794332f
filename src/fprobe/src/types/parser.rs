// fprobe/src/types/parser.rs

//! Recursive-descent parser for type strings.
//!
//! ```text
//! type        := IDENT params? attributes? dims? EOF
//! params      := "(" [ param { "," param } ] ")"
//! param       := IDENT "=" ( INT | IDENT | "*" )
//! attributes  := { "," IDENT }
//! dims        := "(" [ dim { "," dim } ] ")"
//! dim         := INT | INT ":" INT
//! ```

use super::lexer::TypeLexer;
use super::token::{TypeToken, TypeTokenType};
use super::{ParamValue, TypeDescriptor};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The grammar production that was being parsed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Production {
    TypeName,
    Parameters,
    Parameter,
    Attributes,
    Dimensions,
    Dimension,
    End,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Production::TypeName => "type name",
            Production::Parameters => "parameter list",
            Production::Parameter => "parameter",
            Production::Attributes => "attribute list",
            Production::Dimensions => "dimension list",
            Production::Dimension => "dimension",
            Production::End => "end of type",
        };
        f.write_str(name)
    }
}

/// A type string that does not follow the grammar.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid {production} at column {column}: expected {expected}, found {found}")]
pub struct TypeParseError {
    pub production: Production,
    pub column: usize,
    pub expected: &'static str,
    pub found: String,
}

type Result<T> = std::result::Result<T, TypeParseError>;

pub struct TypeParser {
    tokens: Vec<TypeToken>,
    current: usize,
}

impl TypeParser {
    pub fn new(input: &str) -> Self {
        Self {
            tokens: TypeLexer::new(input).tokenize(),
            current: 0,
        }
    }

    /// Parse the whole input as one type.
    pub fn parse(mut self) -> Result<TypeDescriptor> {
        let base_type = self.type_name()?;

        let parameters = if self.at_parameters() {
            self.parameters()?
        } else {
            BTreeMap::new()
        };

        let attributes = self.attributes()?;

        let (shape, lower_bounds) = if self.check(TypeTokenType::LeftParen) {
            self.dimensions()?
        } else {
            (Vec::new(), Vec::new())
        };

        if !self.check(TypeTokenType::Eof) {
            return Err(self.error(Production::End, "end of input"));
        }

        Ok(TypeDescriptor {
            base_type,
            parameters,
            attributes,
            shape,
            lower_bounds,
        })
    }

    fn type_name(&mut self) -> Result<String> {
        let token = self.expect(TypeTokenType::Identifier, Production::TypeName, "identifier")?;
        Ok(token.lexeme.to_lowercase())
    }

    /// A group directly after the name is a parameter list when it holds
    /// `name=`, or when it is empty and a dimension list follows.
    fn at_parameters(&self) -> bool {
        if !self.check(TypeTokenType::LeftParen) {
            return false;
        }
        match (self.peek_type(1), self.peek_type(2)) {
            (TypeTokenType::Identifier, TypeTokenType::Assign) => true,
            (TypeTokenType::RightParen, TypeTokenType::LeftParen) => true,
            _ => false,
        }
    }

    fn parameters(&mut self) -> Result<BTreeMap<String, ParamValue>> {
        self.expect(TypeTokenType::LeftParen, Production::Parameters, "'('")?;
        let mut parameters = BTreeMap::new();
        if self.matches(TypeTokenType::RightParen) {
            return Ok(parameters);
        }
        loop {
            let (name, value) = self.parameter()?;
            parameters.insert(name, value);
            if self.matches(TypeTokenType::Comma) {
                continue;
            }
            self.expect(TypeTokenType::RightParen, Production::Parameters, "',' or ')'")?;
            return Ok(parameters);
        }
    }

    fn parameter(&mut self) -> Result<(String, ParamValue)> {
        let name = self
            .expect(TypeTokenType::Identifier, Production::Parameter, "parameter name")?
            .lexeme;
        self.expect(TypeTokenType::Assign, Production::Parameter, "'='")?;
        let token = self.peek().clone();
        let value = match token.token_type {
            TypeTokenType::Integer => match token.lexeme.parse::<i64>() {
                Ok(v) => ParamValue::Int(v),
                Err(_) => ParamValue::Raw(token.lexeme),
            },
            TypeTokenType::Identifier | TypeTokenType::Star => ParamValue::Raw(token.lexeme),
            _ => return Err(self.error(Production::Parameter, "parameter value")),
        };
        self.current += 1;
        Ok((name, value))
    }

    fn attributes(&mut self) -> Result<Vec<String>> {
        let mut attributes = Vec::new();
        while self.matches(TypeTokenType::Comma) {
            let token =
                self.expect(TypeTokenType::Identifier, Production::Attributes, "attribute name")?;
            attributes.push(token.lexeme.to_lowercase());
        }
        Ok(attributes)
    }

    fn dimensions(&mut self) -> Result<(Vec<usize>, Vec<i64>)> {
        self.expect(TypeTokenType::LeftParen, Production::Dimensions, "'('")?;
        let mut shape = Vec::new();
        let mut lower_bounds = Vec::new();
        if self.matches(TypeTokenType::RightParen) {
            return Ok((shape, lower_bounds));
        }
        loop {
            let (extent, lower) = self.dimension()?;
            shape.push(extent);
            lower_bounds.push(lower);
            if self.matches(TypeTokenType::Comma) {
                continue;
            }
            self.expect(TypeTokenType::RightParen, Production::Dimensions, "',' or ')'")?;
            return Ok((shape, lower_bounds));
        }
    }

    /// `n` is an extent with lower bound 1; `lo:hi` is an explicit range.
    fn dimension(&mut self) -> Result<(usize, i64)> {
        let first = self.integer(Production::Dimension)?;
        if !self.matches(TypeTokenType::Colon) {
            return match usize::try_from(first) {
                Ok(extent) => Ok((extent, 1)),
                Err(_) => Err(self.error_at(Production::Dimension, "non-negative extent", 1)),
            };
        }
        let upper = self.integer(Production::Dimension)?;
        let extent = upper
            .checked_sub(first)
            .and_then(|span| span.checked_add(1))
            .ok_or_else(|| self.error_at(Production::Dimension, "bounds with a representable extent", 1))?;
        match usize::try_from(extent) {
            Ok(extent) => Ok((extent, first)),
            Err(_) => Err(self.error_at(Production::Dimension, "upper bound >= lower bound - 1", 1)),
        }
    }

    fn integer(&mut self, production: Production) -> Result<i64> {
        let token = self.expect(TypeTokenType::Integer, production, "integer")?;
        token
            .lexeme
            .parse::<i64>()
            .map_err(|_| self.error_at(production, "integer in range", 1))
    }

    fn peek(&self) -> &TypeToken {
        let last = self.tokens.len() - 1;
        &self.tokens[self.current.min(last)]
    }

    fn peek_type(&self, ahead: usize) -> TypeTokenType {
        self.tokens
            .get(self.current + ahead)
            .map_or(TypeTokenType::Eof, |t| t.token_type)
    }

    fn check(&self, token_type: TypeTokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn matches(&mut self, token_type: TypeTokenType) -> bool {
        if self.check(token_type) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn expect(
        &mut self,
        token_type: TypeTokenType,
        production: Production,
        expected: &'static str,
    ) -> Result<TypeToken> {
        if self.check(token_type) {
            let token = self.peek().clone();
            self.current += 1;
            Ok(token)
        } else {
            Err(self.error(production, expected))
        }
    }

    fn error(&self, production: Production, expected: &'static str) -> TypeParseError {
        self.error_at(production, expected, 0)
    }

    /// Error pointing `back` tokens behind the cursor.
    fn error_at(&self, production: Production, expected: &'static str, back: usize) -> TypeParseError {
        let index = self.current.saturating_sub(back).min(self.tokens.len() - 1);
        let token = &self.tokens[index];
        TypeParseError {
            production,
            column: token.column,
            expected,
            found: token.to_string(),
        }
    }
}
