// fprobe/src/types/lexer.rs

//! Tokenizer for type strings. Whitespace separates tokens and is dropped.

use super::token::{TypeToken, TypeTokenType};

pub struct TypeLexer {
    input: Vec<char>,
    current: usize,
}

impl TypeLexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            current: 0,
        }
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> Vec<TypeToken> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let at_end = token.token_type == TypeTokenType::Eof;
            tokens.push(token);
            if at_end {
                return tokens;
            }
        }
    }

    fn scan_token(&mut self) -> TypeToken {
        while self.peek().map_or(false, char::is_whitespace) {
            self.current += 1;
        }

        let column = self.current + 1;
        let start = self.current;
        let c = match self.advance() {
            Some(c) => c,
            None => return TypeToken::new(TypeTokenType::Eof, String::new(), column),
        };

        let token_type = match c {
            '(' => TypeTokenType::LeftParen,
            ')' => TypeTokenType::RightParen,
            ',' => TypeTokenType::Comma,
            '=' => TypeTokenType::Assign,
            ':' => TypeTokenType::Colon,
            '*' => TypeTokenType::Star,
            '-' | '+' if self.peek().map_or(false, |d| d.is_ascii_digit()) => {
                self.skip_while(|d| d.is_ascii_digit());
                TypeTokenType::Integer
            }
            _ if c.is_ascii_digit() => {
                self.skip_while(|d| d.is_ascii_digit());
                TypeTokenType::Integer
            }
            _ if c.is_alphabetic() || c == '_' => {
                self.skip_while(|d| d.is_alphanumeric() || d == '_');
                TypeTokenType::Identifier
            }
            _ => TypeTokenType::Invalid,
        };

        let lexeme: String = self.input[start..self.current].iter().collect();
        TypeToken::new(token_type, lexeme, column)
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.current).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.current += 1;
        }
        c
    }

    fn skip_while<F: Fn(char) -> bool>(&mut self, pred: F) {
        while self.peek().map_or(false, &pred) {
            self.current += 1;
        }
    }
}
