// gdbmirs/src/parser.rs

//! Parser for single lines of gdb/MI output.
//!
//! The grammar handled here is the output half of the MI syntax:
//!
//! ```text
//! record      := [token] ( "^" | "*" | "+" | "=" ) class { "," result }
//!              | ( "~" | "@" | "&" ) c-string
//!              | "(gdb)"
//! result      := variable "=" value
//! value       := c-string | tuple | list
//! tuple       := "{}" | "{" result { "," result } "}"
//! list        := "[]" | "[" value { "," value } "]" | "[" result { "," result } "]"
//! ```
//!
//! Tuples become JSON objects, lists become JSON arrays. A key repeated inside
//! one tuple is collected into an array, and named entries inside a list keep
//! only their values.

use crate::error::{MiError, Result};
use crate::record::{Response, ResponseKind};
use serde_json::{Map, Value};

/// Parse one line of gdb output into a [`Response`].
///
/// Lines that do not carry MI framing are returned as [`ResponseKind::Output`]
/// so that output of the debugged program is not lost.
pub fn parse_line(line: &str) -> Result<Response> {
    let line = line.trim_end_matches(&['\r', '\n'][..]);

    if line.trim_end() == "(gdb)" {
        return Ok(Response::new(ResponseKind::Done));
    }

    let mut cursor = Cursor::new(line);
    let token = cursor.token();

    let kind = match cursor.peek() {
        Some('^') => ResponseKind::Result,
        Some('*') | Some('+') | Some('=') => ResponseKind::Notify,
        Some('~') if token.is_none() => ResponseKind::Console,
        Some('@') if token.is_none() => ResponseKind::Target,
        Some('&') if token.is_none() => ResponseKind::Log,
        _ => {
            return Ok(
                Response::new(ResponseKind::Output).with_payload(Value::String(line.to_string()))
            )
        }
    };
    cursor.advance();

    match kind {
        ResponseKind::Console | ResponseKind::Target | ResponseKind::Log => {
            let text = cursor.c_string()?;
            cursor.expect_end()?;
            Ok(Response::new(kind).with_payload(Value::String(text)))
        }
        _ => {
            let class = cursor.class();
            if class.is_empty() {
                return Err(cursor.error("missing record class"));
            }
            let mut response = Response::new(kind).with_message(class).with_token(token);
            if cursor.peek() == Some(',') {
                cursor.advance();
                let results = cursor.results(None)?;
                response = response.with_payload(Value::Object(results));
            }
            cursor.expect_end()?;
            Ok(response)
        }
    }
}

/// Parse one line read from gdb's stdout, which it shares with the program.
///
/// A line that looks framed but does not parse is program output that happens
/// to start with `^`, `*`, `+`, `=`, `~`, `@` or `&`; it is returned as
/// [`ResponseKind::Output`] instead of an error.
pub fn parse_output_line(line: &str) -> Response {
    match parse_line(line) {
        Ok(response) => response,
        Err(e) => {
            log::warn!("treating unparseable line as program output: {}", e);
            let text = line.trim_end_matches(&['\r', '\n'][..]);
            Response::new(ResponseKind::Output).with_payload(Value::String(text.to_string()))
        }
    }
}

/// Parse every non-empty line of a block of output.
pub fn parse_lines(output: &str) -> Result<Vec<Response>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

struct Cursor<'a> {
    line: &'a str,
    input: Vec<char>,
    current: usize,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            input: line.chars().collect(),
            current: 0,
        }
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

    fn is_at_end(&self) -> bool {
        self.current >= self.input.len()
    }

    fn error(&self, message: &str) -> MiError {
        MiError::parse_error(self.line, self.current + 1, message)
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.advance() {
            Some(c) if c == expected => Ok(()),
            Some(c) => {
                self.current -= 1;
                Err(self.error(&format!("expected '{}', found '{}'", expected, c)))
            }
            None => Err(self.error(&format!("expected '{}', found end of line", expected))),
        }
    }

    fn expect_end(&self) -> Result<()> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.error("unexpected trailing characters"))
        }
    }

    fn token(&mut self) -> Option<u64> {
        let start = self.current;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.current += 1;
        }
        if start == self.current {
            return None;
        }
        let digits: String = self.input[start..self.current].iter().collect();
        digits.parse().ok()
    }

    fn class(&mut self) -> String {
        let start = self.current;
        while self
            .peek()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            self.current += 1;
        }
        self.input[start..self.current].iter().collect()
    }

    fn variable(&mut self) -> Result<String> {
        let start = self.current;
        while self
            .peek()
            .map_or(false, |c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            self.current += 1;
        }
        if start == self.current {
            return Err(self.error("expected a variable name"));
        }
        Ok(self.input[start..self.current].iter().collect())
    }

    /// Parse `name=value` pairs until `close` (or end of line when `None`).
    fn results(&mut self, close: Option<char>) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        loop {
            let (name, value) = self.result()?;
            insert_result(&mut map, name, value);
            match self.peek() {
                Some(',') => {
                    self.advance();
                }
                c if c == close => return Ok(map),
                Some(c) => return Err(self.error(&format!("unexpected '{}' after result", c))),
                None => return Err(self.error("unterminated tuple")),
            }
        }
    }

    fn result(&mut self) -> Result<(String, Value)> {
        let name = self.variable()?;
        self.expect('=')?;
        let value = self.value()?;
        Ok((name, value))
    }

    fn value(&mut self) -> Result<Value> {
        match self.peek() {
            Some('"') => Ok(Value::String(self.c_string()?)),
            Some('{') => self.tuple(),
            Some('[') => self.list(),
            Some(c) => Err(self.error(&format!("unexpected '{}' at start of value", c))),
            None => Err(self.error("missing value")),
        }
    }

    fn tuple(&mut self) -> Result<Value> {
        self.expect('{')?;
        if self.peek() == Some('}') {
            self.advance();
            return Ok(Value::Object(Map::new()));
        }
        let map = self.results(Some('}'))?;
        self.expect('}')?;
        Ok(Value::Object(map))
    }

    fn list(&mut self) -> Result<Value> {
        self.expect('[')?;
        let mut items = Vec::new();
        if self.peek() == Some(']') {
            self.advance();
            return Ok(Value::Array(items));
        }
        loop {
            let item = match self.peek() {
                Some('"') | Some('{') | Some('[') => self.value()?,
                _ => self.result()?.1,
            };
            items.push(item);
            match self.advance() {
                Some(',') => continue,
                Some(']') => return Ok(Value::Array(items)),
                Some(c) => {
                    self.current -= 1;
                    return Err(self.error(&format!("unexpected '{}' in list", c)));
                }
                None => return Err(self.error("unterminated list")),
            }
        }
    }

    /// Parse a C string, decoding gdb's escapes including octal byte escapes.
    fn c_string(&mut self) -> Result<String> {
        self.expect('"')?;
        let mut bytes: Vec<u8> = Vec::new();
        let mut buf = [0u8; 4];
        loop {
            let c = match self.advance() {
                Some(c) => c,
                None => return Err(self.error("unterminated string")),
            };
            match c {
                '"' => break,
                '\\' => {
                    let escaped = self
                        .advance()
                        .ok_or_else(|| self.error("dangling escape"))?;
                    match escaped {
                        'n' => bytes.push(b'\n'),
                        't' => bytes.push(b'\t'),
                        'r' => bytes.push(b'\r'),
                        'e' => bytes.push(0x1b),
                        'a' => bytes.push(0x07),
                        'b' => bytes.push(0x08),
                        'f' => bytes.push(0x0c),
                        'v' => bytes.push(0x0b),
                        '0'..='7' => {
                            let mut code = escaped.to_digit(8).unwrap_or(0);
                            for _ in 0..2 {
                                match self.peek().and_then(|d| d.to_digit(8)) {
                                    Some(d) => {
                                        code = code * 8 + d;
                                        self.advance();
                                    }
                                    None => break,
                                }
                            }
                            bytes.push((code & 0xff) as u8);
                        }
                        other => bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes()),
                    }
                }
                other => bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes()),
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn insert_result(map: &mut Map<String, Value>, name: String, value: Value) {
    match map.get_mut(&name) {
        Some(Value::Array(existing)) => existing.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name, value);
        }
    }
}
