// gdbmirs/src/record.rs

//! Output records emitted by gdb/MI.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Class of an output record, named after the prefix character gdb uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    /// `^done`, `^running`, `^error`, ...
    Result,
    /// `*stopped`, `+download`, `=breakpoint-modified`, ...
    Notify,
    /// `~"..."` console stream
    Console,
    /// `@"..."` target stream
    Target,
    /// `&"..."` log stream
    Log,
    /// Anything that is not MI framing, usually output of the inferior
    Output,
    /// The `(gdb)` prompt that terminates a batch of records
    Done,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Result => "result",
            ResponseKind::Notify => "notify",
            ResponseKind::Console => "console",
            ResponseKind::Target => "target",
            ResponseKind::Log => "log",
            ResponseKind::Output => "output",
            ResponseKind::Done => "done",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which pipe a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Stdout,
    Stderr,
}

/// A single parsed output record.
///
/// For result and async records `message` holds the class (`done`, `error`,
/// `stopped`, ...) and `payload` the attached results as a JSON object. For
/// stream records `payload` holds the unescaped text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    pub message: Option<String>,
    pub payload: Option<Value>,
    pub token: Option<u64>,
    pub stream: Stream,
}

impl Response {
    pub fn new(kind: ResponseKind) -> Self {
        Self {
            kind,
            message: None,
            payload: None,
            token: None,
            stream: Stream::Stdout,
        }
    }

    pub fn with_message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_token(mut self, token: Option<u64>) -> Self {
        self.token = token;
        self
    }

    pub fn is_result(&self) -> bool {
        self.kind == ResponseKind::Result
    }

    /// True for a `^error` result record.
    pub fn is_error(&self) -> bool {
        self.is_result() && self.message.as_deref() == Some("error")
    }

    /// True for the `*stopped` exec-async record.
    pub fn is_stopped(&self) -> bool {
        self.kind == ResponseKind::Notify && self.message.as_deref() == Some("stopped")
    }

    /// Look up a string field of an object payload.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.as_ref()?.get(key)?.as_str()
    }

    /// The text of a stream record.
    pub fn stream_text(&self) -> Option<&str> {
        match self.kind {
            ResponseKind::Console | ResponseKind::Target | ResponseKind::Log | ResponseKind::Output => {
                self.payload.as_ref()?.as_str()
            }
            _ => None,
        }
    }
}
