// gdbmirs/src/error.rs

//! Error types for talking to gdb over its machine interface.

use std::io;
use thiserror::Error;

/// Result type alias for gdbmirs operations.
pub type Result<T> = std::result::Result<T, MiError>;

/// Errors raised while spawning, writing to, or reading from gdb.
#[derive(Error, Debug)]
pub enum MiError {
    /// gdb could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// I/O error on the gdb pipes
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No output arrived before the read deadline
    #[error("Timed out after {timeout_ms} ms waiting for a reply to '{command}'")]
    Timeout { command: String, timeout_ms: u128 },

    /// An output record could not be parsed
    #[error("Malformed MI record at column {column}: {message} (line: {line})")]
    Parse {
        line: String,
        column: usize,
        message: String,
    },

    /// gdb closed its output stream
    #[error("gdb exited while waiting for a reply to '{command}'")]
    Exited { command: String },
}

impl MiError {
    /// Create a new parse error.
    pub fn parse_error<S: Into<String>>(line: S, column: usize, message: S) -> Self {
        MiError::Parse {
            line: line.into(),
            column,
            message: message.into(),
        }
    }

    /// Get the error category for logging purposes.
    pub fn category(&self) -> &'static str {
        match self {
            MiError::Spawn { .. } => "spawn",
            MiError::Io(_) => "io",
            MiError::Timeout { .. } => "timeout",
            MiError::Parse { .. } => "parse",
            MiError::Exited { .. } => "exited",
        }
    }
}
