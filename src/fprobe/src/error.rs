// fprobe/src/error.rs

use crate::decode::DecodeError;
use crate::types::TypeParseError;
use gdbmirs::MiError;
use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Failures of a probe against a debugger session.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Could not probe variable '{expression}' info")]
    NoTypeInfo { expression: String },

    #[error("Could not parse type '{raw}' of variable '{expression}': {source}")]
    UnparseableType {
        expression: String,
        raw: String,
        #[source]
        source: TypeParseError,
    },

    #[error("Cannot decode variable '{expression}': {source}")]
    Decode {
        expression: String,
        #[source]
        source: DecodeError,
    },

    /// gdb answered with `^error`; carries its own message
    #[error("{0}")]
    Debugger(String),

    #[error("Missing result response to '{command}'")]
    MissingResult { command: String },

    #[error("Result of '{command}' has no '{field}' field")]
    MissingField { command: String, field: String },

    #[error("Malformed reply to '{command}': {source}")]
    MalformedReply {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Program is not stopped (reason: {reason})")]
    NotStopped { reason: String },

    #[error(transparent)]
    Control(#[from] MiError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ProbeError {
    pub fn missing_field<S: Into<String>>(command: S, field: S) -> Self {
        ProbeError::MissingField {
            command: command.into(),
            field: field.into(),
        }
    }
}
