// fprobe/src/session.rs

//! A debugger session: the context every probe runs against.

use crate::constants::DEFAULT_TEMP_VAR_NAME;
use crate::decode::{decode_array, parse_flat_array, DecodedArray};
use crate::error::{ProbeError, Result};
use crate::render::render_source;
use crate::types::TypeDescriptor;
use gdbmirs::{quote, DebuggerControl, Response};
use ndarray::Array1;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Where the inferior is stopped, from `-stack-info-frame`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub file: String,
    pub fullname: PathBuf,
    pub func: String,
    pub line: usize,
}

#[derive(Deserialize)]
struct RawFrame {
    file: String,
    fullname: String,
    func: String,
    line: String,
}

/// Wraps a [`DebuggerControl`] and runs probes through it.
pub struct Session<C: DebuggerControl> {
    control: C,
    temp_var_name: String,
}

impl<C: DebuggerControl> Session<C> {
    pub fn new(control: C) -> Self {
        Self {
            control,
            temp_var_name: DEFAULT_TEMP_VAR_NAME.to_string(),
        }
    }

    /// Name of the variable object created by [`Session::query_type`].
    pub fn with_temp_var_name<S: Into<String>>(mut self, name: S) -> Self {
        self.temp_var_name = name.into();
        self
    }

    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }

    pub fn into_inner(self) -> C {
        self.control
    }

    /// Send a command and return every record of the reply.
    pub fn write(&mut self, command: &str) -> Result<Vec<Response>> {
        Ok(self.control.write(command)?)
    }

    /// The result record of a command, if gdb sent one.
    pub fn result(&mut self, command: &str) -> Result<Option<Response>> {
        let responses = self.control.write(command)?;
        Ok(responses.into_iter().find(Response::is_result))
    }

    /// The result record of a command, with `^error` turned into an error.
    pub fn run_or_raise(&mut self, command: &str) -> Result<Response> {
        let response = self
            .result(command)?
            .ok_or_else(|| ProbeError::MissingResult {
                command: command.to_string(),
            })?;
        if response.is_error() {
            let message = response.payload_str("msg").unwrap_or("unknown error");
            return Err(ProbeError::Debugger(message.to_string()));
        }
        Ok(response)
    }

    /// Apply `-gdb-set` settings, e.g. `print elements 0`.
    pub fn configure<S: AsRef<str>>(&mut self, settings: &[S]) -> Result<()> {
        for setting in settings {
            self.run_or_raise(&format!("-gdb-set {}", setting.as_ref()))?;
        }
        Ok(())
    }

    pub fn load_program(&mut self, program: &Path) -> Result<Response> {
        let path = program.display().to_string();
        self.run_or_raise(&format!("-file-exec-and-symbols {}", mi_arg(&path)))
    }

    /// Insert a breakpoint at a location such as `simple.f90:8`.
    pub fn break_insert(&mut self, location: &str) -> Result<Response> {
        self.run_or_raise(&format!("-break-insert {}", mi_arg(location)))
    }

    /// Start the program and wait until it stops.
    pub fn run(&mut self) -> Result<Response> {
        let command = "-exec-run";
        let mut responses = self.control.write(command)?;
        if let Some(error) = responses.iter().find(|r| r.is_error()) {
            let message = error.payload_str("msg").unwrap_or("unknown error");
            return Err(ProbeError::Debugger(message.to_string()));
        }
        if !responses.iter().any(Response::is_stopped) {
            responses = self.control.wait_for_stop()?;
        }

        let stopped = responses
            .into_iter()
            .rev()
            .find(Response::is_stopped)
            .ok_or_else(|| ProbeError::MissingResult {
                command: command.to_string(),
            })?;
        let reason = stopped.payload_str("reason").unwrap_or("");
        if reason.starts_with("exited") {
            return Err(ProbeError::NotStopped {
                reason: reason.to_string(),
            });
        }
        Ok(stopped)
    }

    /// The printed value of an expression.
    pub fn evaluate(&mut self, expression: &str) -> Result<String> {
        let command = format!("-data-evaluate-expression {}", mi_arg(expression));
        let response = self.run_or_raise(&command)?;
        response
            .payload_str("value")
            .map(str::to_string)
            .ok_or_else(|| ProbeError::missing_field(command.as_str(), "value"))
    }

    /// The type string of an expression.
    ///
    /// A variable object is created for the query and deleted afterwards,
    /// whether or not the query succeeds. `Ok(None)` means gdb gave no type.
    pub fn query_type(&mut self, expression: &str) -> Result<Option<String>> {
        let name = self.temp_var_name.clone();
        self.run_or_raise(&format!("-var-create {} * {}", name, mi_arg(expression)))?;

        let mut var = TempVar {
            session: self,
            name,
        };
        let command = format!("-var-info-type {}", var.name);
        let response = var.session.result(&command)?;
        Ok(response.and_then(|r| {
            if r.is_error() {
                log::debug!("{} failed: {:?}", command, r.payload_str("msg"));
            }
            r.payload_str("type").map(str::to_string)
        }))
    }

    /// Query and parse the type of an expression.
    ///
    /// `Ok(None)` when gdb reports no type or a type outside the grammar.
    pub fn probe_type(&mut self, expression: &str) -> Result<Option<TypeDescriptor>> {
        Ok(self
            .query_type(expression)?
            .and_then(|raw| crate::types::parse_type(&raw)))
    }

    /// Probe the type of a variable, then fetch and decode its value.
    pub fn load_array(&mut self, name: &str) -> Result<DecodedArray> {
        let raw_type = self.query_type(name)?.ok_or_else(|| ProbeError::NoTypeInfo {
            expression: name.to_string(),
        })?;
        let descriptor: TypeDescriptor =
            raw_type
                .parse()
                .map_err(|source| ProbeError::UnparseableType {
                    expression: name.to_string(),
                    raw: raw_type.clone(),
                    source,
                })?;
        log::debug!("{}: {}", name, descriptor);

        let value = self.evaluate(name)?;
        decode_array(&value, &descriptor).map_err(|source| ProbeError::Decode {
            expression: name.to_string(),
            source,
        })
    }

    /// Fetch a 1-D array without probing its type.
    ///
    /// Every element must convert to `T`.
    pub fn read_array_variable<T: FromStr>(&mut self, name: &str) -> Result<Array1<T>> {
        let value = self.evaluate(name)?;
        parse_flat_array(&value).map_err(|source| ProbeError::Decode {
            expression: name.to_string(),
            source,
        })
    }

    pub fn current_frame(&mut self) -> Result<Frame> {
        let command = "-stack-info-frame";
        let response = self.run_or_raise(command)?;
        let frame = response
            .payload
            .as_ref()
            .and_then(|p| p.get("frame"))
            .cloned()
            .ok_or_else(|| ProbeError::missing_field(command, "frame"))?;
        let raw: RawFrame =
            serde_json::from_value(frame).map_err(|source| ProbeError::MalformedReply {
                command: command.to_string(),
                source,
            })?;
        let line: usize = raw
            .line
            .parse()
            .map_err(|_| ProbeError::missing_field(command, "line"))?;

        Ok(Frame {
            file: raw.file,
            fullname: PathBuf::from(raw.fullname),
            func: raw.func,
            line,
        })
    }

    /// Render the current frame's source window as HTML.
    ///
    /// The source is read from the frame's full path unless `use_source` is given.
    pub fn current_location_html(&mut self, use_source: Option<&str>, pad: usize) -> Result<String> {
        let frame = self.current_frame()?;
        let source = match use_source {
            Some(source) => source.to_string(),
            None => fs_err::read_to_string(&frame.fullname)?,
        };
        Ok(render_source(&source, &frame.file, &frame.func, frame.line, pad))
    }
}

/// A variable object that is deleted when dropped.
struct TempVar<'a, C: DebuggerControl> {
    session: &'a mut Session<C>,
    name: String,
}

impl<C: DebuggerControl> Drop for TempVar<'_, C> {
    fn drop(&mut self) {
        let command = format!("-var-delete {}", self.name);
        if let Err(e) = self.session.control.write(&command) {
            log::warn!("{} failed ({}): {}", command, e.category(), e);
        }
    }
}

/// Quote an argument when gdb would otherwise split it.
fn mi_arg(arg: &str) -> String {
    if arg.chars().any(|c| c.is_whitespace() || c == '"') {
        quote(arg)
    } else {
        arg.to_string()
    }
}
