// gdbmirs/src/controller.rs

//! Owning a gdb process and exchanging MI commands with it.

use crate::error::{MiError, Result};
use crate::parser::parse_output_line;
use crate::record::{Response, ResponseKind, Stream};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Anything that accepts MI command strings and answers with output records.
///
/// [`GdbController`] implements this over a live gdb process; tests implement
/// it with scripted replies.
pub trait DebuggerControl {
    /// Send one command and collect the records of its reply, up to and
    /// including the prompt that follows the result record.
    fn write(&mut self, command: &str) -> Result<Vec<Response>>;

    /// Collect records until the inferior reports `*stopped`.
    fn wait_for_stop(&mut self) -> Result<Vec<Response>>;
}

/// How to launch gdb.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub gdb_path: PathBuf,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            gdb_path: PathBuf::from("gdb"),
            args: vec![
                "--nx".to_string(),
                "--quiet".to_string(),
                "--interpreter=mi3".to_string(),
            ],
            timeout: Duration::from_secs(10),
        }
    }
}

type Line = (Stream, io::Result<String>);

/// A gdb child process speaking MI on its standard streams.
pub struct GdbController {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<Line>,
    timeout: Duration,
}

impl GdbController {
    /// Spawn gdb and drain its start-up output up to the first prompt.
    pub fn spawn(options: &ControllerOptions) -> Result<Self> {
        log::debug!(
            "spawning {} {}",
            options.gdb_path.display(),
            options.args.join(" ")
        );

        let mut child = Command::new(&options.gdb_path)
            .args(&options.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| MiError::Spawn {
                program: options.gdb_path.display().to_string(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "gdb stdin not captured"))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "gdb stdout not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::BrokenPipe, "gdb stderr not captured"))?;

        let (sender, lines) = mpsc::channel();
        forward_lines(stdout, Stream::Stdout, sender.clone());
        forward_lines(stderr, Stream::Stderr, sender);

        let mut controller = Self {
            child,
            stdin,
            lines,
            timeout: options.timeout,
        };
        controller.read_until("<startup>", |resp| resp.kind == ResponseKind::Done)?;
        Ok(controller)
    }

    /// Read records until `done` returns true for one of them.
    fn read_until<F>(&mut self, command: &str, mut done: F) -> Result<Vec<Response>>
    where
        F: FnMut(&Response) -> bool,
    {
        let deadline = Instant::now() + self.timeout;
        let mut responses = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let (stream, line) = match self.lines.recv_timeout(remaining) {
                Ok(received) => received,
                Err(RecvTimeoutError::Timeout) => {
                    return Err(MiError::Timeout {
                        command: command.to_string(),
                        timeout_ms: self.timeout.as_millis(),
                    })
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(MiError::Exited {
                        command: command.to_string(),
                    })
                }
            };
            let line = line?;
            log::trace!("<- {}", line);

            let mut response = match stream {
                Stream::Stdout => parse_output_line(&line),
                Stream::Stderr => Response::new(ResponseKind::Output)
                    .with_payload(serde_json::Value::String(line)),
            };
            response.stream = stream;

            let finished = done(&response);
            responses.push(response);
            if finished {
                return Ok(responses);
            }
        }
    }
}

impl DebuggerControl for GdbController {
    fn write(&mut self, command: &str) -> Result<Vec<Response>> {
        log::debug!("-> {}", command);
        writeln!(self.stdin, "{}", command)?;
        self.stdin.flush()?;

        let mut seen_result = false;
        self.read_until(command, |resp| {
            if resp.is_result() {
                seen_result = true;
            }
            seen_result && resp.kind == ResponseKind::Done
        })
    }

    fn wait_for_stop(&mut self) -> Result<Vec<Response>> {
        self.read_until("*stopped", Response::is_stopped)
    }
}

impl Drop for GdbController {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "-gdb-exit");
        let _ = self.stdin.flush();
        if let Err(e) = self.child.kill() {
            log::trace!("gdb already gone: {}", e);
        }
        let _ = self.child.wait();
    }
}

fn forward_lines<R>(reader: R, stream: Stream, sender: mpsc::Sender<Line>)
where
    R: io::Read + Send + 'static,
{
    thread::spawn(move || {
        for line in BufReader::new(reader).lines() {
            let failed = line.is_err();
            if sender.send((stream, line)).is_err() || failed {
                break;
            }
        }
    });
}
